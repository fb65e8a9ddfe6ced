//! Draws an orange triangle or rectangle.
//!
//! ```text
//! cargo run --example hello_triangle -- [triangle|rectangle] [true|false]
//! ```
//!
//! Both arguments are optional. The second one is `true` or `false`.

use mini_gl_hello::{config, Shape};

fn main() {
    mini_gl_hello::init_logging();

    let mut args = std::env::args().skip(1);
    let shape: Shape = match args.next().as_deref().unwrap_or("triangle").parse() {
        Ok(shape) => shape,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(-1);
        }
    };
    let wireframe = match mini_gl_hello::parse_wireframe(args.next().as_deref()) {
        Ok(wireframe) => wireframe,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(-1);
        }
    };

    let config = config! {
        window_title: "Hello Triangle",
        shape: shape,
        wireframe: wireframe,
    };

    std::process::exit(mini_gl_hello::run_to_exit_code(config));
}
