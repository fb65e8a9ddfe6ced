//! A triangle whose corners carry their own color, blended across the face by the rasterizer.

use mini_gl_hello::{config, Shape};

fn main() {
    mini_gl_hello::init_logging();

    let wireframe = match mini_gl_hello::parse_wireframe(std::env::args().nth(1).as_deref()) {
        Ok(wireframe) => wireframe,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(-1);
        }
    };

    let config = config! {
        window_title: "Shader",
        shape: Shape::ColoredTriangle,
        wireframe: wireframe,
    };

    std::process::exit(mini_gl_hello::run_to_exit_code(config));
}
