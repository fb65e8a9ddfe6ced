//! Opens a window and clears it to a dark teal until it is closed or Escape is pressed.

use mini_gl_hello::config;

fn main() {
    mini_gl_hello::init_logging();

    let config = config! {
        window_title: "Hello Window",
    };

    std::process::exit(mini_gl_hello::run_to_exit_code(config));
}
