use std::sync::Once;

static INIT: Once = Once::new();

/// Sets up `env_logger` once; later calls do nothing.
///
/// `RUST_LOG` is honored when set (e.g. `RUST_LOG=mini_gl_hello=debug`), otherwise everything
/// at `info` and above is printed. Call it first thing in `main`.
pub fn init_logging() {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match std::env::var("RUST_LOG") {
            Ok(filter) => {
                builder.parse_filters(&filter);
            }
            Err(_) => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }
        // Tests may have installed a logger already.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
