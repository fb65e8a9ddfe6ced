//! The "Getting Started" OpenGL programs, without the copy-pasted boilerplate.
//!
//! Every one of those programs opens a window with an OpenGL 3.3 core context, maybe compiles
//! a two-stage shader program, maybe uploads a few vertices, and then clears and draws until
//! the window is closed or Escape is pressed. This crate does all of that in [`run`]; a
//! [`Config`] picks what to draw.
//!
//! ```no_run
//! use mini_gl_hello::{config, Shape};
//!
//! mini_gl_hello::init_logging();
//! let exit_code = mini_gl_hello::run_to_exit_code(config! {
//!     window_title: "Hello Triangle",
//!     shape: Shape::Rectangle,
//!     wireframe: true,
//! });
//! std::process::exit(exit_code);
//! ```
//!
//! The pieces are public too: [`init_glutin_context`] for the window, [`ShaderProgram`] and
//! [`Mesh`] for GPU objects (both cleaned up on drop), and [`RenderLoop`] which runs against
//! the [`Surface`] and [`GraphicsApi`] traits.

pub use gl;
pub use glutin;

mod buffer;
mod config;
mod core;
mod error;
pub mod geometry;
mod logging;
pub mod render;
pub mod shader;

pub use crate::buffer::Mesh;
pub use crate::config::{parse_wireframe, Config, ConfigBuilder};
pub use crate::core::{init_glutin_context, GlApi, GlutinSurface};
pub use crate::error::Error;
pub use crate::geometry::{DrawCall, Geometry, Shape};
pub use crate::logging::init_logging;
pub use crate::render::{GraphicsApi, RenderLoop, Scene, Surface};
pub use crate::shader::{ShaderError, ShaderPolicy, ShaderProgram, ShaderSources};

/// Opens the window, sets up whatever `config` asks to draw and renders until closed.
///
/// Returns the number of frames presented. Everything created along the way is released when
/// this returns, whichever way it returns.
pub fn run(config: Config) -> Result<u64, Error> {
    let mut surface = GlutinSurface::new(&config)?;
    let mut gfx = GlApi;
    let (width, height) = surface.framebuffer_size();
    gfx.viewport(width, height);

    // Declared after `surface` so they are dropped while the context still exists.
    let (program, mesh) = match config.shape {
        Some(shape) => {
            log::info!("drawing a {}", shape.name());
            let program =
                ShaderProgram::build(&ShaderSources::for_shape(shape), config.shader_policy)?;
            let mesh = Mesh::upload(&shape.geometry())?;
            (Some(program), Some(mesh))
        }
        None => (None, None),
    };

    let scene = Scene::assemble(program.as_ref(), mesh.as_ref());
    RenderLoop::new(config.clear_color, config.wireframe).run(&mut surface, &mut gfx, &scene)
}

/// [`run`], reporting failures through the log and an exit code: `0` on a normal exit, `-1`
/// when startup failed.
pub fn run_to_exit_code(config: Config) -> i32 {
    match run(config) {
        Ok(_) => 0,
        Err(err) => {
            log::error!("{}", err);
            -1
        }
    }
}
