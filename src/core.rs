use crate::config::Config;
use crate::geometry::DrawCall;
use crate::render::{FrameEvent, GraphicsApi, Surface};
use crate::Error;

use glutin::dpi::LogicalSize;
use glutin::event::{ElementState, Event, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::platform::run_return::EventLoopExtRunReturn;
use glutin::window::WindowBuilder;
use glutin::{Api, ContextBuilder, GlProfile, GlRequest, PossiblyCurrent, WindowedContext};

use gl::types::*;
use log::info;

use std::ptr::null;

/// Create a window with a core profile context of the configured version and make it current.
///
/// Also loads the OpenGL function pointers, so any `gl::` call is fine afterwards as long as it
/// happens on this thread.
pub fn init_glutin_context(
    config: &Config,
    event_loop: &EventLoop<()>,
) -> Result<WindowedContext<PossiblyCurrent>, Error> {
    let (window_width, window_height) = config.window_size;
    let window = WindowBuilder::new()
        .with_title(config.window_title.to_string())
        .with_inner_size(LogicalSize::new(window_width, window_height))
        .with_resizable(config.resizable);

    let (major, minor) = config.gl_version;
    let context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, (major, minor)))
        .with_gl_profile(GlProfile::Core)
        .build_windowed(window, event_loop)?;

    let context = unsafe { context.make_current() }.map_err(|(_, err)| err)?;
    gl::load_with(|symbol| context.get_proc_address(symbol) as *const _);

    info!(
        "created {}x{} window {:?} with an OpenGL {}.{} core context",
        window_width, window_height, config.window_title, major, minor
    );
    Ok(context)
}

/// The glutin window, its event loop and the close flag the render loop checks.
pub struct GlutinSurface {
    pub event_loop: EventLoop<()>,
    pub context: WindowedContext<PossiblyCurrent>,
    should_close: bool,
}

impl GlutinSurface {
    pub fn new(config: &Config) -> Result<GlutinSurface, Error> {
        let event_loop = EventLoop::new();
        let context = init_glutin_context(config, &event_loop)?;
        Ok(GlutinSurface {
            event_loop,
            context,
            should_close: false,
        })
    }

    /// Physical size of the drawable area.
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.context.window().inner_size();
        (size.width, size.height)
    }
}

impl Surface for GlutinSurface {
    fn poll_events(&mut self) -> Vec<FrameEvent> {
        let mut events = Vec::new();
        let context = &self.context;
        self.event_loop.run_return(|event, _, flow| {
            *flow = ControlFlow::Poll;
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => events.push(FrameEvent::CloseRequested),
                    WindowEvent::Resized(size) => {
                        context.resize(size);
                        events.push(FrameEvent::Resized {
                            width: size.width,
                            height: size.height,
                        });
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        if let Some(key) = input.virtual_keycode {
                            events.push(FrameEvent::Key {
                                key,
                                pressed: input.state == ElementState::Pressed,
                            });
                        }
                    }
                    _ => {}
                },
                // Everything queued so far has been delivered; hand control back to the loop.
                Event::MainEventsCleared => *flow = ControlFlow::Exit,
                _ => {}
            }
        });
        events
    }

    fn swap_buffers(&mut self) -> Result<(), Error> {
        self.context.swap_buffers()?;
        Ok(())
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, value: bool) {
        self.should_close = value;
    }
}

/// [`GraphicsApi`] backed by the loaded `gl` function pointers.
#[derive(Copy, Clone, Debug, Default)]
pub struct GlApi;

impl GraphicsApi for GlApi {
    fn viewport(&mut self, width: u32, height: u32) {
        // The window hands out u32 sizes but OpenGL only speaks GLsizei
        unsafe {
            gl::Viewport(0, 0, width as GLsizei, height as GLsizei);
        }
    }

    fn wireframe(&mut self) {
        unsafe {
            gl::PolygonMode(gl::FRONT_AND_BACK, gl::LINE);
        }
    }

    fn clear_color(&mut self, [r, g, b, a]: [f32; 4]) {
        unsafe {
            gl::ClearColor(r, g, b, a);
        }
    }

    fn clear(&mut self) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    fn use_program(&mut self, program: GLuint) {
        unsafe {
            gl::UseProgram(program);
        }
    }

    fn bind_vertex_array(&mut self, vao: GLuint) {
        unsafe {
            gl::BindVertexArray(vao);
        }
    }

    fn draw(&mut self, call: DrawCall) {
        unsafe {
            match call {
                DrawCall::Arrays { count } => gl::DrawArrays(gl::TRIANGLES, 0, count),
                DrawCall::Elements { count } => {
                    gl::DrawElements(gl::TRIANGLES, count, gl::UNSIGNED_INT, null())
                }
            }
        }
    }
}
