//! The render loop and the two seams it talks through.
//!
//! [`Surface`] is the window side (events, presenting, the close flag) and [`GraphicsApi`] is
//! the OpenGL side. The real implementations live in [`crate::core`]; keeping them behind
//! traits lets the loop run against recording doubles in tests.

use crate::buffer::Mesh;
use crate::geometry::DrawCall;
use crate::shader::ShaderProgram;
use crate::Error;

use gl::types::*;
use glutin::event::VirtualKeyCode;
use log::{debug, info, warn};

/// The window events the loop cares about.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum FrameEvent {
    /// The framebuffer is now this many physical pixels.
    Resized { width: u32, height: u32 },
    CloseRequested,
    Key { key: VirtualKeyCode, pressed: bool },
}

pub trait Surface {
    /// Drains whatever the OS has queued up without waiting for more.
    fn poll_events(&mut self) -> Vec<FrameEvent>;
    fn swap_buffers(&mut self) -> Result<(), Error>;
    fn should_close(&self) -> bool;
    fn set_should_close(&mut self, value: bool);
}

/// The handful of OpenGL calls the loop makes.
pub trait GraphicsApi {
    fn viewport(&mut self, width: u32, height: u32);
    /// Rasterize polygon outlines only, on both faces.
    fn wireframe(&mut self);
    fn clear_color(&mut self, color: [f32; 4]);
    fn clear(&mut self);
    fn use_program(&mut self, program: GLuint);
    fn bind_vertex_array(&mut self, vao: GLuint);
    fn draw(&mut self, call: DrawCall);
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LoopState {
    Running,
    Closing,
}

/// What gets drawn every frame. The default scene only clears.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Scene {
    /// Only ever a successfully linked program.
    pub program: Option<GLuint>,
    pub vertex_array: GLuint,
    pub draw: Option<DrawCall>,
}

impl Scene {
    /// Draws `mesh` with `program`, leaving out a program that failed to build.
    pub fn assemble(program: Option<&ShaderProgram>, mesh: Option<&Mesh>) -> Scene {
        let program = program.and_then(|program| {
            if program.is_valid() {
                Some(program.id())
            } else {
                warn!("shader program {} is not usable, only clearing", program.id());
                None
            }
        });
        Scene {
            program,
            vertex_array: mesh.map_or(0, |mesh| mesh.vao),
            draw: mesh.map(Mesh::draw_call),
        }
    }
}

pub struct RenderLoop {
    pub clear_color: [f32; 4],
    pub wireframe: bool,
    /// Set by an Escape press during event polling, acted on at the start of the next frame.
    escape_pressed: bool,
    frames: u64,
}

impl RenderLoop {
    pub fn new(clear_color: [f32; 4], wireframe: bool) -> RenderLoop {
        RenderLoop {
            clear_color,
            wireframe,
            escape_pressed: false,
            frames: 0,
        }
    }

    pub fn state<S: Surface>(&self, surface: &S) -> LoopState {
        if surface.should_close() {
            LoopState::Closing
        } else {
            LoopState::Running
        }
    }

    /// Renders until the surface is asked to close. Returns the number of frames presented.
    pub fn run<S: Surface, G: GraphicsApi>(
        &mut self,
        surface: &mut S,
        gfx: &mut G,
        scene: &Scene,
    ) -> Result<u64, Error> {
        if self.wireframe {
            gfx.wireframe();
        }

        while self.state(surface) == LoopState::Running {
            self.frame(surface, gfx, scene)?;
        }

        info!("render loop closed after {} frames", self.frames);
        Ok(self.frames)
    }

    /// One iteration: input, clear, draw, present, events.
    pub fn frame<S: Surface, G: GraphicsApi>(
        &mut self,
        surface: &mut S,
        gfx: &mut G,
        scene: &Scene,
    ) -> Result<(), Error> {
        if self.escape_pressed {
            surface.set_should_close(true);
        }

        gfx.clear_color(self.clear_color);
        gfx.clear();

        if let (Some(program), Some(call)) = (scene.program, scene.draw) {
            gfx.use_program(program);
            gfx.bind_vertex_array(scene.vertex_array);
            gfx.draw(call);
        }

        surface.swap_buffers()?;
        self.frames += 1;

        for event in surface.poll_events() {
            match event {
                FrameEvent::Resized { width, height } => {
                    debug!("viewport resized to {}x{}", width, height);
                    gfx.viewport(width, height);
                }
                FrameEvent::CloseRequested => surface.set_should_close(true),
                FrameEvent::Key {
                    key: VirtualKeyCode::Escape,
                    pressed: true,
                } => self.escape_pressed = true,
                FrameEvent::Key { .. } => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Shape;

    use std::collections::VecDeque;

    /// Hands out one batch of events per poll, then nothing.
    #[derive(Default)]
    struct ScriptedSurface {
        batches: VecDeque<Vec<FrameEvent>>,
        should_close: bool,
        swaps: u64,
        /// Closes the window after this many swaps, so a broken test cannot spin forever.
        swap_limit: u64,
    }

    impl ScriptedSurface {
        fn new(batches: Vec<Vec<FrameEvent>>) -> ScriptedSurface {
            ScriptedSurface {
                batches: batches.into(),
                swap_limit: 100,
                ..Default::default()
            }
        }
    }

    impl Surface for ScriptedSurface {
        fn poll_events(&mut self) -> Vec<FrameEvent> {
            self.batches.pop_front().unwrap_or_default()
        }

        fn swap_buffers(&mut self) -> Result<(), Error> {
            self.swaps += 1;
            if self.swaps >= self.swap_limit {
                self.should_close = true;
            }
            Ok(())
        }

        fn should_close(&self) -> bool {
            self.should_close
        }

        fn set_should_close(&mut self, value: bool) {
            self.should_close = value;
        }
    }

    #[derive(Clone, PartialEq, Debug)]
    enum Call {
        Viewport(u32, u32),
        Wireframe,
        ClearColor([f32; 4]),
        Clear,
        UseProgram(GLuint),
        BindVertexArray(GLuint),
        Draw(DrawCall),
    }

    #[derive(Default)]
    struct RecordingApi {
        calls: Vec<Call>,
    }

    impl RecordingApi {
        fn draws(&self) -> Vec<DrawCall> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Draw(draw) => Some(*draw),
                    _ => None,
                })
                .collect()
        }
    }

    impl GraphicsApi for RecordingApi {
        fn viewport(&mut self, width: u32, height: u32) {
            self.calls.push(Call::Viewport(width, height));
        }
        fn wireframe(&mut self) {
            self.calls.push(Call::Wireframe);
        }
        fn clear_color(&mut self, color: [f32; 4]) {
            self.calls.push(Call::ClearColor(color));
        }
        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }
        fn use_program(&mut self, program: GLuint) {
            self.calls.push(Call::UseProgram(program));
        }
        fn bind_vertex_array(&mut self, vao: GLuint) {
            self.calls.push(Call::BindVertexArray(vao));
        }
        fn draw(&mut self, call: DrawCall) {
            self.calls.push(Call::Draw(call));
        }
    }

    const TEAL: [f32; 4] = [0.2, 0.3, 0.3, 1.0];

    fn escape(pressed: bool) -> FrameEvent {
        FrameEvent::Key {
            key: VirtualKeyCode::Escape,
            pressed,
        }
    }

    fn scene_for(shape: Shape) -> Scene {
        Scene {
            program: Some(3),
            vertex_array: 1,
            draw: Some(shape.geometry().draw_call()),
        }
    }

    #[test]
    fn escape_closes_on_the_next_frame() {
        let mut surface = ScriptedSurface::new(vec![vec![], vec![escape(true)]]);
        let mut gfx = RecordingApi::default();
        let frames = RenderLoop::new(TEAL, false)
            .run(&mut surface, &mut gfx, &scene_for(Shape::Triangle))
            .unwrap();

        // Escape arrives while polling after frame 2; frame 3 sees it and is the last one.
        assert_eq!(frames, 3);
        assert!(surface.should_close());
    }

    #[test]
    fn other_keys_do_not_close() {
        let space = FrameEvent::Key {
            key: VirtualKeyCode::Space,
            pressed: true,
        };
        let mut surface = ScriptedSurface::new(vec![vec![space], vec![escape(false)]]);
        surface.swap_limit = 10;
        let frames = RenderLoop::new(TEAL, false)
            .run(&mut surface, &mut RecordingApi::default(), &Scene::default())
            .unwrap();
        assert_eq!(frames, 10);
    }

    #[test]
    fn close_request_stops_before_another_frame() {
        let mut surface = ScriptedSurface::new(vec![vec![FrameEvent::CloseRequested]]);
        let frames = RenderLoop::new(TEAL, false)
            .run(&mut surface, &mut RecordingApi::default(), &Scene::default())
            .unwrap();
        assert_eq!(frames, 1);
    }

    #[test]
    fn frame_steps_run_in_order() {
        let mut surface = ScriptedSurface::new(vec![vec![FrameEvent::CloseRequested]]);
        let mut gfx = RecordingApi::default();
        RenderLoop::new(TEAL, false)
            .run(&mut surface, &mut gfx, &scene_for(Shape::Triangle))
            .unwrap();
        assert_eq!(
            gfx.calls,
            vec![
                Call::ClearColor(TEAL),
                Call::Clear,
                Call::UseProgram(3),
                Call::BindVertexArray(1),
                Call::Draw(DrawCall::Arrays { count: 3 }),
            ]
        );
        assert_eq!(surface.swaps, 1);
    }

    #[test]
    fn wireframe_is_set_once_before_the_first_frame() {
        let mut surface = ScriptedSurface::new(vec![]);
        surface.swap_limit = 5;
        let mut gfx = RecordingApi::default();
        RenderLoop::new(TEAL, true)
            .run(&mut surface, &mut gfx, &scene_for(Shape::Rectangle))
            .unwrap();

        let modes: Vec<usize> = gfx
            .calls
            .iter()
            .enumerate()
            .filter(|(_, call)| **call == Call::Wireframe)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(modes, vec![0]);
    }

    #[test]
    fn filled_polygons_leave_the_mode_alone() {
        let mut surface = ScriptedSurface::new(vec![vec![FrameEvent::CloseRequested]]);
        let mut gfx = RecordingApi::default();
        RenderLoop::new(TEAL, false)
            .run(&mut surface, &mut gfx, &scene_for(Shape::Rectangle))
            .unwrap();
        assert!(!gfx.calls.contains(&Call::Wireframe));
    }

    #[test]
    fn rectangle_draws_six_indices_every_frame() {
        let mut surface = ScriptedSurface::new(vec![]);
        surface.swap_limit = 4;
        let mut gfx = RecordingApi::default();
        let frames = RenderLoop::new(TEAL, false)
            .run(&mut surface, &mut gfx, &scene_for(Shape::Rectangle))
            .unwrap();

        assert_eq!(frames, 4);
        assert_eq!(gfx.draws(), vec![DrawCall::Elements { count: 6 }; 4]);
    }

    #[test]
    fn resize_updates_the_viewport() {
        let resize = FrameEvent::Resized {
            width: 1024,
            height: 768,
        };
        let mut surface =
            ScriptedSurface::new(vec![vec![resize], vec![FrameEvent::CloseRequested]]);
        let mut gfx = RecordingApi::default();
        RenderLoop::new(TEAL, false)
            .run(&mut surface, &mut gfx, &Scene::default())
            .unwrap();
        assert_eq!(
            gfx.calls
                .iter()
                .filter(|call| matches!(call, Call::Viewport(..)))
                .collect::<Vec<_>>(),
            vec![&Call::Viewport(1024, 768)]
        );
    }

    #[test]
    fn scene_without_program_only_clears() {
        let mut surface = ScriptedSurface::new(vec![vec![FrameEvent::CloseRequested]]);
        let mut gfx = RecordingApi::default();
        let scene = Scene {
            program: None,
            ..scene_for(Shape::Rectangle)
        };
        RenderLoop::new(TEAL, false)
            .run(&mut surface, &mut gfx, &scene)
            .unwrap();
        assert_eq!(gfx.calls, vec![Call::ClearColor(TEAL), Call::Clear]);
    }

    #[test]
    fn escape_tapped_within_one_poll_still_closes() {
        let mut surface = ScriptedSurface::new(vec![vec![escape(true), escape(false)]]);
        surface.swap_limit = 10;
        let frames = RenderLoop::new(TEAL, false)
            .run(&mut surface, &mut RecordingApi::default(), &Scene::default())
            .unwrap();
        assert_eq!(frames, 2);
    }
}
