//! Compiling and linking the two-stage programs used by the demos.

use crate::geometry::Shape;

use gl::types::*;
use log::debug;
use thiserror::Error;

use std::fmt;

/// Upper bound on the number of bytes kept from a shader or program info log.
pub const INFO_LOG_CAPACITY: usize = 512;

pub const POSITION_VERTEX_SHADER: &str = include_str!("./position_vertex_shader.glsl");
pub const CONSTANT_FRAGMENT_SHADER: &str = include_str!("./constant_fragment_shader.glsl");
pub const COLOR_VERTEX_SHADER: &str = include_str!("./color_vertex_shader.glsl");
pub const COLOR_FRAGMENT_SHADER: &str = include_str!("./color_fragment_shader.glsl");

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn to_gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("shader program failed to link: {log}")]
    Link { log: String },
    #[error("could not create a shader object: {0}")]
    Creation(String),
}

/// What to do with a program whose compile or link step reported a failure.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ShaderPolicy {
    /// Fail the build with the first diagnostic.
    Strict,
    /// Log the diagnostics and hand back the program anyway. The render loop will not bind it.
    Lenient,
}

impl Default for ShaderPolicy {
    fn default() -> Self {
        ShaderPolicy::Strict
    }
}

impl ShaderPolicy {
    pub fn judge(self, diagnostics: &[ShaderError]) -> Result<(), ShaderError> {
        match (self, diagnostics.first()) {
            (ShaderPolicy::Strict, Some(first)) => Err(first.clone()),
            _ => Ok(()),
        }
    }
}

/// Source text for both stages of a program.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new<V: ToString, F: ToString>(vertex: V, fragment: F) -> ShaderSources {
        ShaderSources {
            vertex: vertex.to_string(),
            fragment: fragment.to_string(),
        }
    }

    /// The built-in program matching a shape's vertex layout.
    pub fn for_shape(shape: Shape) -> ShaderSources {
        match shape {
            Shape::Triangle | Shape::Rectangle => {
                ShaderSources::new(POSITION_VERTEX_SHADER, CONSTANT_FRAGMENT_SHADER)
            }
            Shape::ColoredTriangle => {
                ShaderSources::new(COLOR_VERTEX_SHADER, COLOR_FRAGMENT_SHADER)
            }
        }
    }
}

/// Turns a raw info log into something printable.
///
/// Keeps at most [`INFO_LOG_CAPACITY`] bytes, stops at the first NUL and drops trailing
/// whitespace (drivers like to end their logs with a newline).
pub fn truncate_info_log(raw: &[u8]) -> String {
    let raw = &raw[..raw.len().min(INFO_LOG_CAPACITY)];
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).trim_end().to_string()
}

/// A compiled stage. Deleted as soon as it goes out of scope, which is right after linking.
struct StageObject(GLuint);

impl Drop for StageObject {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteShader(self.0);
        }
    }
}

/// Compiles one stage. The object is returned even when compilation fails, together with
/// the diagnostic.
fn compile_stage(
    stage: ShaderStage,
    source: &str,
) -> Result<(StageObject, Option<ShaderError>), ShaderError> {
    let id = unsafe { gl::CreateShader(stage.to_gl_enum()) };
    if id == 0 {
        return Err(ShaderError::Creation(format!(
            "glCreateShader returned 0 for the {} stage",
            stage
        )));
    }
    let object = StageObject(id);

    unsafe {
        let sources = [source.as_ptr() as *const GLchar];
        let lengths = [source.len() as GLint];
        gl::ShaderSource(object.0, 1, sources.as_ptr(), lengths.as_ptr());
        gl::CompileShader(object.0);

        let mut status = gl::FALSE as GLint;
        gl::GetShaderiv(object.0, gl::COMPILE_STATUS, &mut status);
        if status == gl::TRUE as GLint {
            return Ok((object, None));
        }

        let mut log = vec![0u8; INFO_LOG_CAPACITY];
        let mut written: GLsizei = 0;
        gl::GetShaderInfoLog(
            object.0,
            INFO_LOG_CAPACITY as GLsizei,
            &mut written,
            log.as_mut_ptr() as *mut GLchar,
        );
        log.truncate(written.max(0) as usize);

        let log = truncate_info_log(&log);
        Ok((object, Some(ShaderError::Compile { stage, log })))
    }
}

/// A linked vertex + fragment program. The GL object is deleted on drop.
#[derive(Debug)]
pub struct ShaderProgram {
    id: GLuint,
    diagnostics: Vec<ShaderError>,
}

impl ShaderProgram {
    /// Compiles both stages, links them and checks every step.
    ///
    /// Every failure is logged. Under [`ShaderPolicy::Strict`] the first one is returned as an
    /// error; under [`ShaderPolicy::Lenient`] the program comes back with
    /// [`diagnostics`][ShaderProgram::diagnostics] filled in and
    /// [`is_valid`][ShaderProgram::is_valid] returning `false`.
    ///
    /// Requires a current OpenGL context.
    pub fn build(
        sources: &ShaderSources,
        policy: ShaderPolicy,
    ) -> Result<ShaderProgram, ShaderError> {
        let (vertex, vertex_diagnostic) = compile_stage(ShaderStage::Vertex, &sources.vertex)?;
        let (fragment, fragment_diagnostic) =
            compile_stage(ShaderStage::Fragment, &sources.fragment)?;

        let mut diagnostics: Vec<ShaderError> = vertex_diagnostic
            .into_iter()
            .chain(fragment_diagnostic)
            .collect();

        let id = unsafe { rustic_gl::raw::create_program() }
            .map_err(|err| ShaderError::Creation(err.to_string()))?;
        let mut program = ShaderProgram {
            id,
            diagnostics: Vec::new(),
        };

        unsafe {
            gl::AttachShader(program.id, vertex.0);
            gl::AttachShader(program.id, fragment.0);
            gl::LinkProgram(program.id);
            if let Err(err) = rustic_gl::raw::get_link_status(program.id) {
                diagnostics.push(ShaderError::Link {
                    log: truncate_info_log(err.to_string().as_bytes()),
                });
            }
            gl::DetachShader(program.id, vertex.0);
            gl::DetachShader(program.id, fragment.0);
        }
        drop(vertex);
        drop(fragment);

        for diagnostic in &diagnostics {
            log::error!("{}", diagnostic);
        }
        policy.judge(&diagnostics)?;

        program.diagnostics = diagnostics;
        Ok(program)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// True when every compile and link step succeeded.
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[ShaderError] {
        &self.diagnostics
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        debug!("deleting shader program {}", self.id);
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}
