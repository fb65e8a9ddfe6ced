use crate::shader::ShaderError;

/// Everything that can stop [`run`][crate::run] before the first frame.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create window: {0}")]
    WindowCreation(#[from] glutin::CreationError),
    #[error("OpenGL context error: {0}")]
    Context(#[from] glutin::ContextError),
    #[error("unknown shape {0:?}, expected \"triangle\", \"colored_triangle\" or \"rectangle\"")]
    UnknownShape(String),
    #[error("expected \"true\" or \"false\" for wireframe, got {0:?}")]
    InvalidWireframe(String),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error("could not allocate a {0}")]
    Allocation(&'static str),
}
