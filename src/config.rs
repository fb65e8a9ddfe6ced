use crate::geometry::Shape;
use crate::shader::ShaderPolicy;
use crate::Error;

use derive_builder::Builder;

/// Everything [`run`][crate::run] needs to know.
///
/// The following pattern is recommended when creating a config:
///
/// ```
/// use mini_gl_hello::{Config, Shape};
///
/// let config = Config {
///     /* specify whichever fields you need to set, for example: */
///     shape: Some(Shape::Rectangle),
///     wireframe: true,
///     .. Default::default()
/// };
/// ```
///
/// There is also a builder, [`ConfigBuilder`], and the [`config!`][crate::config!] macro which
/// wraps it:
///
/// ```
/// use mini_gl_hello::{config, Shape};
///
/// let config = config! {
///     window_title: "Hello Triangle",
///     shape: Shape::Triangle,
/// };
/// assert_eq!(config.shape, Some(Shape::Triangle));
/// ```
#[derive(Clone, PartialEq, Debug, Builder)]
#[builder(build_fn(skip))]
#[builder(default)]
pub struct Config {
    #[builder(setter(into))]
    pub window_title: String,
    /// Logical size of the window.
    pub window_size: (f64, f64),
    /// Major and minor version of the requested core profile.
    pub gl_version: (u8, u8),
    pub resizable: bool,
    /// `None` only clears the window every frame.
    #[builder(setter(strip_option))]
    pub shape: Option<Shape>,
    /// Draw polygon outlines instead of filling them. Set once, before the first frame.
    pub wireframe: bool,
    pub clear_color: [f32; 4],
    pub shader_policy: ShaderPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            window_title: "Hello Window".to_string(),
            window_size: (800.0, 600.0),
            gl_version: (3, 3),
            resizable: true,
            shape: None,
            wireframe: false,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            shader_policy: ShaderPolicy::Strict,
        }
    }
}

impl ConfigBuilder {
    /// Fills every field that wasn't set with its value from [`Config::default`].
    pub fn build(&self) -> Config {
        let default = Config::default();
        Config {
            window_title: self.window_title.clone().unwrap_or(default.window_title),
            window_size: self.window_size.unwrap_or(default.window_size),
            gl_version: self.gl_version.unwrap_or(default.gl_version),
            resizable: self.resizable.unwrap_or(default.resizable),
            shape: self.shape.unwrap_or(default.shape),
            wireframe: self.wireframe.unwrap_or(default.wireframe),
            clear_color: self.clear_color.unwrap_or(default.clear_color),
            shader_policy: self.shader_policy.unwrap_or(default.shader_policy),
        }
    }
}

/// Builds a [`Config`] from `field: value` pairs, defaulting the rest.
#[macro_export]
macro_rules! config {
    {} => {
        $crate::Config::default()
    };
    {$($k:ident: $v:expr),+ $(,)?} => {
        $crate::ConfigBuilder::default()
            $(.$k($v))*
            .build()
    };
}

/// Reads the demos' optional wireframe argument: absent means off, otherwise `true` or `false`.
pub fn parse_wireframe(arg: Option<&str>) -> Result<bool, Error> {
    match arg {
        None => Ok(false),
        Some(arg) => arg
            .parse()
            .map_err(|_| Error::InvalidWireframe(arg.to_string())),
    }
}
