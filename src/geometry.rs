//! Hard-coded shapes and the layout of their vertices.
//!
//! Everything here is plain data. Nothing touches OpenGL until a [`Geometry`] is handed to
//! [`Mesh::upload`][crate::Mesh::upload].

use crate::Error;

use std::mem::size_of;
use std::str::FromStr;

/// The shapes the demos know how to draw.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Shape {
    /// Three positions, drawn with `glDrawArrays`.
    Triangle,
    /// Three positions, each followed by an RGB color.
    ColoredTriangle,
    /// Four positions shared by two triangles through an index buffer.
    Rectangle,
}

impl Shape {
    /// The selector accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Shape::Triangle => "triangle",
            Shape::ColoredTriangle => "colored_triangle",
            Shape::Rectangle => "rectangle",
        }
    }

    pub fn geometry(self) -> Geometry {
        match self {
            Shape::Triangle => Geometry {
                vertices: vec![
                    -0.5, -0.5, 0.0, // left
                    0.5, -0.5, 0.0, // right
                    0.0, 0.5, 0.0, // top
                ],
                indices: None,
                layout: VertexLayout::new(&[3]),
            },
            Shape::ColoredTriangle => Geometry {
                vertices: vec![
                    // positions      // colors
                    -0.5, -0.5, 0.0, 0.0, 1.0, 0.0, // bottom left
                    0.5, -0.5, 0.0, 1.0, 0.0, 0.0, // bottom right
                    0.0, 0.5, 0.0, 0.0, 0.0, 1.0, // top
                ],
                indices: None,
                layout: VertexLayout::new(&[3, 3]),
            },
            Shape::Rectangle => Geometry {
                vertices: vec![
                    0.5, 0.5, 0.0, // top right
                    0.5, -0.5, 0.0, // bottom right
                    -0.5, -0.5, 0.0, // bottom left
                    -0.5, 0.5, 0.0, // top left
                ],
                indices: Some(vec![
                    0, 1, 3, // first triangle
                    1, 2, 3, // second triangle
                ]),
                layout: VertexLayout::new(&[3]),
            },
        }
    }
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "triangle" => Ok(Shape::Triangle),
            "colored_triangle" => Ok(Shape::ColoredTriangle),
            "rectangle" => Ok(Shape::Rectangle),
            other => Err(Error::UnknownShape(other.to_string())),
        }
    }
}

/// Looks up a shape by its selector and returns its geometry.
pub fn provide(name: &str) -> Result<Geometry, Error> {
    name.parse::<Shape>().map(Shape::geometry)
}

/// One `glVertexAttribPointer` call worth of information. All sizes are in bytes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AttributeDescriptor {
    pub index: u32,
    pub components: i32,
    pub stride: i32,
    pub offset: usize,
}

/// Interleaved float attributes, in slot order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VertexLayout {
    components: Vec<i32>,
}

impl VertexLayout {
    /// `components[i]` is the number of floats in attribute slot `i`.
    pub fn new(components: &[i32]) -> VertexLayout {
        VertexLayout {
            components: components.to_vec(),
        }
    }

    /// Floats per vertex.
    pub fn floats_per_vertex(&self) -> usize {
        self.components.iter().map(|&c| c as usize).sum()
    }

    /// Bytes from one vertex to the next.
    pub fn stride(&self) -> i32 {
        (self.floats_per_vertex() * size_of::<f32>()) as i32
    }

    pub fn descriptors(&self) -> Vec<AttributeDescriptor> {
        let stride = self.stride();
        let mut offset = 0;
        self.components
            .iter()
            .enumerate()
            .map(|(index, &components)| {
                let descriptor = AttributeDescriptor {
                    index: index as u32,
                    components,
                    stride,
                    offset,
                };
                offset += components as usize * size_of::<f32>();
                descriptor
            })
            .collect()
    }
}

/// How a mesh gets drawn each frame.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DrawCall {
    /// `glDrawArrays(GL_TRIANGLES, 0, count)`
    Arrays { count: i32 },
    /// `glDrawElements(GL_TRIANGLES, count, GL_UNSIGNED_INT, 0)`
    Elements { count: i32 },
}

#[derive(Clone, PartialEq, Debug)]
pub struct Geometry {
    pub vertices: Vec<f32>,
    pub indices: Option<Vec<u32>>,
    pub layout: VertexLayout,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.floats_per_vertex()
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn draw_call(&self) -> DrawCall {
        match &self.indices {
            Some(indices) => DrawCall::Elements {
                count: indices.len() as i32,
            },
            None => DrawCall::Arrays {
                count: self.vertex_count() as i32,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_is_three_positions() {
        let triangle = Shape::Triangle.geometry();
        assert_eq!(triangle.vertices.len(), 9);
        assert_eq!(triangle.layout.floats_per_vertex(), 3);
        assert_eq!(triangle.vertex_count(), 3);
        assert!(triangle.indices.is_none());
        assert_eq!(triangle.draw_call(), DrawCall::Arrays { count: 3 });
    }

    #[test]
    fn rectangle_shares_an_edge() {
        let rectangle = Shape::Rectangle.geometry();
        assert_eq!(rectangle.vertices.len(), 12);
        assert_eq!(rectangle.vertex_count(), 4);
        assert_eq!(rectangle.indices, Some(vec![0, 1, 3, 1, 2, 3]));
        assert_eq!(rectangle.draw_call(), DrawCall::Elements { count: 6 });
    }

    #[test]
    fn colored_triangle_interleaves_color() {
        let triangle = Shape::ColoredTriangle.geometry();
        assert_eq!(triangle.vertex_count(), 3);
        assert!(!triangle.is_indexed());

        let float = size_of::<f32>();
        let position = AttributeDescriptor {
            index: 0,
            components: 3,
            stride: 6 * float as i32,
            offset: 0,
        };
        let color = AttributeDescriptor {
            index: 1,
            offset: 3 * float,
            ..position
        };
        assert_eq!(triangle.layout.descriptors(), vec![position, color]);
    }

    #[test]
    fn position_only_stride_is_one_vec3() {
        let layout = VertexLayout::new(&[3]);
        assert_eq!(layout.stride(), 12);
        assert_eq!(layout.descriptors()[0].offset, 0);
    }

    #[test]
    fn selectors() {
        for shape in [Shape::Triangle, Shape::ColoredTriangle, Shape::Rectangle].iter() {
            assert_eq!(shape.name().parse::<Shape>().unwrap(), *shape);
        }
        assert_eq!(provide("rectangle").unwrap(), Shape::Rectangle.geometry());
    }

    #[test]
    fn unknown_selector_is_an_error() {
        match provide("hexagon") {
            Err(Error::UnknownShape(name)) => assert_eq!(name, "hexagon"),
            other => panic!("expected UnknownShape, got {:?}", other),
        }
        assert!("Triangle".parse::<Shape>().is_err());
    }
}
