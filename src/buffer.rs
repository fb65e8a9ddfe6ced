//! Uploading geometry to the GPU.

use crate::geometry::{AttributeDescriptor, DrawCall, Geometry};
use crate::Error;

use gl::types::*;
use log::debug;

use std::mem::size_of_val;

/// A vertex array with its vertex buffer and, for indexed geometry, its element buffer.
///
/// The attribute layout is recorded on the vertex array once during [`Mesh::upload`]; drawing
/// only needs the array bound again. All three GL objects are deleted on drop.
#[derive(Debug)]
pub struct Mesh {
    pub vao: GLuint,
    pub vbo: GLuint,
    pub ebo: Option<GLuint>,
    draw_call: DrawCall,
}

impl Mesh {
    /// Requires a current OpenGL context.
    pub fn upload(geometry: &Geometry) -> Result<Mesh, Error> {
        // Each name is owned by `mesh` as soon as it exists, so an early return cleans up
        // whatever was already allocated.
        let mut mesh = Mesh {
            vao: rustic_gl::raw::create_vao().map_err(|_| Error::Allocation("vertex array"))?,
            vbo: 0,
            ebo: None,
            draw_call: geometry.draw_call(),
        };
        mesh.vbo = rustic_gl::raw::create_buffer().map_err(|_| Error::Allocation("vertex buffer"))?;
        if geometry.is_indexed() {
            let ebo = rustic_gl::raw::create_buffer()
                .map_err(|_| Error::Allocation("element buffer"))?;
            mesh.ebo = Some(ebo);
        }

        unsafe {
            gl::BindVertexArray(mesh.vao);

            gl::BindBuffer(gl::ARRAY_BUFFER, mesh.vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                size_of_val(&geometry.vertices[..]) as GLsizeiptr,
                geometry.vertices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            if let (Some(ebo), Some(indices)) = (mesh.ebo, &geometry.indices) {
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    size_of_val(&indices[..]) as GLsizeiptr,
                    indices.as_ptr() as *const _,
                    gl::STATIC_DRAW,
                );
            }

            for attribute in geometry.layout.descriptors() {
                declare(attribute);
            }

            // The element buffer binding is part of the vertex array state, so only the
            // array buffer may be unbound while the vertex array is still bound.
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
        }

        debug!(
            "uploaded {} vertices ({} indices) into vao {}",
            geometry.vertex_count(),
            geometry.indices.as_ref().map_or(0, Vec::len),
            mesh.vao
        );
        Ok(mesh)
    }

    pub fn draw_call(&self) -> DrawCall {
        self.draw_call
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        debug!("deleting vao {}", self.vao);
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            if self.vbo != 0 {
                gl::DeleteBuffers(1, &self.vbo);
            }
            if let Some(ebo) = self.ebo {
                gl::DeleteBuffers(1, &ebo);
            }
        }
    }
}

/// Describes one float attribute of the bound array buffer and enables its slot.
unsafe fn declare(attribute: AttributeDescriptor) {
    gl::VertexAttribPointer(
        attribute.index,
        attribute.components,
        gl::FLOAT,
        gl::FALSE,
        attribute.stride,
        attribute.offset as *const _,
    );
    gl::EnableVertexAttribArray(attribute.index);
}
