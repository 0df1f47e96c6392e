use std::ffi::c_void;
use thiserror::Error;

use gl::types::GLuint;

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Uploads the data once with a static usage hint. Attribute layout is
    /// described at draw time, see [`Geometry::bind`].
    pub fn build(self) -> Result<Geometry, GBError> {
        let stride = stride(&self.attributes);

        if stride == 0 || self.data.len() % stride != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let mut vao = 0;
        let mut vbo = 0;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);

            if vao == 0 || vbo == 0 {
                gl::DeleteBuffers(1, (&vbo) as *const u32);
                gl::DeleteVertexArrays(1, (&vao) as *const u32);
                return Err(GBError::Allocation);
            }

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(self.data) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
        }

        let vertices = self.data.len() / stride;

        Ok(Geometry {
            vao,
            vbo,
            vertices,
            attributes: self.attributes,
        })
    }
}

fn stride(attributes: &[VertexAttribute]) -> usize {
    attributes.iter().map(|a| a.size()).sum()
}

#[derive(Debug, Error)]
pub enum GBError {
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Driver returned no buffer handle")]
    Allocation,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexAttribute {
    Float,
    Vec2,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
        }
    }
}

pub struct Geometry {
    vao: GLuint,
    vbo: GLuint,
    vertices: usize,
    attributes: Vec<VertexAttribute>,
}

impl Geometry {
    pub fn vertices(&self) -> usize {
        self.vertices
    }

    /// Binds the buffer and points each attribute at its program location.
    /// `locations` pairs up with the attributes in the order they were added.
    pub fn bind(&self, locations: &[GLuint]) {
        let stride = stride(&self.attributes) * std::mem::size_of::<f32>();
        let mut offset = 0;

        unsafe {
            gl::BindVertexArray(self.vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);

            for (attr, location) in self.attributes.iter().zip(locations) {
                gl::VertexAttribPointer(
                    *location,
                    attr.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    stride as i32,
                    (offset * std::mem::size_of::<f32>()) as *const c_void,
                );
                gl::EnableVertexAttribArray(*location);
                offset += attr.size();
            }
        }
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}
