use cgmath::Vector2;
use thiserror::Error;

use gl_wrapper::geometry::GBError;
use gl_wrapper::program::PBError;

use crate::shaders::ShaderSources;

pub mod opengl;

/// Everything the triangle component needs from a graphics API.
///
/// Resources handed out by a backend release themselves when dropped.
pub trait Backend {
    type Program;
    type Geometry;

    fn build_program(&mut self, sources: ShaderSources<'_>) -> Result<Self::Program, InitError>;

    fn upload_geometry(&mut self, vertices: &[f32]) -> Result<Self::Geometry, InitError>;

    /// Clears, draws the triangle with `top` as its top vertex and presents.
    fn draw_frame(&mut self, program: &Self::Program, geometry: &Self::Geometry, top: Vector2<f32>);

    /// Follows a new surface size in pixels, both are non-zero.
    fn resize(&mut self, width: u32, height: u32);
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Program(#[from] PBError),
    #[error("could not upload geometry: {0}")]
    Geometry(#[from] GBError),
    #[error("program has no active attribute `{0}`")]
    MissingAttribute(&'static str),
    #[error("program has no active uniform `{0}`")]
    MissingUniform(&'static str),
}
