use std::fs::File;
use std::io::BufWriter;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use cgmath::Vector2;
use gl::types::{GLint, GLuint};
use glutin::context::PossiblyCurrentContext;
use glutin::prelude::*;
use glutin::surface::{Surface, WindowSurface};
use thiserror::Error;

use gl_wrapper::framebuffer::FrameBuffer;
use gl_wrapper::geometry::{Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{Program, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;

use crate::backend::{Backend, InitError};
use crate::shaders::{ShaderSources, POSITION_ATTRIBUTE, TOP_VERTEX_UNIFORM};

/// Linked program together with the slots the frame renderer writes to.
pub struct ProgramInfo {
    pub program: Program,
    pub position: GLuint,
    pub top_vertex: GLint,
}

/// OpenGL backend drawing into a window surface. The context must stay current
/// on the thread that owns the backend.
pub struct GlBackend {
    renderer: GlRenderer,
    // XXX the surface must be dropped before the window it was created for.
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    width: u32,
    height: u32,
    screenshot: Option<PathBuf>,
}

impl GlBackend {
    pub fn new(
        context: PossiblyCurrentContext,
        surface: Surface<WindowSurface>,
        width: u32,
        height: u32,
    ) -> Self {
        let renderer = GlRenderer::new();
        renderer.resize(width, height);

        Self {
            renderer,
            surface,
            context,
            width,
            height,
            screenshot: None,
        }
    }

    /// The next frame gets written to `path` as a PNG before it is presented.
    pub fn capture_next_frame(&mut self, path: PathBuf) {
        self.screenshot = Some(path);
    }

    fn write_screenshot(&self, path: &Path) -> Result<(), CaptureError> {
        let data = FrameBuffer::read_rgba(self.width, self.height);

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;

        Ok(())
    }
}

impl Backend for GlBackend {
    type Program = ProgramInfo;
    type Geometry = Geometry;

    fn build_program(&mut self, sources: ShaderSources<'_>) -> Result<ProgramInfo, InitError> {
        let program = ProgramBuilder::new(sources.vertex, sources.fragment).build()?;

        let position = program
            .attrib_location(POSITION_ATTRIBUTE)
            .ok_or(InitError::MissingAttribute(POSITION_ATTRIBUTE))?;
        let top_vertex = program
            .uniform_location(TOP_VERTEX_UNIFORM)
            .ok_or(InitError::MissingUniform(TOP_VERTEX_UNIFORM))?;

        Ok(ProgramInfo {
            program,
            position,
            top_vertex,
        })
    }

    fn upload_geometry(&mut self, vertices: &[f32]) -> Result<Geometry, InitError> {
        let geometry = GeometryBuilder::new(vertices)
            .with_attribute(VertexAttribute::Vec2)
            .build()?;

        Ok(geometry)
    }

    fn draw_frame(&mut self, info: &ProgramInfo, geometry: &Geometry, top: Vector2<f32>) {
        self.renderer.clear_color(0.0, 0.0, 0.0);

        self.renderer.use_program(&info.program);
        geometry.bind(&[info.position]);
        info.program.set_vec2(info.top_vertex, top.x, top.y);
        self.renderer.draw(geometry, &info.program);

        if let Some(path) = self.screenshot.take() {
            match self.write_screenshot(&path) {
                Ok(()) => log::info!("Wrote frame to {}", path.display()),
                Err(e) => log::error!("Could not write frame to {}: {e}", path.display()),
            }
        }

        if let Err(e) = self.surface.swap_buffers(&self.context) {
            log::error!("Could not present frame: {e}");
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return;
        };

        self.surface.resize(&self.context, w, h);
        self.renderer.resize(width, height);
        self.width = width;
        self.height = height;

        log::debug!("Surface resized to {width}x{height}");
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encoding(#[from] png::EncodingError),
}
