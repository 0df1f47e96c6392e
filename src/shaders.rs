/// Attribute fed from the vertex buffer.
pub const POSITION_ATTRIBUTE: &str = "position";
/// Uniform replacing the vertex whose `y` is exactly `1.0`.
pub const TOP_VERTEX_UNIFORM: &str = "top_vertex";

#[derive(Debug, Copy, Clone)]
pub struct ShaderSources<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

impl ShaderSources<'static> {
    pub fn triangle() -> Self {
        Self {
            vertex: include_str!("gl_shaders/triangle.glsl"),
            fragment: include_str!("gl_shaders/red.glsl"),
        }
    }
}

impl Default for ShaderSources<'static> {
    fn default() -> Self {
        Self::triangle()
    }
}
