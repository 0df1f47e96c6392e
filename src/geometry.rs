use cgmath::Vector2;

pub const SURFACE_WIDTH: u32 = 640;
pub const SURFACE_HEIGHT: u32 = 480;

/// Top, bottom left, bottom right in normalized device coordinates.
#[rustfmt::skip]
pub const TRIANGLE: [f32; 6] = [
    0.0, 1.0,
    -1.0, -1.0,
    1.0, -1.0,
];

/// Where the top vertex sits until the pointer moves.
pub fn default_top() -> Vector2<f32> {
    Vector2::new(TRIANGLE[0], TRIANGLE[1])
}
