use cgmath::Vector2;

/// Maps a pixel offset inside a `width` x `height` surface to normalized
/// device coordinates, flipping Y so that the top left corner is `(-1, 1)`.
///
/// Offsets outside the surface map outside `[-1, 1]`. Returns `None` for an
/// empty surface.
pub fn to_ndc(px: f64, py: f64, width: u32, height: u32) -> Option<Vector2<f32>> {
    if width == 0 || height == 0 {
        return None;
    }

    let x = (px / width as f64) * 2.0 - 1.0;
    let y = 1.0 - (py / height as f64) * 2.0;

    Some(Vector2::new(x as f32, y as f32))
}
