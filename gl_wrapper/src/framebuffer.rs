use std::ffi::c_void;

pub struct FrameBuffer;

impl FrameBuffer {
    pub fn bind_default() {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
        }
    }

    /// Reads the back buffer of the default framebuffer as RGBA8, rows ordered
    /// top to bottom.
    pub fn read_rgba(width: u32, height: u32) -> Vec<u8> {
        let row = width as usize * 4;
        let mut data = vec![0_u8; row * height as usize];

        Self::bind_default();

        unsafe {
            gl::ReadBuffer(gl::BACK);
            gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
            gl::ReadPixels(
                0,
                0,
                width as i32,
                height as i32,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                data.as_mut_ptr() as *mut c_void,
            );
        }

        flip_rows(&mut data, row);

        data
    }
}

/// GL origin is bottom left.
fn flip_rows(data: &mut [u8], row: usize) {
    if row == 0 {
        return;
    }

    let rows = data.len() / row;

    for y in 0..rows / 2 {
        let (top, bottom) = data.split_at_mut((rows - 1 - y) * row);
        top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
    }
}
