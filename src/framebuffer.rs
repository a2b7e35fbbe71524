use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

/// Scale the R/G/B channels by `factor`, keeping the packed upper byte.
#[inline]
pub fn darken(color: u32, factor: f32) -> u32 {
    let a = color & 0xFF00_0000;
    let r = (((color >> 16) & 0xFF) as f32 * factor).min(255.0) as u32;
    let g = (((color >> 8) & 0xFF) as f32 * factor).min(255.0) as u32;
    let b = ((color & 0xFF) as f32 * factor).min(255.0) as u32;
    a | (r << 16) | (g << 8) | b
}

/// Mutable view over an externally owned pixel buffer.
///
/// The renderer never allocates pixels itself; it borrows the buffer for the
/// duration of one frame and writes through `set_pixel`.
pub struct Frame<'a> {
    buf: &'a mut [u32],
    width: usize,
    height: usize,
}

impl<'a> Frame<'a> {
    pub fn new(buf: &'a mut [u32], width: usize, height: usize) -> Self {
        debug_assert_eq!(buf.len(), width * height);
        Self { buf, width, height }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        debug_assert!(x < self.width && y < self.height);
        self.buf[y * self.width + x] = color;
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.buf[y * self.width + x]
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        let x0 = x.min(self.width);
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        for row in y.min(self.height)..y1 {
            let base = row * self.width;
            self.buf[base + x0..base + x1].fill(color);
        }
    }

    /// DDA line, clipped per pixel.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: u32) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil() as usize;
        if steps == 0 {
            return;
        }
        let x_inc = dx / steps as f32;
        let y_inc = dy / steps as f32;
        let mut x = x0;
        let mut y = y0;
        for _ in 0..steps {
            let (px, py) = (x.round(), y.round());
            if px >= 0.0 && py >= 0.0 && (px as usize) < self.width && (py as usize) < self.height
            {
                self.set_pixel(px as usize, py as usize, color);
            }
            x += x_inc;
            y += y_inc;
        }
    }
}

/// Nearest-neighbor stretch of the internal framebuffer onto the window
/// surface. Rows are processed in parallel for cache friendly writes.
pub fn blit_stretch(dst: &mut [u32], dw: usize, dh: usize, src: &[u32], sw: usize, sh: usize) {
    if dw == 0 || dh == 0 || sw == 0 || sh == 0 {
        return;
    }
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let sy = (y * sh / dh).min(sh - 1);
        let src_row = &src[sy * sw..(sy + 1) * sw];
        for (x, out) in dst_row.iter_mut().enumerate() {
            let sx = (x * sw / dw).min(sw - 1);
            *out = src_row[sx];
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_rgb_lays_out_channels() {
        assert_eq!(pack_rgb(0xFF, 0x00, 0x00), 0x00FF_0000);
        assert_eq!(pack_rgb(0x00, 0xFF, 0x00), 0x0000_FF00);
        assert_eq!(pack_rgb(0x00, 0x00, 0xFF), 0x0000_00FF);
    }

    #[test]
    fn darken_scales_channels_and_keeps_upper_byte() {
        let c = 0xFF00_0000 | pack_rgb(200, 100, 50);
        let d = darken(c, 0.5);
        assert_eq!(d & 0xFF00_0000, 0xFF00_0000);
        assert_eq!((d >> 16) & 0xFF, 100);
        assert_eq!((d >> 8) & 0xFF, 50);
        assert_eq!(d & 0xFF, 25);
    }

    #[test]
    fn fill_rect_clips_to_frame() {
        let mut buf = vec![0u32; 4 * 4];
        let mut frame = Frame::new(&mut buf, 4, 4);
        frame.fill_rect(2, 2, 10, 10, 7);
        assert_eq!(frame.pixel(3, 3), 7);
        assert_eq!(frame.pixel(1, 1), 0);
    }

    #[test]
    fn blit_stretch_doubles_pixels() {
        let src = vec![1u32, 2, 3, 4]; // 2x2
        let mut dst = vec![0u32; 16]; // 4x4
        blit_stretch(&mut dst, 4, 4, &src, 2, 2);
        assert_eq!(dst[0], 1);
        assert_eq!(dst[3], 2);
        assert_eq!(dst[12], 3);
        assert_eq!(dst[15], 4);
    }
}
