// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned ARGB pixel buffers.

use kurbo::Rect;

const OPAQUE: u32 = 0xFF00_0000;

/// A rectangular buffer of `0xAARRGGBB` pixels.
///
/// Reads outside the buffer return `0`; writes outside it are ignored.
/// Buffers created non-transparent keep every pixel fully opaque.
///
/// ```rust
/// use understory_display::BitmapData;
///
/// let mut data = BitmapData::new(4, 4, false, 0x00FF_0000);
/// assert_eq!(data.get_pixel32(0, 0), 0xFFFF_0000);
/// data.set_pixel(1, 1, 0x00_00FF);
/// assert_eq!(data.get_pixel(1, 1), 0x00_00FF);
/// assert_eq!(data.get_pixel(9, 9), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitmapData {
    width: u32,
    height: u32,
    transparent: bool,
    pixels: Vec<u32>,
}

impl BitmapData {
    /// Create a buffer.
    ///
    /// Transparent buffers start fully transparent; opaque ones start filled
    /// with `fill_color` at full alpha.
    pub fn new(width: u32, height: u32, transparent: bool, fill_color: u32) -> Self {
        let initial = if transparent { 0 } else { fill_color | OPAQUE };
        Self {
            width,
            height,
            transparent,
            pixels: vec![initial; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(0, 0, width, height)`.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Whether the buffer keeps per-pixel alpha.
    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw pixels in row-major order.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// `0xRRGGBB` value of a pixel.
    pub fn get_pixel(&self, x: u32, y: u32) -> u32 {
        self.get_pixel32(x, y) & !OPAQUE
    }

    /// `0xAARRGGBB` value of a pixel.
    pub fn get_pixel32(&self, x: u32, y: u32) -> u32 {
        self.offset(x, y).map_or(0, |i| self.pixels[i])
    }

    /// Set the color of a pixel, keeping its alpha.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
        if let Some(i) = self.offset(x, y) {
            let alpha = self.pixels[i] & OPAQUE;
            self.pixels[i] = alpha | (color & !OPAQUE);
        }
    }

    /// Set color and alpha of a pixel. Alpha is ignored for opaque buffers.
    pub fn set_pixel32(&mut self, x: u32, y: u32, color: u32) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = self.normalize(color);
        }
    }

    /// Fill the part of `rect` that lies inside the buffer.
    pub fn fill_rect(&mut self, rect: Rect, color: u32) {
        let clipped = rect.abs().intersect(self.rect()).round();
        if clipped.is_zero_area() {
            return;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "clipped to the buffer, whose dimensions are u32"
        )]
        let (x0, y0, x1, y1) = (
            clipped.x0 as usize,
            clipped.y0 as usize,
            clipped.x1 as usize,
            clipped.y1 as usize,
        );
        let color = self.normalize(color);
        let stride = self.width as usize;
        for row in y0..y1 {
            self.pixels[row * stride + x0..row * stride + x1].fill(color);
        }
    }

    /// Composite part of `source` over this buffer.
    ///
    /// `clip_rect` selects the source pixels and defaults to this buffer's
    /// own rect. The selection lands at the origin, unscaled, and is blended
    /// source-over.
    pub fn draw(&mut self, source: &Self, clip_rect: Option<Rect>) {
        let clip = clip_rect
            .unwrap_or_else(|| self.rect())
            .abs()
            .intersect(source.rect())
            .round();
        if clip.is_zero_area() {
            return;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "clipped to the source, whose dimensions are u32"
        )]
        let (sx, sy, width, height) = (
            clip.x0 as u32,
            clip.y0 as u32,
            (clip.width() as u32).min(self.width),
            (clip.height() as u32).min(self.height),
        );
        for y in 0..height {
            for x in 0..width {
                let src = source.get_pixel32(sx + x, sy + y);
                if let Some(i) = self.offset(x, y) {
                    self.pixels[i] = self.normalize(source_over(src, self.pixels[i]));
                }
            }
        }
    }

    fn normalize(&self, color: u32) -> u32 {
        if self.transparent { color } else { color | OPAQUE }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}

/// Blend two straight-alpha `0xAARRGGBB` pixels, `src` on top.
fn source_over(src: u32, dst: u32) -> u32 {
    let sa = src >> 24;
    match sa {
        0xFF => return src,
        0 => return dst,
        _ => {}
    }
    let da = dst >> 24;
    let rest = 0xFF - sa;
    // Alpha in 255ths of 255ths.
    let alpha = sa * 0xFF + da * rest;
    let channel = |shift: u32| {
        let s = (src >> shift) & 0xFF;
        let d = (dst >> shift) & 0xFF;
        (s * sa * 0xFF + d * da * rest + alpha / 2) / alpha
    };
    (((alpha + 0x7F) / 0xFF) << 24) | (channel(16) << 16) | (channel(8) << 8) | channel(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_buffers_start_clear() {
        let data = BitmapData::new(2, 3, true, 0xFFFF_FFFF);
        assert!(data.pixels().iter().all(|&p| p == 0));
        assert_eq!(data.rect(), Rect::new(0.0, 0.0, 2.0, 3.0));
    }

    #[test]
    fn opaque_buffers_keep_alpha() {
        let mut data = BitmapData::new(2, 2, false, 0x12_3456);
        assert_eq!(data.get_pixel32(1, 1), 0xFF12_3456);
        data.set_pixel32(0, 0, 0x0000_00FF);
        assert_eq!(data.get_pixel32(0, 0), 0xFF00_00FF);
    }

    #[test]
    fn set_pixel_preserves_alpha() {
        let mut data = BitmapData::new(1, 1, true, 0);
        data.set_pixel32(0, 0, 0x8000_0000);
        data.set_pixel(0, 0, 0xFF_FFFF);
        assert_eq!(data.get_pixel32(0, 0), 0x80FF_FFFF);
        assert_eq!(data.get_pixel(0, 0), 0xFF_FFFF);
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut data = BitmapData::new(4, 4, true, 0);
        data.fill_rect(Rect::new(2.0, 2.0, 10.0, 10.0), 0xFF00_FF00);
        assert_eq!(data.get_pixel32(3, 3), 0xFF00_FF00);
        assert_eq!(data.get_pixel32(1, 3), 0);
        let filled = data.pixels().iter().filter(|&&p| p != 0).count();
        assert_eq!(filled, 4);
    }

    #[test]
    fn out_of_range_access_is_ignored() {
        let mut data = BitmapData::new(1, 1, true, 0);
        data.set_pixel32(5, 0, 0xFFFF_FFFF);
        assert_eq!(data.get_pixel32(5, 0), 0);
        assert!(data.pixels().iter().all(|&p| p == 0));
        assert!(BitmapData::new(0, 3, true, 0).is_empty());
    }

    #[test]
    fn draw_copies_the_clipped_source_to_the_origin() {
        let mut source = BitmapData::new(4, 4, true, 0);
        source.set_pixel32(2, 2, 0xFF00_FF00);
        source.set_pixel32(0, 0, 0xFFFF_FFFF);

        let mut target = BitmapData::new(2, 2, true, 0);
        target.draw(&source, Some(Rect::new(2.0, 2.0, 4.0, 4.0)));
        assert_eq!(target.get_pixel32(0, 0), 0xFF00_FF00);
        assert_eq!(target.get_pixel32(1, 1), 0);

        // Without a clip the source is cut to the target's size.
        let mut whole = BitmapData::new(2, 2, true, 0);
        whole.draw(&source, None);
        assert_eq!(whole.get_pixel32(0, 0), 0xFFFF_FFFF);
        assert_eq!(whole.pixels().iter().filter(|&&p| p != 0).count(), 1);

        let mut untouched = BitmapData::new(2, 2, true, 0);
        untouched.draw(&source, Some(Rect::new(9.0, 9.0, 12.0, 12.0)));
        assert!(untouched.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn draw_blends_translucent_pixels() {
        let mut source = BitmapData::new(1, 1, true, 0);
        source.set_pixel32(0, 0, 0x80FF_0000);

        let mut opaque = BitmapData::new(1, 1, false, 0x00_00FF);
        opaque.draw(&source, None);
        assert_eq!(opaque.get_pixel32(0, 0), 0xFF80_007F);

        let mut clear = BitmapData::new(1, 1, true, 0);
        clear.draw(&source, None);
        assert_eq!(clear.get_pixel32(0, 0), 0x80FF_0000);
    }
}
