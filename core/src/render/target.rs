//! Render targets.
//!
//! The only target is an indexed-color framebuffer. There is no depth
//! buffer; visibility is resolved by drawing faces back to front.

use crate::util::{Dims, buf::Buf2};

use super::raster::Scanline;
use super::tex::{TRANSPARENT, Texture};

/// Stipple patterns approximating increasing levels of opacity, from 2/16
/// to 15/16 of pixels drawn.
///
/// Bit `(y % 4) * 4 + x % 4` of a pattern, counting from the least
/// significant bit, tells whether the pixel at (x, y) is drawn.
pub const STIPPLE: [u16; 8] = [
    0x8020, 0xA0A0, 0xA4A1, 0xA5A5, 0xB5E5, 0xF5F5, 0xFDF7, 0xFFFE,
];

/// Stipple pattern that draws every pixel.
pub const OPAQUE: u16 = 0xFFFF;

/// A framebuffer of 8-bit palette indices with a stipple write mask.
#[derive(Clone, Debug, PartialEq)]
pub struct Framebuf {
    pub buf: Buf2<u8>,
    mask: u16,
}

impl Framebuf {
    /// Returns a framebuffer of size `dims` filled with color 0.
    pub fn new((w, h): Dims) -> Self {
        Self {
            buf: Buf2::new_default(w as usize, h as usize),
            mask: OPAQUE,
        }
    }

    /// Returns the width and height of `self`.
    pub fn dims(&self) -> Dims {
        (self.buf.width() as u32, self.buf.height() as u32)
    }

    /// Fills `self` with `color`.
    pub fn clear(&mut self, color: u8) {
        self.buf.fill(color);
    }

    /// Returns the current stipple mask.
    pub fn mask(&self) -> u16 {
        self.mask
    }

    /// Sets the stipple mask applied to subsequent writes.
    pub fn set_mask(&mut self, mask: u16) {
        self.mask = mask;
    }

    /// Sets the stipple mask approximating `opacity`.
    ///
    /// Opacities at or above `threshold` are drawn opaque, those at or
    /// below zero not at all. Others select one of the [`STIPPLE`]
    /// patterns.
    pub fn set_opacity(&mut self, opacity: f32, threshold: f32) {
        self.mask = if opacity >= threshold {
            OPAQUE
        } else if !(opacity > 0.0) {
            0
        } else {
            STIPPLE[((opacity * 8.0) as usize).min(7)]
        };
    }

    /// Returns whether the mask allows writing the pixel at (x, y).
    #[inline]
    pub fn is_drawn(&self, x: usize, y: usize) -> bool {
        let bit = (y & 3) * 4 + (x & 3);
        self.mask & (1 << bit) != 0
    }

    /// Writes `color` to (x, y) if in bounds and allowed by the mask.
    #[inline]
    pub fn plot(&mut self, x: usize, y: usize, color: u8) {
        if self.is_drawn(x, y) {
            if let Some(px) = self.buf.get_mut(x as i32, y as i32) {
                *px = color;
            }
        }
    }

    /// Textures the pixels of `sl` with `tex`, skipping transparent texels.
    ///
    /// Returns the number of pixels written.
    pub fn draw_scanline(&mut self, mut sl: Scanline, tex: &Texture) -> usize {
        let (mask, y) = (self.mask, sl.y);
        let row = &mut self.buf[y][sl.xs.clone()];
        let x0 = sl.xs.start;
        let mut n = 0;
        for frag in sl.fragments() {
            let bit = (y & 3) * 4 + (frag.x & 3);
            if mask & (1 << bit) == 0 {
                continue;
            }
            let c = tex.sample(frag.uv);
            if c != TRANSPARENT {
                row[frag.x - x0] = c;
                n += 1;
            }
        }
        n
    }
}
