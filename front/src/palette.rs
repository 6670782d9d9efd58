//! Mapping palette indices to displayable colors.

/// A table of 256 RGB colors for presenting indexed-color framebuffers.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    rgb: [[u8; 3]; 256],
    // Colors pre-packed as 0x00_RR_GG_BB
    packed: [u32; 256],
}

impl Palette {
    /// Returns a palette with the given colors.
    pub fn new(rgb: [[u8; 3]; 256]) -> Self {
        let packed = rgb.map(|[r, g, b]| {
            (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
        });
        Self { rgb, packed }
    }

    /// Returns a palette of 256 shades from black to white.
    pub fn grayscale() -> Self {
        Self::new(core::array::from_fn(|i| [i as u8; 3]))
    }

    /// Returns a palette of eight hues in 32 shades each, darkest first.
    ///
    /// Index 0 is black. Index `32 * h + s` is shade `s` of hue `h`,
    /// where hue 0 is gray and 1 to 7 are the combinations of red, green,
    /// and blue.
    pub fn ramps() -> Self {
        Self::new(core::array::from_fn(|i| {
            let (hue, shade) = (i / 32, (i % 32) as u32);
            let c = (shade * 255 / 31) as u8;
            let ch = |bit| if hue == 0 || hue & bit != 0 { c } else { 0 };
            [ch(1), ch(2), ch(4)]
        }))
    }

    /// Returns the RGB triplets of `self`.
    pub fn rgb(&self) -> &[[u8; 3]; 256] {
        &self.rgb
    }

    /// Returns the color of index `i` packed as `0x00_RR_GG_BB`.
    #[inline]
    pub fn packed(&self, i: u8) -> u32 {
        self.packed[i as usize]
    }

    /// Converts `indices` to packed colors, writing them to `out`.
    pub fn convert(&self, indices: &[u8], out: &mut [u32]) {
        for (o, &i) in out.iter_mut().zip(indices) {
            *o = self.packed(i);
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::ramps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing() {
        let mut rgb = [[0; 3]; 256];
        rgb[1] = [0x12, 0x34, 0x56];
        let p = Palette::new(rgb);
        assert_eq!(p.packed(1), 0x00_12_34_56);
        assert_eq!(p.packed(2), 0);
    }

    #[test]
    fn ramps() {
        let p = Palette::ramps();
        assert_eq!(p.rgb()[0], [0, 0, 0]);
        assert_eq!(p.rgb()[31], [255, 255, 255]);
        // Hue 1 is red
        assert_eq!(p.rgb()[63], [255, 0, 0]);
        // Hue 6 is green and blue
        assert_eq!(p.rgb()[6 * 32 + 31], [0, 255, 255]);
    }

    #[test]
    fn convert() {
        let p = Palette::grayscale();
        let mut out = [0; 3];
        p.convert(&[0, 1, 255], &mut out);
        assert_eq!(out, [0, 0x01_01_01, 0xFF_FF_FF]);
    }
}
