//! Indexed-color textures and texture storage.

use alloc::vec::Vec;

use crate::math::float::f32 as fp;
use crate::math::vec::{Vec2, vec2};
use crate::util::buf::Buf2;

/// Basis of the texture space.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Tex;

/// Normalized texture coordinates, (0, 0) being the top left corner and
/// (1, 1) the bottom right corner of the texture.
pub type TexCoord = Vec2<Tex>;

/// Returns a new texture coordinate pair.
#[inline]
pub const fn uv(u: f32, v: f32) -> TexCoord {
    vec2(u, v)
}

impl TexCoord {
    #[inline]
    pub const fn u(&self) -> f32 {
        self.0[0]
    }
    #[inline]
    pub const fn v(&self) -> f32 {
        self.0[1]
    }
}

/// Identifies a texture in a [`TextureStore`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TexId(pub u16);

/// Color index of transparent texels.
pub const TRANSPARENT: u8 = 0;

/// A texture of 8-bit color indices into a palette.
///
/// Index [`TRANSPARENT`] is never drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    buf: Buf2<u8>,
}

impl Texture {
    /// Returns a texture with the given texels.
    ///
    /// # Panics
    /// If `buf` has zero width or height.
    pub fn new(buf: Buf2<u8>) -> Self {
        assert!(
            buf.width() > 0 && buf.height() > 0,
            "texture must not be empty"
        );
        Self { buf }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.buf.width()
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.buf.height()
    }

    /// Returns the texel buffer of `self`.
    pub fn buf(&self) -> &Buf2<u8> {
        &self.buf
    }

    /// Returns the texel at (x, y), wrapping around at the edges.
    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> u8 {
        let x = x.rem_euclid(self.width() as i32) as usize;
        let y = y.rem_euclid(self.height() as i32) as usize;
        self.buf[[x, y]]
    }

    /// Returns the texel nearest to `tc`, repeating the texture beyond the
    /// unit square.
    ///
    /// # Examples
    /// ```
    /// use facet_core::render::tex::{uv, Texture};
    /// use facet_core::util::buf::Buf2;
    /// let tex = Texture::new(Buf2::new(2, 2, [1, 2, 3, 4]));
    /// assert_eq!(tex.sample(uv(0.0, 0.0)), 1);
    /// assert_eq!(tex.sample(uv(0.75, 0.25)), 2);
    /// assert_eq!(tex.sample(uv(1.25, 0.75)), 3);
    /// ```
    #[inline]
    pub fn sample(&self, tc: TexCoord) -> u8 {
        let x = fp::floor(tc.u() * self.width() as f32) as i32;
        let y = fp::floor(tc.v() * self.height() as f32) as i32;
        self.texel(x, y)
    }

    /// Returns a new texture with each non-transparent texel replaced by
    /// `f(texel)`. Transparent texels stay transparent.
    pub fn remap(&self, mut f: impl FnMut(u8) -> u8) -> Self {
        let (w, h) = (self.width(), self.height());
        let texels = self.buf.data().iter().map(|&c| match c {
            TRANSPARENT => TRANSPARENT,
            c => f(c),
        });
        Self { buf: Buf2::new(w, h, texels) }
    }
}

/// Storage of textures by id.
///
/// The brightness cache reads base textures from a store and writes the
/// variants it generates back into it.
pub trait TextureStore {
    /// Returns the texture with id `id`, if any.
    fn get(&self, id: TexId) -> Option<&Texture>;

    /// Stores `tex` with id `id`, replacing any previous texture.
    fn set(&mut self, id: TexId, tex: Texture);
}

/// A simple in-memory texture store backed by a vector.
#[derive(Clone, Debug, Default)]
pub struct Textures(Vec<Option<Texture>>);

impl Textures {
    /// Returns an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tex` to the first unused id and returns that id.
    ///
    /// # Panics
    /// If all ids are in use.
    pub fn push(&mut self, tex: Texture) -> TexId {
        let i = match self.0.iter().position(Option::is_none) {
            Some(i) => i,
            None => {
                self.0.push(None);
                self.0.len() - 1
            }
        };
        assert!(i <= u16::MAX as usize, "texture ids exhausted");
        self.0[i] = Some(tex);
        TexId(i as u16)
    }

    /// Returns the number of ids in use.
    pub fn len(&self) -> usize {
        self.0.iter().flatten().count()
    }

    /// Returns whether `self` contains no textures.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TextureStore for Textures {
    fn get(&self, id: TexId) -> Option<&Texture> {
        self.0.get(id.0 as usize)?.as_ref()
    }

    fn set(&mut self, id: TexId, tex: Texture) {
        let i = id.0 as usize;
        if i >= self.0.len() {
            self.0.resize(i + 1, None);
        }
        self.0[i] = Some(tex);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tex() -> Texture {
        Texture::new(Buf2::new(2, 2, [0, 1, 2, 3]))
    }

    #[test]
    fn sample_repeats() {
        let t = tex();
        assert_eq!(t.sample(uv(0.25, 0.25)), 0);
        assert_eq!(t.sample(uv(0.75, 0.25)), 1);
        assert_eq!(t.sample(uv(0.25, 0.75)), 2);
        assert_eq!(t.sample(uv(-0.25, -0.25)), 3);
        assert_eq!(t.sample(uv(4.75, 0.25)), 1);
    }

    #[test]
    fn remap_keeps_transparent() {
        let t = tex().remap(|c| c + 10);
        assert_eq!(t.buf().data(), &[0, 11, 12, 13]);
    }

    #[test]
    #[should_panic]
    fn empty_texture_panics() {
        let _ = Texture::new(Buf2::new(0, 3, []));
    }

    #[test]
    fn store_push_get_set() {
        let mut ts = Textures::new();
        assert!(ts.is_empty());
        let a = ts.push(tex());
        let b = ts.push(tex().remap(|_| 5));
        assert_eq!((a, b), (TexId(0), TexId(1)));

        assert_eq!(ts.get(b).unwrap().texel(1, 1), 5);
        assert!(ts.get(TexId(9)).is_none());

        ts.set(TexId(4), tex());
        assert!(ts.get(TexId(3)).is_none());
        assert!(ts.get(TexId(4)).is_some());
        assert_eq!(ts.len(), 3);
        // Gaps are filled first
        assert_eq!(ts.push(tex()), TexId(2));
    }
}
