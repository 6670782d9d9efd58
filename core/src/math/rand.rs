//! Pseudo-random number generation.
//!
//! Used for scattering scenery in the demos and for generating test and
//! benchmark inputs. Deterministic for a given seed.

use core::ops::Range;

use super::vec::{Vec3, vec3};

/// Trait for generating values sampled from a probability distribution.
pub trait Distrib: Clone {
    /// The type of the values sampled.
    type Sample;

    /// Returns a pseudo-random value sampled from `self`.
    fn sample(&self, rng: &mut Xorshift64) -> Self::Sample;

    /// Returns an infinite iterator of samples from `self`.
    fn iter(&self, rng: Xorshift64) -> Iter<Self> {
        Iter(self.clone(), rng)
    }
}

/// A pseudo-random number generator using the [Xorshift][^1] algorithm
/// to generate 64 bits of randomness at a time.
///
/// Has a period of 2<sup>64</sup>-1: every number in [1, 2<sup>64</sup>)
/// is yielded exactly once before the sequence repeats.
///
/// [^1]: Marsaglia, G. (2003). Xorshift RNGs. Journal of Statistical Software,
///     8(14), 1–6. <https://doi.org/10.18637/jss.v008.i14>
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct Xorshift64(u64);

/// A uniform distribution of values in a half-open range.
#[derive(Clone, Debug)]
pub struct Uniform<T>(pub Range<T>);

/// A uniform distribution of unit vectors.
#[derive(Copy, Clone, Debug, Default)]
pub struct UnitSphere;

/// Iterator returned by [`Distrib::iter`].
#[derive(Clone, Debug)]
pub struct Iter<D>(D, Xorshift64);

impl Xorshift64 {
    /// Seed of the generator returned by [`Xorshift64::default`].
    pub const DEFAULT_SEED: u64 = 378682147834061;

    /// Returns a new generator seeded by `seed`.
    ///
    /// # Panics
    /// If `seed` is zero.
    pub fn from_seed(seed: u64) -> Self {
        assert_ne!(seed, 0, "xorshift seed cannot be zero");
        Self(seed)
    }

    /// Returns 64 bits of pseudo-randomness.
    pub fn next_bits(&mut self) -> u64 {
        let Self(x) = self;
        *x ^= *x << 13;
        *x ^= *x >> 7;
        *x ^= *x << 17;
        *x
    }
}

impl Default for Xorshift64 {
    fn default() -> Self {
        Self::from_seed(Self::DEFAULT_SEED)
    }
}

impl<D: Distrib> Iterator for Iter<D> {
    type Item = D::Sample;

    fn next(&mut self) -> Option<D::Sample> {
        Some(self.0.sample(&mut self.1))
    }
}

impl Distrib for Uniform<i32> {
    type Sample = i32;

    /// Returns a uniformly distributed `i32` in the range.
    fn sample(&self, rng: &mut Xorshift64) -> i32 {
        let Range { start, end } = self.0;
        let n = (end as i64 - start as i64).max(1) as u64;
        (start as i64 + (rng.next_bits() % n) as i64) as i32
    }
}

impl Distrib for Uniform<f32> {
    type Sample = f32;

    /// Returns a uniformly distributed `f32` in the range.
    fn sample(&self, rng: &mut Xorshift64) -> f32 {
        let Range { start, end } = self.0;
        // Bits of a random f32 in 1.0..2.0
        let bits = (127 << 23 | rng.next_bits() >> 41) as u32;
        let unit = f32::from_bits(bits) - 1.0;
        start + unit * (end - start)
    }
}

impl<B> Distrib for Uniform<Vec3<B>> {
    type Sample = Vec3<B>;

    /// Returns a vector uniformly distributed in the axis-aligned box
    /// spanned by the range.
    fn sample(&self, rng: &mut Xorshift64) -> Vec3<B> {
        let Range { start, end } = self.0;
        let mut c = |i: usize| Uniform(start[i]..end[i]).sample(rng);
        vec3(c(0), c(1), c(2))
    }
}

impl Distrib for UnitSphere {
    type Sample = Vec3;

    /// Returns a vector uniformly distributed on the unit sphere.
    fn sample(&self, rng: &mut Xorshift64) -> Vec3 {
        let d = Uniform(vec3(-1.0, -1.0, -1.0)..vec3(1.0, 1.0, 1.0));
        loop {
            let v: Vec3 = d.sample(rng);
            let len_sqr = v.len_sqr();
            // Rejection sampling keeps the distribution uniform
            if len_sqr > 1e-6 && len_sqr <= 1.0 {
                return v.normalize();
            }
        }
    }
}
