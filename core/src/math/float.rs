//! Floating-point compatibility API.
//!
//! Most floating-point functions are unavailable in `no_std`. This module
//! provides them using either `std`, the `libm` crate, or the `micromath`
//! crate, depending on which feature is enabled, under the common name
//! [`f32`]. It also provides the fast reciprocal square root used for
//! normalizing vectors in the hot paths of the renderer.

#[cfg(feature = "libm")]
pub mod libm {
    pub use libm::fabsf as abs;
    pub use libm::floorf as floor;
    pub use libm::sqrtf as sqrt;

    pub use libm::cosf as cos;
    pub use libm::sinf as sin;
    pub use libm::tanf as tan;

    pub use libm::acosf as acos;
    pub use libm::asinf as asin;
    pub use libm::atan2f as atan2;

    #[inline]
    pub fn ceil(x: f32) -> f32 {
        libm::ceilf(x)
    }
    #[inline]
    pub fn round(x: f32) -> f32 {
        libm::roundf(x)
    }
}

#[cfg(feature = "mm")]
pub mod mm {
    use micromath::F32Ext as mm;

    #[inline]
    pub fn abs(x: f32) -> f32 {
        mm::abs(x)
    }
    #[inline]
    pub fn floor(x: f32) -> f32 {
        mm::floor(x)
    }
    #[inline]
    pub fn ceil(x: f32) -> f32 {
        mm::ceil(x)
    }
    #[inline]
    pub fn round(x: f32) -> f32 {
        mm::round(x)
    }
    /// Returns the approximate square root of `x`.
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        let y = mm::sqrt(x);
        // Two rounds of Newton's method
        let y = 0.5 * (y + (x / y));
        0.5 * (y + (x / y))
    }
    #[inline]
    pub fn sin(x: f32) -> f32 {
        mm::sin(x)
    }
    #[inline]
    pub fn cos(x: f32) -> f32 {
        mm::cos(x)
    }
    #[inline]
    pub fn tan(x: f32) -> f32 {
        mm::tan(x)
    }
    #[inline]
    pub fn asin(x: f32) -> f32 {
        mm::asin(x)
    }
    #[inline]
    pub fn acos(x: f32) -> f32 {
        mm::acos(x)
    }
    #[inline]
    pub fn atan2(y: f32, x: f32) -> f32 {
        if y == 0.0 && x == 0.0 {
            // Micromath yields a NaN but others return zero
            return 0.0;
        }
        mm::atan2(y, x)
    }
}

/// Returns a fast approximation of the reciprocal square root of `x`.
///
/// Uses the well-known bit trick followed by one round of Newton–Raphson,
/// trading the last few bits of accuracy for speed. The relative error is
/// below 0.2%.
///
/// Unlike the textbook version, returns exactly 0.0 if `x` is zero,
/// negative, or NaN, so that normalizing a zero vector yields a zero vector
/// instead of infinities or NaNs.
///
/// # Examples
/// ```
/// use facet_core::math::float::fast_recip_sqrt;
/// assert!((fast_recip_sqrt(4.0) - 0.5).abs() < 1e-3);
/// assert_eq!(fast_recip_sqrt(0.0), 0.0);
/// assert_eq!(fast_recip_sqrt(-1.0), 0.0);
/// ```
#[inline]
pub fn fast_recip_sqrt(x: core::primitive::f32) -> core::primitive::f32 {
    // Also catches NaN
    if !(x > 0.0) {
        return 0.0;
    }
    // https://en.wikipedia.org/wiki/Fast_inverse_square_root
    const MAGIC: u32 = 0x5f37_5a86;
    let bits = MAGIC.wrapping_sub(x.to_bits() >> 1);
    let y = core::primitive::f32::from_bits(bits);
    // A round of Newton's method
    y * (1.5 - 0.5 * x * y * y)
}

#[cfg(feature = "std")]
#[allow(non_camel_case_types)]
pub type f32 = core::primitive::f32;

#[cfg(all(feature = "libm", not(feature = "std")))]
pub use libm as f32;

#[cfg(all(feature = "mm", not(feature = "std"), not(feature = "libm")))]
pub use mm as f32;

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use core::f32::consts::*;

    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn fast_recip_sqrt_close_to_exact() {
        for x in [0.01, 0.5, 1.0, 2.0, 9.0, 1234.5, 1e6] {
            let exact = 1.0 / f32::sqrt(x);
            assert_approx_eq!(fast_recip_sqrt(x), exact, eps = 0.002);
        }
    }

    #[test]
    fn fast_recip_sqrt_nonpositive_is_zero() {
        assert_eq!(fast_recip_sqrt(0.0), 0.0);
        assert_eq!(fast_recip_sqrt(-0.0), 0.0);
        assert_eq!(fast_recip_sqrt(-4.0), 0.0);
        assert_eq!(fast_recip_sqrt(core::f32::NAN), 0.0);
    }

    #[cfg(feature = "libm")]
    #[test]
    fn libm_functions() {
        assert_eq!(libm::floor(1.5), 1.0);
        assert_eq!(libm::floor(-1.1), -2.0);
        assert_eq!(libm::ceil(-1.1), -1.0);
        assert_eq!(libm::sqrt(9.0), 3.0);
        assert_approx_eq!(libm::sin(FRAC_PI_6), 0.5);
        assert_eq!(libm::cos(PI), -1.0);
    }

    #[cfg(feature = "mm")]
    #[test]
    fn mm_functions() {
        assert_eq!(mm::floor(1.5), 1.0);
        assert_eq!(mm::floor(-1.1), -2.0);
        assert_approx_eq!(mm::sqrt(9.0), 3.0);
        assert_approx_eq!(mm::sin(FRAC_PI_6), 0.5, eps = 0.01);
        assert_eq!(mm::atan2(0.0, 0.0), 0.0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn std_functions() {
        assert_eq!(f32::floor(-0.0), 0.0);
        assert_eq!(f32::sqrt(9.0), 3.0);
        assert!(f32::sqrt(-1.0).is_nan());
        assert_eq!(f32::cos(PI), -1.0);
    }
}
