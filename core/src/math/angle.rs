//! Angular quantities and conversions between directions and angles.

use core::f32::consts::{PI, TAU};
use core::fmt::{self, Debug, Display};
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use super::approx::ApproxEq;
use super::float::f32 as fp;
use super::vec::{Vec3, vec3};

/// A scalar angular quantity.
///
/// Prevents confusion between degrees and radians by requiring the use of
/// one of the named constructors to create an `Angle`, and one of the named
/// getters to obtain the raw value.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Angle(f32);

const RADS_PER_DEG: f32 = PI / 180.0;

/// Returns an angle of `a` radians.
#[inline]
pub const fn rads(a: f32) -> Angle {
    Angle(a)
}

/// Returns an angle of `a` degrees.
#[inline]
pub const fn degs(a: f32) -> Angle {
    Angle(a * RADS_PER_DEG)
}

/// Returns an angle of `a` turns.
#[inline]
pub const fn turns(a: f32) -> Angle {
    Angle(a * TAU)
}

/// Returns the four-quadrant arctangent of `y` and `x` as an `Angle`.
///
/// The result is in the range (-180°, 180°]. Returns zero if both
/// arguments are zero.
#[inline]
pub fn atan2(y: f32, x: f32) -> Angle {
    if y == 0.0 && x == 0.0 {
        return Angle(0.0);
    }
    Angle(fp::atan2(y, x))
}

/// Returns the yaw and pitch angles that turn the +z axis to point
/// in the direction of `dir`.
///
/// Yaw is a rotation about the y-axis, positive turning +z towards +x.
/// Pitch is a rotation about the x-axis, positive turning +z towards -y,
/// that is, looking down. The inverse of [`angles_to_dir`].
///
/// A zero vector yields zero angles.
///
/// # Examples
/// ```
/// use facet_core::assert_approx_eq;
/// use facet_core::math::{degs, dir_to_angles, vec3, Vec3};
/// let (yaw, pitch) = dir_to_angles::<()>(vec3(1.0, 0.0, 0.0));
/// assert_approx_eq!(yaw, degs(90.0));
/// assert_approx_eq!(pitch, degs(0.0));
/// ```
pub fn dir_to_angles<B>(dir: Vec3<B>) -> (Angle, Angle) {
    let horiz = fp::sqrt(dir.x() * dir.x() + dir.z() * dir.z());
    (atan2(dir.x(), dir.z()), atan2(-dir.y(), horiz))
}

/// Returns the unit direction vector obtained by turning the +z axis by
/// `pitch` about the x-axis and then by `yaw` about the y-axis.
///
/// The inverse of [`dir_to_angles`].
pub fn angles_to_dir<B>(yaw: Angle, pitch: Angle) -> Vec3<B> {
    let (sy, cy) = yaw.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    vec3(sy * cp, -sp, cy * cp)
}

impl Angle {
    /// A zero angle.
    pub const ZERO: Self = Self(0.0);
    /// A right angle.
    pub const RIGHT: Self = Self(PI / 2.0);
    /// A straight angle.
    pub const STRAIGHT: Self = Self(PI);
    /// A full angle.
    pub const FULL: Self = Self(TAU);

    /// Returns the value of `self` in radians.
    #[inline]
    pub const fn to_rads(self) -> f32 {
        self.0
    }
    /// Returns the value of `self` in degrees.
    #[inline]
    pub fn to_degs(self) -> f32 {
        self.0 / RADS_PER_DEG
    }

    #[inline]
    pub fn sin(self) -> f32 {
        fp::sin(self.0)
    }
    #[inline]
    pub fn cos(self) -> f32 {
        fp::cos(self.0)
    }
    #[inline]
    pub fn sin_cos(self) -> (f32, f32) {
        (self.sin(), self.cos())
    }
    #[inline]
    pub fn tan(self) -> f32 {
        fp::tan(self.0)
    }

    /// Returns the absolute value of `self`.
    #[inline]
    pub fn abs(self) -> Self {
        Self(fp::abs(self.0))
    }

    /// Returns `self` wrapped to the range [-180°, 180°).
    ///
    /// # Examples
    /// ```
    /// use facet_core::assert_approx_eq;
    /// use facet_core::math::degs;
    /// assert_approx_eq!(degs(270.0).wrap(), degs(-90.0));
    /// assert_approx_eq!(degs(-200.0).wrap(), degs(160.0));
    /// ```
    pub fn wrap(self) -> Self {
        let x = self.0 + PI;
        Self(x - TAU * fp::floor(x / TAU) - PI)
    }

    /// Returns the smaller of `self` and `other`.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Returns `self` clamped to the range `min..=max`.
    #[inline]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self(self.0.clamp(min.0, max.0))
    }
}

impl ApproxEq<Self, f32> for Angle {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

impl Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.to_degs())
    }
}

impl Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl Add for Angle {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}
impl Sub for Angle {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}
impl AddAssign for Angle {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}
impl SubAssign for Angle {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}
impl Neg for Angle {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}
impl Mul<f32> for Angle {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self(self.0 * rhs)
    }
}
impl Div<f32> for Angle {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self(self.0 / rhs)
    }
}
impl Div for Angle {
    type Output = f32;
    #[inline]
    fn div(self, rhs: Self) -> f32 {
        self.0 / rhs.0
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::vec::Vec3;

    use super::*;

    #[test]
    fn unit_conversions() {
        assert_approx_eq!(degs(180.0).to_rads(), PI);
        assert_approx_eq!(turns(0.25).to_degs(), 90.0);
        assert_approx_eq!(rads(PI).to_degs(), 180.0);
    }

    #[test]
    fn trig() {
        assert_approx_eq!(degs(90.0).sin(), 1.0);
        assert_approx_eq!(degs(60.0).cos(), 0.5);
        assert_approx_eq!(degs(45.0).tan(), 1.0);
    }

    #[test]
    fn atan2_of_zero_is_zero() {
        assert_eq!(atan2(0.0, 0.0), Angle::ZERO);
    }

    #[test]
    fn forward_is_plus_z() {
        let d: Vec3 = angles_to_dir(degs(0.0), degs(0.0));
        assert_approx_eq!(d, vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn positive_pitch_looks_down() {
        let d: Vec3 = angles_to_dir(degs(0.0), degs(90.0));
        assert_approx_eq!(d, vec3(0.0, -1.0, 0.0));
    }

    #[test]
    fn dir_angles_roundtrip() {
        for (yaw, pitch) in [(30.0, 10.0), (-120.0, -45.0), (170.0, 80.0)] {
            let d: Vec3 = angles_to_dir(degs(yaw), degs(pitch));
            let (y, p) = dir_to_angles(d * 3.0);
            assert_approx_eq!(y.to_degs(), yaw, eps = 1e-4);
            assert_approx_eq!(p.to_degs(), pitch, eps = 1e-4);
        }
    }

    #[test]
    fn dir_to_angles_of_zero_is_zero() {
        let (y, p) = dir_to_angles(Vec3::<()>::zero());
        assert_eq!((y, p), (Angle::ZERO, Angle::ZERO));
    }
}
