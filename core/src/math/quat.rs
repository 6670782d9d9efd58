//! Unit quaternions for representing and smoothly interpolating rotations.

use core::ops::{Mul, Neg};

use super::angle::{Angle, dir_to_angles, rads};
use super::approx::ApproxEq;
use super::float::f32 as fp;
use super::mat::Mat3;
use super::vec::{Vec3, vec3};

/// A quaternion `w + xi + yj + zk`.
///
/// Only unit quaternions represent rotations; the constructors in this
/// module return unit quaternions, and [`slerp`][Self::slerp] and
/// [`turn_towards`][Self::turn_towards] preserve unit length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quat {
    pub w: f32,
    pub v: Vec3,
}

/// Above this dot product, slerp falls back to normalized lerp to avoid
/// dividing by a vanishing sine.
const SLERP_LINEAR_THRESHOLD: f32 = 0.9995;

impl Quat {
    /// The identity rotation.
    pub const IDENTITY: Self = Self { w: 1.0, v: vec3(0.0, 0.0, 0.0) };

    /// Returns a rotation by `angle` about `axis`.
    ///
    /// `axis` need not be normalized, but must be nonzero.
    pub fn from_axis_angle<B>(axis: Vec3<B>, angle: Angle) -> Self {
        let (s, c) = (angle / 2.0).sin_cos();
        let axis: Vec3 = axis.normalize().to();
        Self { w: c, v: axis * s }
    }

    /// Returns the rotation that turns the +z axis to point along `dir`
    /// without rolling, that is, keeping the local x-axis horizontal.
    ///
    /// A zero `dir` yields the identity.
    pub fn from_dir<B>(dir: Vec3<B>) -> Self {
        let (yaw, pitch) = dir_to_angles(dir);
        Self::from_yaw_pitch(yaw, pitch)
    }

    /// Returns the rotation that first pitches by `pitch` about the x-axis
    /// and then yaws by `yaw` about the y-axis.
    pub fn from_yaw_pitch(yaw: Angle, pitch: Angle) -> Self {
        let y = Self::from_axis_angle(Vec3::<()>::Y, yaw);
        let p = Self::from_axis_angle(Vec3::<()>::X, pitch);
        y * p
    }

    /// Returns the direction that `self` turns the +z axis to.
    pub fn to_dir<B>(&self) -> Vec3<B> {
        self.rotate(&Vec3::Z)
    }

    /// Returns the yaw and pitch angles of [`to_dir`][Self::to_dir].
    pub fn to_angles(&self) -> (Angle, Angle) {
        dir_to_angles::<()>(self.to_dir())
    }

    /// Rotates `v` by `self`.
    pub fn rotate<B>(&self, v: &Vec3<B>) -> Vec3<B> {
        let q: Vec3<B> = self.v.to();
        let t = q.cross(v) * 2.0;
        *v + t * self.w + q.cross(&t)
    }

    /// Returns the rotation matrix equivalent to `self`.
    pub fn to_mat3(&self) -> Mat3 {
        let cols: [Vec3; 3] =
            [Vec3::X, Vec3::Y, Vec3::Z].map(|e| self.rotate(&e));
        Mat3(core::array::from_fn(|i| cols.map(|c| c[i])))
    }

    /// Returns the four-dimensional dot product of `self` and `other`.
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.w * other.w + self.v.dot(&other.v)
    }

    /// Returns `self` scaled to unit length.
    pub fn normalize(&self) -> Self {
        let len = fp::sqrt(self.dot(self));
        if len == 0.0 {
            return Self::IDENTITY;
        }
        let r = len.recip();
        Self { w: self.w * r, v: self.v * r }
    }

    /// Returns the angle of the shortest rotation from `self` to `other`.
    pub fn angle_to(&self, other: &Self) -> Angle {
        let d = fp::abs(self.dot(other)).min(1.0);
        rads(2.0 * fp::acos(d))
    }

    /// Spherically interpolates between `self` and `other`.
    ///
    /// Follows the shorter of the two arcs. Returns `self` if `t` = 0 and
    /// a rotation equal to `other` if `t` = 1.
    pub fn slerp(&self, other: &Self, t: f32) -> Self {
        let mut d = self.dot(other);
        let mut to = *other;
        if d < 0.0 {
            d = -d;
            to = -to;
        }
        if d > SLERP_LINEAR_THRESHOLD {
            let w = self.w + t * (to.w - self.w);
            let v = self.v + (to.v - self.v) * t;
            return Self { w, v }.normalize();
        }
        let theta = fp::acos(d);
        let sin_theta = fp::sin(theta);
        let a = fp::sin((1.0 - t) * theta) / sin_theta;
        let b = fp::sin(t * theta) / sin_theta;
        Self {
            w: a * self.w + b * to.w,
            v: self.v * a + to.v * b,
        }
    }

    /// Returns `self` turned towards `target` by at most `max_turn`.
    ///
    /// If `target` is within `max_turn` of `self`, returns `target`.
    ///
    /// # Examples
    /// ```
    /// use facet_core::assert_approx_eq;
    /// use facet_core::math::{degs, Quat};
    /// let from = Quat::from_yaw_pitch(degs(0.0), degs(0.0));
    /// let to = Quat::from_yaw_pitch(degs(90.0), degs(0.0));
    /// let q = from.turn_towards(&to, degs(30.0));
    /// assert_approx_eq!(q.to_angles().0, degs(30.0), eps = 1e-4);
    /// ```
    pub fn turn_towards(&self, target: &Self, max_turn: Angle) -> Self {
        let angle = self.angle_to(target);
        if angle <= max_turn.abs() || angle == Angle::ZERO {
            *target
        } else {
            self.slerp(target, max_turn.abs() / angle)
        }
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quat {
    type Output = Self;

    /// Returns the Hamilton product of `self` and `rhs`, the rotation that
    /// applies `rhs` first and then `self`.
    fn mul(self, rhs: Self) -> Self {
        Self {
            w: self.w * rhs.w - self.v.dot(&rhs.v),
            v: rhs.v * self.w + self.v * rhs.w + self.v.cross(&rhs.v),
        }
    }
}

impl Neg for Quat {
    type Output = Self;
    fn neg(self) -> Self {
        Self { w: -self.w, v: -self.v }
    }
}

impl ApproxEq<Self, f32> for Quat {
    /// Compares as rotations: `q` and `-q` are approximately equal.
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        let same = |o: &Self| {
            self.w.approx_eq_eps(&o.w, eps) && self.v.approx_eq_eps(&o.v, eps)
        };
        same(other) || same(&-*other)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}
