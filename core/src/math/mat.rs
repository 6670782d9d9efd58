//! Rotation matrices.

use core::fmt::{self, Debug, Formatter};

use super::angle::Angle;
use super::approx::ApproxEq;
use super::vec::{Vec3, vec3};

/// A 3×3 matrix of `f32`s, stored in row-major order.
///
/// Used to represent rotations. Vectors are treated as columns, so the
/// product `M * v` applies the map `M` to `v`; see [`apply`][Self::apply].
#[derive(Copy, Clone, PartialEq)]
pub struct Mat3(pub [[f32; 3]; 3]);

impl Mat3 {
    /// The identity matrix.
    pub const IDENTITY: Self =
        Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Returns the `i`th row of `self`.
    #[inline]
    pub fn row(&self, i: usize) -> Vec3 {
        self.0[i].into()
    }

    /// Returns the `i`th column of `self`.
    #[inline]
    pub fn col(&self, i: usize) -> Vec3 {
        vec3(self.0[0][i], self.0[1][i], self.0[2][i])
    }

    /// Returns the transpose of `self`.
    ///
    /// For a rotation matrix, the transpose is also the inverse.
    pub fn transpose(&self) -> Self {
        Self(core::array::from_fn(|i| self.col(i).0))
    }

    /// Returns the matrix that applies `self` first and then `other`.
    ///
    /// # Examples
    /// ```
    /// use facet_core::assert_approx_eq;
    /// use facet_core::math::{degs, rotate_y, vec3, Vec3};
    /// let m = rotate_y(degs(30.0)).then(&rotate_y(degs(60.0)));
    /// let v: Vec3 = m.apply(&vec3(0.0, 0.0, 1.0));
    /// assert_approx_eq!(v, vec3(1.0, 0.0, 0.0));
    /// ```
    pub fn then(&self, other: &Self) -> Self {
        let mut els = [[0.0; 3]; 3];
        for (i, row) in els.iter_mut().enumerate() {
            for (j, el) in row.iter_mut().enumerate() {
                *el = other.row(i).dot(&self.col(j));
            }
        }
        Self(els)
    }

    /// Applies the map `self` to `v`.
    #[inline]
    pub fn apply<B>(&self, v: &Vec3<B>) -> Vec3<B> {
        let [r0, r1, r2] = &self.0;
        let [x, y, z] = v.0;
        vec3(
            r0[0] * x + r0[1] * y + r0[2] * z,
            r1[0] * x + r1[1] * y + r1[2] * z,
            r2[0] * x + r2[1] * y + r2[2] * z,
        )
    }
}

/// Returns a matrix that rotates by `a` about the x-axis.
///
/// A positive angle turns +y towards +z, and +z towards -y.
pub fn rotate_x(a: Angle) -> Mat3 {
    let (s, c) = a.sin_cos();
    Mat3([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]])
}

/// Returns a matrix that rotates by `a` about the y-axis.
///
/// A positive angle turns +z towards +x.
pub fn rotate_y(a: Angle) -> Mat3 {
    let (s, c) = a.sin_cos();
    Mat3([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]])
}

/// Returns a matrix that rotates by `a` about the z-axis.
///
/// A positive angle turns +x towards +y.
pub fn rotate_z(a: Angle) -> Mat3 {
    let (s, c) = a.sin_cos();
    Mat3([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ApproxEq<Self, f32> for Mat3 {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

impl Debug for Mat3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mat3[")?;
        for row in &self.0 {
            writeln!(f, "    {row:6.2?}")?;
        }
        write!(f, "]")
    }
}
