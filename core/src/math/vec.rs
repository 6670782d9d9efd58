//! Real vectors tagged with the coordinate space they belong to.

use core::array;
use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;
use core::ops::{
    Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use super::approx::ApproxEq;
use super::float::fast_recip_sqrt;
use super::vary::{Lerp, Vary};

//
// Types
//

/// Tag type for a real vector space of dimension `DIM` with basis `Basis`.
pub struct Real<const DIM: usize, Basis = ()>(PhantomData<Basis>);

/// A generic vector type.
///
/// `Repr` is the storage, typically an array of scalars, and `Space` a tag
/// type such as [`Real`] identifying the coordinate space. Vectors in
/// different spaces cannot be mixed without an explicit [`to`][Self::to]
/// conversion, which lets the type checker catch, for example, a model-space
/// position accidentally being used as a view-space one.
#[repr(transparent)]
pub struct Vector<Repr, Space>(pub Repr, PhantomData<Space>);

/// A 2-vector with `f32` components.
pub type Vec2<Basis = ()> = Vector<[f32; 2], Real<2, Basis>>;

/// A 3-vector with `f32` components.
pub type Vec3<Basis = ()> = Vector<[f32; 3], Real<3, Basis>>;

//
// Free fns
//

/// Returns a 2D vector with the given components.
#[inline]
pub const fn vec2<B>(x: f32, y: f32) -> Vec2<B> {
    Vector([x, y], PhantomData)
}

/// Returns a 3D vector with the given components.
#[inline]
pub const fn vec3<B>(x: f32, y: f32, z: f32) -> Vec3<B> {
    Vector([x, y, z], PhantomData)
}

/// Returns a vector with all components equal to `s`.
///
/// # Examples
/// ```
/// use facet_core::math::vec::{splat, vec3, Vec3};
/// let v: Vec3 = splat(2.0);
/// assert_eq!(v, vec3(2.0, 2.0, 2.0));
/// ```
#[inline]
pub fn splat<Sp, const N: usize>(s: f32) -> Vector<[f32; N], Sp> {
    Vector([s; N], PhantomData)
}

//
// Inherent impls
//

impl<Repr, Sp> Vector<Repr, Sp> {
    /// Returns a new vector with representation `repr`.
    #[inline]
    pub const fn new(repr: Repr) -> Self {
        Self(repr, PhantomData)
    }

    /// Returns `self` reinterpreted as a vector in another space.
    ///
    /// This is a no-op; it only changes the type tag.
    #[inline]
    pub fn to<Sp2>(self) -> Vector<Repr, Sp2> {
        Vector(self.0, PhantomData)
    }
}

impl<Sp, const N: usize> Vector<[f32; N], Sp> {
    /// Returns the zero vector.
    #[inline]
    pub const fn zero() -> Self {
        Self([0.0; N], PhantomData)
    }

    /// Returns the dot product of `self` and `other`.
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        let mut res = 0.0;
        for i in 0..N {
            res += self.0[i] * other.0[i];
        }
        res
    }

    /// Returns the squared Euclidean length of `self`.
    #[inline]
    pub fn len_sqr(&self) -> f32 {
        self.dot(self)
    }

    /// Returns the Euclidean length of `self`.
    #[inline]
    pub fn len(&self) -> f32 {
        super::float::f32::sqrt(self.len_sqr())
    }

    /// Returns `self` scaled to unit length, or the zero vector if `self`
    /// has zero length.
    pub fn normalize(&self) -> Self {
        let len = self.len();
        if len == 0.0 { *self } else { *self * len.recip() }
    }

    /// Returns `self` scaled to approximately unit length.
    ///
    /// Uses [`fast_recip_sqrt`]; the result may be off by about 0.2%.
    /// A zero vector stays zero instead of turning into NaNs.
    #[inline]
    pub fn normalize_fast(&self) -> Self {
        *self * fast_recip_sqrt(self.len_sqr())
    }

    /// Returns the vector obtained by applying `f` to each component.
    #[inline]
    pub fn map(&self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self(array::from_fn(|i| f(self.0[i])), PhantomData)
    }

    /// Returns the component-wise minimum of `self` and `other`.
    pub fn min(&self, other: &Self) -> Self {
        Self(array::from_fn(|i| self.0[i].min(other.0[i])), PhantomData)
    }

    /// Returns the component-wise maximum of `self` and `other`.
    pub fn max(&self, other: &Self) -> Self {
        Self(array::from_fn(|i| self.0[i].max(other.0[i])), PhantomData)
    }
}

impl<B> Vec2<B> {
    #[inline]
    pub const fn x(&self) -> f32 {
        self.0[0]
    }
    #[inline]
    pub const fn y(&self) -> f32 {
        self.0[1]
    }

    /// Returns the z component of the cross product of `self` and `other`
    /// extended to 3D, that is, the signed area of the parallelogram they
    /// span.
    #[inline]
    pub fn perp_dot(&self, other: &Self) -> f32 {
        self.x() * other.y() - self.y() * other.x()
    }
}

impl<B> Vec3<B> {
    /// Unit vector codirectional with the positive x-axis.
    pub const X: Self = vec3(1.0, 0.0, 0.0);
    /// Unit vector codirectional with the positive y-axis.
    pub const Y: Self = vec3(0.0, 1.0, 0.0);
    /// Unit vector codirectional with the positive z-axis.
    pub const Z: Self = vec3(0.0, 0.0, 1.0);

    #[inline]
    pub const fn x(&self) -> f32 {
        self.0[0]
    }
    #[inline]
    pub const fn y(&self) -> f32 {
        self.0[1]
    }
    #[inline]
    pub const fn z(&self) -> f32 {
        self.0[2]
    }

    /// Returns the cross product of `self` and `other`.
    ///
    /// The result is perpendicular to both operands and points in the
    /// direction given by the right-hand rule.
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        let [a, b, c] = self.0;
        let [d, e, f] = other.0;
        vec3(b * f - c * e, c * d - a * f, a * e - b * d)
    }

    /// Returns the x and z components of `self` as a 2-vector.
    #[inline]
    pub fn xz(&self) -> Vec2<B> {
        vec2(self.x(), self.z())
    }
}

//
// Local trait impls
//

impl<Sp, const N: usize> ApproxEq<Self, f32> for Vector<[f32; N], Sp> {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, rel_eps)
    }
    fn relative_epsilon() -> f32 {
        f32::relative_epsilon()
    }
}

impl<Sp, const N: usize> Lerp for Vector<[f32; N], Sp> {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

impl<Sp, const N: usize> Vary for Vector<[f32; N], Sp> {
    #[inline]
    fn step(&self, delta: &Self) -> Self {
        *self + *delta
    }
    #[inline]
    fn dv_dt(&self, other: &Self, recip_dt: f32) -> Self {
        (*other - *self) * recip_dt
    }
}

//
// Foreign trait impls
//

impl<Repr: Copy, Sp> Copy for Vector<Repr, Sp> {}

impl<Repr: Clone, Sp> Clone for Vector<Repr, Sp> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<Repr: PartialEq, Sp> PartialEq for Vector<Repr, Sp> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<Repr: Default, Sp> Default for Vector<Repr, Sp> {
    fn default() -> Self {
        Self(Repr::default(), PhantomData)
    }
}

impl<Repr: Debug, Sp> Debug for Vector<Repr, Sp> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Vec{:?}", self.0)
    }
}

impl<Repr, Sp> From<Repr> for Vector<Repr, Sp> {
    #[inline]
    fn from(repr: Repr) -> Self {
        Self(repr, PhantomData)
    }
}

impl<Sp, const N: usize> Index<usize> for Vector<[f32; N], Sp> {
    type Output = f32;
    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}

impl<Sp, const N: usize> IndexMut<usize> for Vector<[f32; N], Sp> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.0[i]
    }
}

impl<Sp, const N: usize> AddAssign for Vector<[f32; N], Sp> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..N {
            self.0[i] += rhs.0[i];
        }
    }
}

impl<Sp, const N: usize> SubAssign for Vector<[f32; N], Sp> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        for i in 0..N {
            self.0[i] -= rhs.0[i];
        }
    }
}

impl<Sp, const N: usize> MulAssign<f32> for Vector<[f32; N], Sp> {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        for i in 0..N {
            self.0[i] *= rhs;
        }
    }
}

impl<Sp, const N: usize> Add for Vector<[f32; N], Sp> {
    type Output = Self;
    #[inline]
    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<Sp, const N: usize> Sub for Vector<[f32; N], Sp> {
    type Output = Self;
    #[inline]
    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<Sp, const N: usize> Mul<f32> for Vector<[f32; N], Sp> {
    type Output = Self;
    #[inline]
    fn mul(mut self, rhs: f32) -> Self {
        self *= rhs;
        self
    }
}

impl<Sp, const N: usize> Mul<Vector<[f32; N], Sp>> for f32 {
    type Output = Vector<[f32; N], Sp>;
    #[inline]
    fn mul(self, rhs: Vector<[f32; N], Sp>) -> Self::Output {
        rhs * self
    }
}

impl<Sp, const N: usize> Neg for Vector<[f32; N], Sp> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self * -1.0
    }
}
