//! Basic geometric primitives.

use crate::math::vec::{Vec3, vec3};

pub use mesh::{Face, Mesh};

pub mod mesh;

/// Triangle, defined by three vertices.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub struct Tri<V>(pub [V; 3]);

/// A line segment between two vertices.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Edge<T>(pub T, pub T);

/// An axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb<B> {
    pub min: Vec3<B>,
    pub max: Vec3<B>,
}

impl<V> Tri<V> {
    /// Returns a triangle with `f` applied to each vertex of `self`.
    pub fn map<U>(self, f: impl FnMut(V) -> U) -> Tri<U> {
        Tri(self.0.map(f))
    }
}

impl<B> Tri<Vec3<B>> {
    /// Returns the normal of `self`, not normalized.
    ///
    /// Faces are wound clockwise when seen from the side the normal points
    /// to. Zero if `self` is degenerate.
    pub fn normal(&self) -> Vec3<B> {
        let [a, b, c] = self.0;
        (c - a).cross(&(b - a))
    }

    /// Returns the centroid of `self`.
    pub fn centroid(&self) -> Vec3<B> {
        let [a, b, c] = self.0;
        (a + b + c) * (1.0 / 3.0)
    }
}

impl<B> Aabb<B> {
    /// Returns the smallest box containing all `pts`, or `None` if there
    /// are no points.
    ///
    /// # Examples
    /// ```
    /// use facet_core::geom::Aabb;
    /// use facet_core::math::{vec3, Vec3};
    /// let pts: [Vec3; 3] =
    ///     [vec3(1.0, 0.0, -1.0), vec3(-2.0, 3.0, 0.0), vec3(0.0, 1.0, 4.0)];
    /// let b = Aabb::from_points(pts).unwrap();
    /// assert_eq!(b.min, vec3(-2.0, 0.0, -1.0));
    /// assert_eq!(b.max, vec3(1.0, 3.0, 4.0));
    /// ```
    pub fn from_points<I>(pts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3<B>>,
    {
        let mut it = pts.into_iter();
        let first = it.next()?;
        Some(it.fold(Self { min: first, max: first }, |b, p| Self {
            min: b.min.min(&p),
            max: b.max.max(&p),
        }))
    }

    /// Returns the center point of `self`.
    pub fn center(&self) -> Vec3<B> {
        (self.min + self.max) * 0.5
    }

    /// Returns the half-extents of `self` along each axis.
    pub fn half_extents(&self) -> Vec3<B> {
        (self.max - self.min) * 0.5
    }

    /// Returns the eight corners of `self`.
    pub fn corners(&self) -> [Vec3<B>; 8] {
        let (l, h) = (self.min, self.max);
        [
            vec3(l.x(), l.y(), l.z()),
            vec3(h.x(), l.y(), l.z()),
            vec3(l.x(), h.y(), l.z()),
            vec3(h.x(), h.y(), l.z()),
            vec3(l.x(), l.y(), h.z()),
            vec3(h.x(), l.y(), h.z()),
            vec3(l.x(), h.y(), h.z()),
            vec3(h.x(), h.y(), h.z()),
        ]
    }

    /// Returns a cube centered at the origin, with half-extent equal to
    /// the largest absolute coordinate of `self` on any axis.
    ///
    /// Used in place of the box of a rotated object, since rotation is not
    /// applied to the box itself. Much larger than needed for long thin
    /// objects.
    pub fn to_rotation_cube(&self) -> Self {
        let m = self
            .min
            .0
            .into_iter()
            .chain(self.max.0)
            .map(|c| if c < 0.0 { -c } else { c })
            .fold(0.0, f32::max);
        Self { min: vec3(-m, -m, -m), max: vec3(m, m, m) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tri_normal_is_clockwise() {
        let t: Tri<Vec3> = Tri([
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
        ]);
        // Seen from -z, a-b-c runs clockwise
        assert_eq!(t.normal(), vec3(0.0, 0.0, -1.0));
    }

    #[test]
    fn degenerate_tri_has_zero_normal() {
        let t: Tri<Vec3> = Tri([
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 1.0, 1.0),
            vec3(2.0, 2.0, 2.0),
        ]);
        assert_eq!(t.normal(), Vec3::zero());
    }

    #[test]
    fn aabb_of_no_points_is_none() {
        assert_eq!(Aabb::<()>::from_points([]), None);
    }

    #[test]
    fn aabb_center_extents_corners() {
        let b: Aabb<()> =
            Aabb { min: vec3(-1.0, 0.0, 2.0), max: vec3(3.0, 2.0, 4.0) };
        assert_eq!(b.center(), vec3(1.0, 1.0, 3.0));
        assert_eq!(b.half_extents(), vec3(2.0, 1.0, 1.0));
        let cs = b.corners();
        assert_eq!(cs[0], b.min);
        assert_eq!(cs[7], b.max);
        assert!(cs.iter().all(|c| c.min(&b.min) == b.min));
    }

    #[test]
    fn rotation_cube_uses_largest_coordinate() {
        let b: Aabb<()> =
            Aabb { min: vec3(-0.5, -0.5, -4.0), max: vec3(0.5, 2.0, 1.0) };
        let c = b.to_rotation_cube();
        assert_eq!(c.center(), Vec3::zero());
        assert_eq!(c.max, vec3(4.0, 4.0, 4.0));
        assert_eq!(c.min.min(&b.min), c.min);
        assert_eq!(c.max.max(&b.max), c.max);
    }
}
