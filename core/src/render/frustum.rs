//! View frustum culling of bounding boxes.
//!
//! Two tests are provided. The exact one, [`Frustum::aabb_visible`], tests
//! a box against the six planes bounding the view volume. The cheaper one,
//! [`Projection::aabb_visible`], projects the corners of a box and accepts
//! it if any corner lands near the screen. The latter is the one used by
//! the renderer to cull whole objects.

use crate::geom::Aabb;
use crate::math::angle::Angle;
use crate::math::float::f32 as fp;
use crate::math::vec::{Vec3, vec3};

use super::World;
use super::cam::Camera;

/// How far beyond the edges of the screen, in normalized device
/// coordinates, a projected corner may land and still count as visible.
///
/// The corners of a box may all be off screen while the box itself covers
/// part of it; the margin hides most such cases at the edges of the view.
pub const NDC_MARGIN: f32 = 1.2;

/// A plane in world space.
///
/// The points `p` on the plane satisfy `normal·p + dist = 0`. The normal
/// points to the inside of the frustum.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Plane {
    pub normal: Vec3<World>,
    pub dist: f32,
}

/// The six planes bounding the view volume: left, right, bottom, top, near,
/// and far.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Frustum(pub [Plane; 6]);

/// Parameters of a perspective projection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    /// Tangent of half the vertical field of view.
    pub tan_half_fov: f32,
    /// Ratio of the width of the view to its height.
    pub aspect: f32,
    /// Distance to the near plane.
    pub near: f32,
    /// Distance to the far plane.
    pub far: f32,
}

impl Plane {
    /// Returns the plane with normal `normal` containing `pt`.
    pub fn new(normal: Vec3<World>, pt: Vec3<World>) -> Self {
        Self { normal, dist: -normal.dot(&pt) }
    }

    /// Returns the signed distance of `pt` from `self`, positive on the
    /// side the normal points to.
    #[inline]
    pub fn signed_dist(&self, pt: Vec3<World>) -> f32 {
        self.normal.dot(&pt) + self.dist
    }

    /// Returns whether any part of `bbox` is on the inner side of `self`.
    pub fn aabb_visible(&self, bbox: &Aabb<World>) -> bool {
        let n = self.normal.map(|c| if c < 0.0 { -c } else { c });
        let r = bbox.half_extents().dot(&n);
        r >= -self.signed_dist(bbox.center())
    }
}

impl Frustum {
    /// Returns whether `bbox` may be visible.
    ///
    /// Conservative: a box outside the frustum but near one of its corner
    /// edges may be reported visible.
    pub fn aabb_visible(&self, bbox: &Aabb<World>) -> bool {
        self.0.iter().all(|p| p.aabb_visible(bbox))
    }
}

impl Projection {
    /// Returns a new projection with the given vertical field of view.
    pub fn new(fov: Angle, aspect: f32, near: f32, far: f32) -> Self {
        let tan_half_fov = (fov / 2.0).tan();
        Self { tan_half_fov, aspect, near, far }
    }

    /// Returns the frustum planes of this projection as seen from `cam`.
    pub fn extract_planes(&self, cam: &Camera) -> Frustum {
        let [x, y, z] = cam.basis();
        let to_world = |n: Vec3<World>| -> Vec3<World> {
            let n = n.normalize_fast();
            x * n.x() + y * n.y() + z * n.z()
        };
        let (th, tw) = (self.tan_half_fov, self.tan_half_fov * self.aspect);
        let eye = cam.eye();
        let side = |n| Plane::new(to_world(n), eye);

        Frustum([
            side(vec3(-1.0, 0.0, tw)),
            side(vec3(1.0, 0.0, tw)),
            side(vec3(0.0, -1.0, th)),
            side(vec3(0.0, 1.0, th)),
            Plane::new(z, eye + z * self.near),
            Plane::new(-z, eye + z * self.far),
        ])
    }

    /// Returns whether `bbox` may be visible from `cam`.
    ///
    /// Transforms the corners of the box to view space and projects those
    /// in front of the camera. The box is deemed visible if any of them
    /// lands within [`NDC_MARGIN`] of the center of the screen in normalized
    /// device coordinates, and between the near and far planes.
    pub fn aabb_visible(&self, cam: &Camera, bbox: &Aabb<World>) -> bool {
        let rot = cam.rotation();
        let (sx, sy) = (self.tan_half_fov * self.aspect, self.tan_half_fov);
        bbox.corners().into_iter().any(|c| {
            let v = cam.to_view(&rot, c);
            let z = v.z();
            if !(z > 0.0) || z < self.near || z > self.far {
                return false;
            }
            let ndc_x = v.x() / (z * sx);
            let ndc_y = v.y() / (z * sy);
            fp::abs(ndc_x) <= NDC_MARGIN && fp::abs(ndc_y) <= NDC_MARGIN
        })
    }
}

/// Returns the six frustum planes for a camera and projection parameters.
pub fn extract_planes(
    cam: &Camera,
    fov: Angle,
    aspect: f32,
    near: f32,
    far: f32,
) -> Frustum {
    Projection::new(fov, aspect, near, far).extract_planes(cam)
}

/// Returns whether the box from `min` to `max` may be visible, using the
/// projected corner test.
///
/// See [`Projection::aabb_visible`].
pub fn aabb_visible(
    cam: &Camera,
    fov: Angle,
    aspect: f32,
    near: f32,
    far: f32,
    min: Vec3<World>,
    max: Vec3<World>,
) -> bool {
    Projection::new(fov, aspect, near, far)
        .aabb_visible(cam, &Aabb { min, max })
}

#[cfg(test)]
mod tests {
    use crate::math::angle::degs;
    use crate::render::clip::NEAR_PLANE;

    use super::*;

    fn proj() -> Projection {
        Projection { tan_half_fov: 1.0, aspect: 1.0, near: NEAR_PLANE, far: 100.0 }
    }

    fn pt_box(x: f32, y: f32, z: f32) -> Aabb<World> {
        Aabb { min: vec3(x, y, z), max: vec3(x, y, z) }
    }

    fn cube(c: Vec3<World>, r: f32) -> Aabb<World> {
        Aabb { min: c - vec3(r, r, r), max: c + vec3(r, r, r) }
    }

    #[test]
    fn margin_boundary() {
        let cam = Camera::default();
        assert!(proj().aabb_visible(&cam, &pt_box(12.0, 0.0, 10.0)));
        assert!(proj().aabb_visible(&cam, &pt_box(0.0, -12.0, 10.0)));
        assert!(!proj().aabb_visible(&cam, &pt_box(12.1, 0.0, 10.0)));
        assert!(!proj().aabb_visible(&cam, &pt_box(0.0, 12.1, 10.0)));
    }

    #[test]
    fn behind_and_beyond_are_invisible() {
        let cam = Camera::default();
        let p = proj();
        assert!(!p.aabb_visible(&cam, &pt_box(0.0, 0.0, -1.0)));
        assert!(!p.aabb_visible(&cam, &pt_box(0.0, 0.0, 0.005)));
        assert!(!p.aabb_visible(&cam, &pt_box(0.0, 0.0, 101.0)));
        assert!(p.aabb_visible(&cam, &pt_box(0.0, 0.0, 100.0)));
    }

    #[test]
    fn any_corner_suffices() {
        let cam = Camera::default();
        let b = Aabb { min: vec3(-50.0, 0.0, -5.0), max: vec3(0.0, 0.0, 5.0) };
        assert!(proj().aabb_visible(&cam, &b));
    }

    #[test]
    fn turned_camera() {
        let cam = Camera::default().with_angles(degs(90.0), degs(0.0));
        let p = proj();
        assert!(p.aabb_visible(&cam, &pt_box(10.0, 0.0, 0.0)));
        assert!(!p.aabb_visible(&cam, &pt_box(0.0, 0.0, 10.0)));
    }

    #[test]
    fn plane_signed_dist() {
        let p = Plane::new(vec3(0.0, 1.0, 0.0), vec3(0.0, 2.0, 0.0));
        assert_eq!(p.signed_dist(vec3(5.0, 3.0, 1.0)), 1.0);
        assert_eq!(p.signed_dist(vec3(5.0, 0.0, 1.0)), -2.0);
        // Box reaching across the plane
        assert!(p.aabb_visible(&cube(vec3(0.0, 1.0, 0.0), 1.5)));
        assert!(!p.aabb_visible(&cube(vec3(0.0, 1.0, 0.0), 0.5)));
    }

    #[test]
    fn frustum_planes() {
        let cam = Camera { distance: 5.0, ..Camera::default() };
        let f = proj().extract_planes(&cam);

        // In front, near the center
        assert!(f.aabb_visible(&cube(vec3(0.0, 0.0, 0.0), 1.0)));
        // Behind the eye
        assert!(!f.aabb_visible(&cube(vec3(0.0, 0.0, -8.0), 1.0)));
        // Beyond the far plane
        assert!(!f.aabb_visible(&cube(vec3(0.0, 0.0, 200.0), 1.0)));
        // Far to the side
        assert!(!f.aabb_visible(&cube(vec3(50.0, 0.0, 0.0), 1.0)));
        assert!(!f.aabb_visible(&cube(vec3(0.0, -50.0, 0.0), 1.0)));
        // Straddling the left plane
        assert!(f.aabb_visible(&cube(vec3(5.0, 0.0, 0.0), 0.5)));
    }

    #[test]
    fn frustum_planes_of_turned_camera() {
        let cam = Camera::default().with_angles(degs(-90.0), degs(0.0));
        let f = proj().extract_planes(&cam);
        assert!(f.aabb_visible(&cube(vec3(-10.0, 0.0, 0.0), 1.0)));
        assert!(!f.aabb_visible(&cube(vec3(10.0, 0.0, 0.0), 1.0)));
        assert!(!f.aabb_visible(&cube(vec3(0.0, 0.0, 10.0), 1.0)));
    }

    #[test]
    fn zero_fov_is_a_line() {
        let f = Projection { tan_half_fov: 0.0, ..proj() }
            .extract_planes(&Camera::default());
        for p in f.0 {
            assert!(p.normal.0.iter().all(|c| c.is_finite()), "{p:?}");
        }
        assert!(f.aabb_visible(&cube(vec3(0.0, 0.0, 10.0), 1.0)));
        assert!(!f.aabb_visible(&cube(vec3(5.0, 0.0, 10.0), 1.0)));
    }
}
