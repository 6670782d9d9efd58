//! Cameras and the view and screen transforms.

use crate::math::angle::{Angle, dir_to_angles};
use crate::math::mat::{Mat3, rotate_x, rotate_y};
use crate::math::vec::{Vec3, vec3};

use super::clip::is_behind;
use super::{Screen, View, World};

/// An orbiting camera.
///
/// Looks along +Z when `yaw` and `pitch` are zero. Positive yaw turns the
/// view towards +X, positive pitch turns it downwards. The camera proper
/// sits `distance` units behind `pos` along the view direction, so that
/// `pos` stays centered on screen as the camera turns around it.
///
/// The camera is owned and updated by the caller, typically once per
/// frame; the renderer only reads it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Camera {
    /// The orbit center in world space.
    pub pos: Vec3<World>,
    /// Rotation about the vertical axis.
    pub yaw: Angle,
    /// Rotation about the horizontal axis.
    pub pitch: Angle,
    /// Distance of the eye behind `pos`.
    pub distance: f32,
}

/// Maps view-space points to screen pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Half of the screen width in pixels.
    pub half_w: f32,
    /// Half of the screen height in pixels.
    pub half_h: f32,
    /// Pixels per unit of `x / z` or `y / z`.
    pub scale: f32,
}

/// A vertex projected to screen space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScreenVert {
    /// Screen x and y in pixels, z is the view-space depth.
    pub pos: Vec3<Screen>,
    /// The reciprocal of the view-space depth.
    pub inv_w: f32,
}

impl Camera {
    /// Returns a camera at `pos` looking along +Z.
    pub fn new(pos: Vec3<World>) -> Self {
        Self { pos, ..Self::default() }
    }

    /// Returns `self` with the given yaw and pitch.
    pub fn with_angles(self, yaw: Angle, pitch: Angle) -> Self {
        Self { yaw, pitch, ..self }
    }

    /// Returns `self` turned to look at `target`.
    ///
    /// If `target` equals the eye position, the angles are zeroed.
    pub fn look_at(self, target: Vec3<World>) -> Self {
        let (yaw, pitch) = dir_to_angles(target - self.eye());
        self.with_angles(yaw, pitch)
    }

    /// Returns the world-to-view rotation, yaw first and pitch second.
    ///
    /// The rows of the result are the view-space axes in world space.
    pub fn rotation(&self) -> Mat3 {
        rotate_y(-self.yaw).then(&rotate_x(-self.pitch))
    }

    /// Returns the unit view direction in world space.
    pub fn forward(&self) -> Vec3<World> {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        vec3(sy * cp, -sp, cy * cp)
    }

    /// Returns the unit world-space vectors of the view-space x, y, and z
    /// axes.
    ///
    /// Note that view-space +X is towards the *left* edge of the screen.
    pub fn basis(&self) -> [Vec3<World>; 3] {
        let r = self.rotation();
        [r.row(0).to(), r.row(1).to(), r.row(2).to()]
    }

    /// Returns the eye position in world space.
    pub fn eye(&self) -> Vec3<World> {
        self.pos - self.forward() * self.distance
    }

    /// Transforms a world-space point to view space.
    ///
    /// First translates by `-self.pos`, then rotates by yaw and pitch, and
    /// finally pushes the result `self.distance` units along the depth
    /// axis.
    #[inline]
    pub fn world_to_view(&self, pt: Vec3<World>) -> Vec3<View> {
        self.to_view(&self.rotation(), pt)
    }

    /// Like [`world_to_view`][Self::world_to_view] but with a precomputed
    /// rotation matrix, for transforming many points.
    #[inline]
    pub fn to_view(&self, rot: &Mat3, pt: Vec3<World>) -> Vec3<View> {
        let mut v = rot.apply(&(pt - self.pos));
        v[2] += self.distance;
        v.to()
    }
}

impl Viewport {
    /// Returns a viewport for a screen of `width`×`height` pixels and the
    /// field of view `fov`.
    pub fn new(width: u32, height: u32, fov: Angle) -> Self {
        let (w, h) = (width as f32, height as f32);
        let tan = (fov / 2.0).tan();
        let scale = if tan > 0.0 { h / tan } else { 0.0 };
        Self { half_w: w / 2.0, half_h: h / 2.0, scale }
    }

    /// Projects a view-space point to the screen, or returns `None` if the
    /// point is behind the near plane.
    ///
    /// # Examples
    /// ```
    /// use facet_core::math::{degs, vec3};
    /// use facet_core::render::cam::Viewport;
    ///
    /// let vp = Viewport::new(320, 200, degs(90.0));
    /// let v = vp.project(vec3(0.0, 0.0, 2.0)).unwrap();
    /// assert_eq!((v.pos.x(), v.pos.y()), (160.0, 100.0));
    /// assert_eq!(v.inv_w, 0.5);
    ///
    /// assert_eq!(vp.project(vec3(0.0, 0.0, -1.0)), None);
    /// ```
    #[inline]
    pub fn project(&self, v: Vec3<View>) -> Option<ScreenVert> {
        if is_behind(v.z()) {
            return None;
        }
        let inv_z = v.z().recip();
        let s = inv_z * self.scale;
        let pos = vec3(
            -v.x() * s + self.half_w,
            -v.y() * s + self.half_h,
            v.z(),
        );
        Some(ScreenVert { pos, inv_w: inv_z })
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::angle::degs;

    use super::*;

    #[test]
    fn default_camera_is_translation() {
        let cam = Camera::new(vec3(1.0, 2.0, 3.0));
        let v = cam.world_to_view(vec3(1.0, 2.0, 10.0));
        assert_eq!(v, vec3(0.0, 0.0, 7.0));
    }

    #[test]
    fn distance_adds_depth() {
        let cam = Camera { distance: 4.0, ..Camera::default() };
        assert_eq!(cam.world_to_view(Vec3::zero()), vec3(0.0, 0.0, 4.0));
        assert_eq!(cam.eye(), vec3(0.0, 0.0, -4.0));
    }

    #[test]
    fn forward_maps_to_view_z() {
        let cam = Camera::new(vec3(3.0, -1.0, 2.0))
            .with_angles(degs(40.0), degs(25.0));
        let v = cam.world_to_view(cam.pos + cam.forward() * 5.0);
        assert_approx_eq!(v, vec3(0.0, 0.0, 5.0), eps = 1e-5);

        let [x, y, z] = cam.basis();
        assert_approx_eq!(z, cam.forward(), eps = 1e-6);
        assert_approx_eq!(x.dot(&y), 0.0);
        assert_approx_eq!(x.cross(&y), z, eps = 1e-6);
    }

    #[test]
    fn positive_yaw_turns_right() {
        let cam = Camera::default().with_angles(degs(90.0), degs(0.0));
        assert_approx_eq!(cam.forward(), vec3(1.0, 0.0, 0.0), eps = 1e-6);
    }

    #[test]
    fn positive_pitch_looks_down() {
        let cam = Camera::default().with_angles(degs(0.0), degs(90.0));
        assert_approx_eq!(cam.forward(), vec3(0.0, -1.0, 0.0), eps = 1e-6);
    }

    #[test]
    fn look_at_target() {
        let target = vec3(4.0, -4.0, 4.0);
        let cam = Camera::new(Vec3::zero()).look_at(target);
        let v = cam.world_to_view(target);
        assert_approx_eq!(v.x(), 0.0, eps = 1e-5);
        assert_approx_eq!(v.y(), 0.0, eps = 1e-5);
        assert_approx_eq!(v.z(), target.len(), eps = 1e-5);
    }

    #[test]
    fn projection_is_not_mirrored() {
        let vp = Viewport::new(100, 100, degs(90.0));
        // View +X and +Y go to the left and to the top of the screen
        let v = vp.project(vec3(1.0, 1.0, 10.0)).unwrap();
        assert!(v.pos.x() < 50.0);
        assert!(v.pos.y() < 50.0);
        assert_eq!(v.pos.z(), 10.0);
        assert_approx_eq!(v.pos.x(), 40.0);
    }

    #[test]
    fn near_plane_is_projectable() {
        let vp = Viewport::new(100, 100, degs(90.0));
        assert!(vp.project(vec3(0.0, 0.0, 0.01)).is_some());
        assert!(vp.project(vec3(0.0, 0.0, 0.0099)).is_none());
    }
}
