//! Rendering context and parameters.

use core::ops::Range;

use crate::math::angle::{Angle, degs};
use crate::util::Dims;

use super::cam::Viewport;
use super::clip::NEAR_PLANE;
use super::frustum::Projection;
use super::stats::Stats;

/// Context and parameters used by the renderer.
#[derive(Clone, Debug)]
pub struct Context {
    /// The palette index with which to fill the framebuffer at the start of
    /// each frame, if any.
    ///
    /// If rendered geometry always fills the entire frame, `color_clear`
    /// can be set to `None` to avoid redundant work.
    pub color_clear: Option<u8>,

    /// The vertical field of view.
    pub fov: Angle,

    /// Distance to the far plane. Objects entirely beyond it are culled.
    pub far: f32,

    /// Maximum horizontal distance from the camera to the position of an
    /// object for it to be drawn. Ground and skybox objects are exempt.
    pub render_distance: f32,

    /// Depth added to every face of ground objects.
    ///
    /// Faces are drawn back to front, so a large bias ensures the ground is
    /// drawn first and never covers the objects standing on it.
    pub ground_depth_bias: f32,

    /// Depth range over which faces fade to black, if any.
    ///
    /// Faces nearer than `start` are unaffected, faces farther than `end`
    /// are fully dark.
    pub fog: Option<Range<f32>>,

    /// Opacity below which faces are drawn stippled.
    pub dither_threshold: f32,

    /// Whether to cull (discard) faces pointing either away from or towards
    /// the camera.
    ///
    /// If all geometry drawn is "solid" meshes without holes, backfaces can
    /// usually be culled because they are always occluded by front faces and
    /// drawing them would be redundant.
    pub face_cull: Option<FaceCull>,

    /// Collecting rendering statistics.
    pub stats: Stats,
}

/// Whether to cull front faces or backfaces.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FaceCull {
    Front,
    Back,
}

impl Context {
    /// Returns whether a face should be culled based on the current face
    /// culling setting.
    #[inline]
    pub fn face_cull(&self, is_backface: bool) -> bool {
        match self.face_cull {
            Some(FaceCull::Back) if is_backface => true,
            Some(FaceCull::Front) if !is_backface => true,
            _ => false,
        }
    }

    /// Returns the brightness multiplier of a face at view depth `depth`.
    ///
    /// # Examples
    /// ```
    /// use facet_core::render::ctx::Context;
    /// let ctx = Context { fog: Some(10.0..20.0), ..Context::default() };
    /// assert_eq!(ctx.fog_factor(5.0), 1.0);
    /// assert_eq!(ctx.fog_factor(15.0), 0.5);
    /// assert_eq!(ctx.fog_factor(25.0), 0.0);
    /// ```
    pub fn fog_factor(&self, depth: f32) -> f32 {
        let Some(Range { start, end }) = self.fog.clone() else {
            return 1.0;
        };
        if depth <= start {
            1.0
        } else if depth >= end {
            0.0
        } else {
            1.0 - (depth - start) / (end - start)
        }
    }

    /// Returns the projection parameters for a screen of size `dims`.
    pub fn projection(&self, (w, h): Dims) -> Projection {
        let aspect = if h > 0 { w as f32 / h as f32 } else { 1.0 };
        Projection::new(self.fov, aspect, NEAR_PLANE, self.far)
    }

    /// Returns the viewport mapping for a screen of size `dims`.
    pub fn viewport(&self, (w, h): Dims) -> Viewport {
        Viewport::new(w, h, self.fov)
    }
}

impl Default for Context {
    /// Creates a rendering context with default settings.
    ///
    /// The default values are:
    /// * Color clear:        Index 0
    /// * Field of view:      70°
    /// * Far plane:          1000
    /// * Render distance:    100
    /// * Ground depth bias:  1 000 000
    /// * Fog:                Disabled
    /// * Dither threshold:   0.9
    /// * Face culling:       Backfaces
    fn default() -> Self {
        Self {
            color_clear: Some(0),
            fov: degs(70.0),
            far: 1000.0,
            render_distance: 100.0,
            ground_depth_bias: 1e6,
            fog: None,
            dither_threshold: 0.9,
            face_cull: Some(FaceCull::Back),
            stats: Stats::default(),
        }
    }
}
