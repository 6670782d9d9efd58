//! Light sources and the flat shading model.

use crate::math::float::fast_recip_sqrt;
use crate::math::vec::Vec3;

use super::World;

/// A light source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Light {
    /// A light source "at infinity", so that the light rays arrive
    /// parallel and the direction of the light is the same for every
    /// point. For example the sun.
    Directional {
        /// Direction from the scene towards the light, need not be
        /// normalized.
        dir: Vec3<World>,
        intensity: f32,
        ambient: f32,
    },
    /// A light source radiating omnidirectionally from a single point,
    /// fading linearly to nothing at distance `radius`.
    Point {
        pos: Vec3<World>,
        radius: f32,
        intensity: f32,
        ambient: f32,
    },
}

/// Computes the brightness of a flat-shaded face.
///
/// Implementations must return values in the range [0, 1]. The normals
/// passed are of unit length or zero.
pub trait Lighting {
    /// Returns the brightness of a face with normal `normal` lit by a
    /// directional light towards `dir`.
    fn directional_brightness(
        &self,
        dir: Vec3<World>,
        intensity: f32,
        ambient: f32,
        normal: Vec3<World>,
    ) -> f32;

    /// Returns the brightness of a face at `pt` with normal `normal` lit
    /// by a point light at `light_pos`.
    fn point_brightness(
        &self,
        pt: Vec3<World>,
        light_pos: Vec3<World>,
        radius: f32,
        intensity: f32,
        ambient: f32,
        normal: Vec3<World>,
    ) -> f32;
}

/// The Lambertian diffuse model with a constant ambient term.
#[derive(Copy, Clone, Debug, Default)]
pub struct Lambert;

impl Light {
    /// Returns the ambient term of `self`.
    pub fn ambient(&self) -> f32 {
        match *self {
            Self::Directional { ambient, .. } | Self::Point { ambient, .. } => {
                ambient.clamp(0.0, 1.0)
            }
        }
    }

    /// Returns the brightness of a face with centroid `pt` and normal
    /// `normal` as computed by `model`.
    pub fn brightness<L: Lighting + ?Sized>(
        &self,
        model: &L,
        pt: Vec3<World>,
        normal: Vec3<World>,
    ) -> f32 {
        match *self {
            Self::Directional { dir, intensity, ambient } => {
                model.directional_brightness(dir, intensity, ambient, normal)
            }
            Self::Point { pos, radius, intensity, ambient } => model
                .point_brightness(pt, pos, radius, intensity, ambient, normal),
        }
    }
}

impl Default for Light {
    /// Returns a directional light shining from straight above.
    fn default() -> Self {
        Self::Directional {
            dir: Vec3::Y,
            intensity: 0.8,
            ambient: 0.2,
        }
    }
}

impl Lighting for Lambert {
    fn directional_brightness(
        &self,
        dir: Vec3<World>,
        intensity: f32,
        ambient: f32,
        normal: Vec3<World>,
    ) -> f32 {
        let diffuse = normal.dot(&dir.normalize_fast()).max(0.0);
        (ambient + intensity * diffuse).clamp(0.0, 1.0)
    }

    fn point_brightness(
        &self,
        pt: Vec3<World>,
        light_pos: Vec3<World>,
        radius: f32,
        intensity: f32,
        ambient: f32,
        normal: Vec3<World>,
    ) -> f32 {
        let to_light = light_pos - pt;
        let len_sqr = to_light.len_sqr();
        if !(len_sqr < radius * radius) {
            return ambient.clamp(0.0, 1.0);
        }
        let recip = fast_recip_sqrt(len_sqr);
        let falloff = 1.0 - len_sqr * recip / radius;
        let diffuse = normal.dot(&(to_light * recip)).max(0.0);
        (ambient + intensity * falloff * diffuse).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::vec::vec3;

    use super::*;

    const UP: Vec3<World> = vec3(0.0, 1.0, 0.0);

    #[test]
    fn directional_facing_light_is_full() {
        let b = Lambert.directional_brightness(UP * 3.0, 0.8, 0.2, UP);
        assert_approx_eq!(b, 1.0, eps = 5e-3);
    }

    #[test]
    fn directional_facing_away_is_ambient() {
        let b = Lambert.directional_brightness(UP, 0.8, 0.2, -UP);
        assert_eq!(b, 0.2);
    }

    #[test]
    fn brightness_is_clamped() {
        assert_eq!(Lambert.directional_brightness(UP, 5.0, 0.5, UP), 1.0);
        let b = Lambert.directional_brightness(UP, 0.5, -1.0, -UP);
        assert_eq!(b, 0.0);
    }

    #[test]
    fn point_light_falls_off_linearly() {
        let pt = Vec3::zero();
        let b = Lambert.point_brightness(pt, UP * 5.0, 10.0, 1.0, 0.0, UP);
        assert_approx_eq!(b, 0.5, eps = 1e-2);
    }

    #[test]
    fn point_light_out_of_range_is_ambient() {
        let pt = Vec3::zero();
        let l = Light::Point {
            pos: UP * 10.0,
            radius: 10.0,
            intensity: 1.0,
            ambient: 0.25,
        };
        assert_eq!(l.brightness(&Lambert, pt, UP), 0.25);
        assert_eq!(l.ambient(), 0.25);
    }

    #[test]
    fn zero_normal_is_ambient() {
        let l = Light::default();
        assert_eq!(l.brightness(&Lambert, Vec3::zero(), Vec3::zero()), 0.2);
    }
}
