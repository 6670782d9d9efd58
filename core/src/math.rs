//! Linear algebra and other useful mathematics.
//!
//! Includes [vectors][self::vec], 3×3 rotation [matrices][mat],
//! [angles][angle], [quaternions][quat], and [pseudo-random numbers][rand],
//! as well as linear interpolation and approximate equality comparisons.
//!
//! Vectors are tagged with a type that represents the coordinate *space*
//! they're embedded in, so that model, world, and view space positions cannot
//! be mixed up without an explicit conversion.

pub use {
    angle::{Angle, angles_to_dir, degs, dir_to_angles, rads, turns},
    approx::ApproxEq,
    mat::{Mat3, rotate_x, rotate_y, rotate_z},
    quat::Quat,
    vary::{Lerp, inv_lerp, lerp},
    vec::{Vec2, Vec3, splat, vec2, vec3},
};

pub mod angle;
pub mod approx;
pub mod float;
pub mod mat;
pub mod quat;
pub mod rand;
pub mod vary;
pub mod vec;
