//! Core functionality of the `facet` software renderer.
//!
//! Turns world-space triangle meshes, a camera, and a light source into a
//! depth-sorted list of flat-shaded screen-space faces, and rasterizes those
//! faces into an indexed-color framebuffer with perspective-correct texture
//! mapping. Lighting is baked into texture variants through a colormap,
//! looked up from a [brightness cache][render::cache] rather than computed
//! per pixel.
//!
//! # Crate features
//!
//! * `std`:
//!   Uses the floating-point functions of `std` and enables timing of
//!   rendering statistics. Enabled by default.
//!
//! * `libm`:
//!   Provides software implementations of floating-point functions via the
//!   [libm](https://crates.io/crates/libm) crate.
//!
//! * `mm`:
//!   Provides fast approximate implementations of floating-point functions
//!   via the [micromath](https://crates.io/crates/micromath) crate.
//!
//! At least one of the three must be enabled. Without `std`, the crate only
//! depends on `core` and `alloc`.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;
extern crate core;

#[cfg(not(feature = "fp"))]
compile_error!("one of the features `std`, `libm`, or `mm` must be enabled");

pub mod geom;
pub mod math;
pub mod render;
pub mod util;

pub mod prelude {
    pub use crate::math::{
        angle::{Angle, degs, rads, turns},
        quat::Quat,
        vary::Lerp,
        vec::{Vec2, Vec3, splat, vec2, vec3},
    };

    pub use crate::geom::{Aabb, Edge, Face, Mesh, Tri};

    pub use crate::render::{
        Instance, Model, ProjectedFace, Renderer, View, World,
        cache::{BrightnessCache, ColorMap},
        cam::Camera,
        ctx::Context,
        light::{Lambert, Light, Lighting},
        target::Framebuf,
        tex::{TexCoord, TexId, Texture, TextureStore, Textures, uv},
    };

    pub use crate::util::buf::Buf2;
}
