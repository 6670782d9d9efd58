//! Procedural meshes for the `facet` renderer.
//!
//! All meshes are built with their faces wound clockwise when seen from
//! the outside, the winding that the renderer treats as front-facing.

#![no_std]

extern crate alloc;
extern crate core;
#[cfg(feature = "std")]
extern crate std;

use fc::geom::mesh::Builder;
use fc::render::tex::{TexCoord, TexId, uv};

pub mod billboard;
pub mod plane;
pub mod solids;

pub use billboard::Billboard;
pub use plane::{Grid, Quad};
pub use solids::{Box, Build, Cube, UvSphere};

/// Texture coordinates of the corners of a quad, in the order bottom left,
/// top left, top right, bottom right.
const QUAD_UVS: [TexCoord; 4] =
    [uv(0.0, 1.0), uv(0.0, 0.0), uv(1.0, 0.0), uv(1.0, 1.0)];

/// Adds two faces covering the quad with the given corner vertices, in
/// the order bottom left, top left, top right, bottom right as seen from
/// the front.
fn push_quad(mb: &mut Builder, [bl, tl, tr, br]: [usize; 4], tex: TexId) {
    let [a, b, c, d] = QUAD_UVS;
    mb.push_face([bl, tl, tr], tex, [a, b, c]);
    mb.push_face([bl, tr, br], tex, [a, c, d]);
}

#[cfg(test)]
mod test_util {
    use fc::geom::Mesh;

    /// Asserts that every face of `mesh` has a normal pointing away from
    /// `center`.
    pub fn assert_outward(mesh: &Mesh, center: [f32; 3]) {
        for f in &mesh.faces {
            let t = mesh.tri(f);
            let n = t.normal();
            let c = t.centroid();
            let d: f32 = (0..3).map(|i| n[i] * (c[i] - center[i])).sum();
            assert!(d > 0.0, "face {f:?} of {} points inwards", mesh.name);
        }
    }
}
