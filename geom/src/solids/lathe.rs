//! Surfaces of revolution.

use fc::geom::Mesh;
use fc::math::angle::{degs, turns};
use fc::math::vec::vec3;
use fc::render::tex::{TexId, uv};

use super::Build;

/// A sphere approximated by a grid of latitude and longitude lines.
///
/// Has two pole vertices and `stacks - 1` rings of `sectors` vertices.
/// Texture u runs once around the equator, v from the north pole to the
/// south pole.
#[derive(Copy, Clone, Debug)]
pub struct UvSphere {
    pub radius: f32,
    /// Number of divisions around the vertical axis. At least 3.
    pub sectors: usize,
    /// Number of divisions from pole to pole. At least 2.
    pub stacks: usize,
}

impl Default for UvSphere {
    fn default() -> Self {
        Self { radius: 1.0, sectors: 12, stacks: 8 }
    }
}

impl Build for UvSphere {
    /// Builds the sphere mesh.
    ///
    /// # Panics
    /// If `sectors` < 3 or `stacks` < 2.
    fn build(self, tex: TexId) -> Mesh {
        let Self { radius: r, sectors, stacks } = self;
        assert!(sectors >= 3, "a sphere needs at least 3 sectors");
        assert!(stacks >= 2, "a sphere needs at least 2 stacks");

        let mut b = Mesh::builder();
        let north = b.push_vert(vec3(0.0, r, 0.0));
        for i in 1..stacks {
            let (s_lat, c_lat) = (degs(180.0) * i as f32 / stacks as f32)
                .sin_cos();
            for j in 0..sectors {
                let (s_lon, c_lon) =
                    (turns(1.0) * j as f32 / sectors as f32).sin_cos();
                b.push_vert(vec3(
                    r * s_lat * c_lon,
                    r * c_lat,
                    r * s_lat * s_lon,
                ));
            }
        }
        let south = b.push_vert(vec3(0.0, -r, 0.0));

        // Index of vertex j on ring i, wrapping around the seam
        let ring = |i: usize, j: usize| 1 + (i - 1) * sectors + j % sectors;
        let u = |j: usize| j as f32 / sectors as f32;
        let v = |i: usize| i as f32 / stacks as f32;

        for j in 0..sectors {
            let (u0, u1, um) = (u(j), u(j + 1), u(j) + 0.5 / sectors as f32);
            b.push_face(
                [ring(1, j + 1), north, ring(1, j)],
                tex,
                [uv(u1, v(1)), uv(um, 0.0), uv(u0, v(1))],
            );
            for i in 1..stacks - 1 {
                let corners = [(i + 1, j + 1), (i, j + 1), (i, j), (i + 1, j)];
                let [bl, tl, tr, br] = corners.map(|(i, j)| ring(i, j));
                let [t0, t1, t2, t3] = corners.map(|(i, j)| uv(u(j), v(i)));
                b.push_face([bl, tl, tr], tex, [t0, t1, t2]);
                b.push_face([bl, tr, br], tex, [t0, t2, t3]);
            }
            let last = stacks - 1;
            b.push_face(
                [ring(last, j + 1), ring(last, j), south],
                tex,
                [uv(u1, v(last)), uv(u0, v(last)), uv(um, 1.0)],
            );
        }
        b.build().with_name("sphere")
    }
}
