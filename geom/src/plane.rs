//! Flat meshes.

use fc::geom::Mesh;
use fc::math::vec::vec3;
use fc::render::tex::TexId;

use crate::{push_quad, solids::Build};

/// A rectangle in the xy plane, centered at the origin and facing -z.
#[derive(Copy, Clone, Debug)]
pub struct Quad {
    pub width: f32,
    pub height: f32,
}

/// A square grid of quads in the xz plane, centered at the origin and
/// facing +y.
///
/// Cells are textured in a checkerboard pattern of two textures.
#[derive(Copy, Clone, Debug)]
pub struct Grid {
    /// Side length of the whole grid.
    pub size: f32,
    /// Number of cells along each side.
    pub cells: usize,
    /// Texture of the odd cells.
    pub alt_tex: Option<TexId>,
}

impl Build for Quad {
    /// Builds a mesh of two faces.
    fn build(self, tex: TexId) -> Mesh {
        let (w, h) = (self.width / 2.0, self.height / 2.0);
        // Seen from -z, +x is to the left
        let verts = [
            vec3(w, -h, 0.0),
            vec3(w, h, 0.0),
            vec3(-w, h, 0.0),
            vec3(-w, -h, 0.0),
        ];
        let mut b = Mesh::builder();
        b.push_verts(verts);
        push_quad(&mut b, [0, 1, 2, 3], tex);
        b.build().with_name("quad")
    }
}

impl Build for Grid {
    /// Builds a mesh of `cells`² quads sharing their vertices.
    fn build(self, tex: TexId) -> Mesh {
        let n = self.cells;
        let step = self.size / n as f32;
        let half = self.size / 2.0;
        let alt_tex = self.alt_tex.unwrap_or(tex);

        let mut b = Mesh::builder();
        for k in 0..=n {
            for i in 0..=n {
                let (x, z) = (i as f32 * step - half, k as f32 * step - half);
                b.push_vert(vec3(x, 0.0, z));
            }
        }
        let idx = |i: usize, k: usize| k * (n + 1) + i;
        for k in 0..n {
            for i in 0..n {
                // Seen from above with +z up, +x is to the left
                let corners = [
                    idx(i + 1, k),
                    idx(i + 1, k + 1),
                    idx(i, k + 1),
                    idx(i, k),
                ];
                let t = if (i + k) % 2 == 0 { tex } else { alt_tex };
                push_quad(&mut b, corners, t);
            }
        }
        b.build().with_name("grid")
    }
}
