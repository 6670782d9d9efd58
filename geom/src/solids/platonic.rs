//! Cubes and boxes.

use fc::geom::Mesh;
use fc::math::vec::{Vec3, vec3};
use fc::render::{Model, tex::TexId};

use super::Build;
use crate::push_quad;

/// A rectangular cuboid.
///
/// Defined by the left-bottom-near and right-top-far vertices of the box.
///
/// The eight vertices are numbered by the bits of their index: bit 0 set
/// for the right (+x) side, bit 1 for the top (+y), bit 2 for the far (+z)
/// side.
#[derive(Copy, Clone, Debug)]
pub struct Box {
    /// The left bottom near corner of the box.
    pub left_bot_near: Vec3<Model>,
    /// The right top far corner of the box.
    pub right_top_far: Vec3<Model>,
}

/// A cube centered at the origin.
#[derive(Copy, Clone, Debug)]
pub struct Cube {
    pub side_len: f32,
}

impl Box {
    /// Corner indices of each side, bottom left, top left, top right, and
    /// bottom right as seen from outside.
    #[rustfmt::skip]
    const SIDES: [[usize; 4]; 6] = [
        // near (-z)
        [0b001, 0b011, 0b010, 0b000],
        // far (+z)
        [0b100, 0b110, 0b111, 0b101],
        // left (-x)
        [0b000, 0b010, 0b110, 0b100],
        // right (+x)
        [0b101, 0b111, 0b011, 0b001],
        // bottom (-y)
        [0b000, 0b100, 0b101, 0b001],
        // top (+y)
        [0b011, 0b111, 0b110, 0b010],
    ];

    /// Returns a new `Box` with the given opposite vertices.
    pub fn new(left_bot_near: Vec3<Model>, right_top_far: Vec3<Model>) -> Self {
        Box { left_bot_near, right_top_far }
    }

    fn corner(&self, i: usize) -> Vec3<Model> {
        let (l, r) = (self.left_bot_near, self.right_top_far);
        let pick = |bit: usize, axis: usize| {
            if i & bit != 0 { r[axis] } else { l[axis] }
        };
        vec3(pick(0b001, 0), pick(0b010, 1), pick(0b100, 2))
    }
}

impl Build for Box {
    /// Builds the cuboid mesh of eight vertices and twelve faces.
    fn build(self, tex: TexId) -> Mesh {
        let mut b = Mesh::builder();
        b.push_verts((0..8).map(|i| self.corner(i)));
        for side in Self::SIDES {
            push_quad(&mut b, side, tex);
        }
        b.build().with_name("box")
    }
}

impl Build for Cube {
    /// Builds the cube mesh.
    fn build(self, tex: TexId) -> Mesh {
        let d = self.side_len / 2.0;
        Box::new(vec3(-d, -d, -d), vec3(d, d, d))
            .build(tex)
            .with_name("cube")
    }
}
