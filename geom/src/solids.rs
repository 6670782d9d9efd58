//! Mesh approximations of solid shapes.

use fc::geom::Mesh;
use fc::render::tex::TexId;

mod lathe;
mod platonic;

pub use lathe::*;
pub use platonic::*;

/// Trait for shapes that can be turned into meshes.
pub trait Build {
    /// Builds a mesh of `self` with every face textured with `tex`.
    fn build(self, tex: TexId) -> Mesh;
}
