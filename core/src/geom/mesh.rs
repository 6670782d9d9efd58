//! Triangle meshes.

use alloc::{string::String, vec::Vec};
use core::fmt::{self, Display, Formatter};

use crate::math::vec::Vec3;
use crate::render::Model;
use crate::render::tex::{TexCoord, TexId};

use super::{Aabb, Tri};

/// A triangular face of a mesh.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Face {
    /// Indices of the vertices of the face in the mesh's `verts` vector,
    /// wound clockwise when seen from the front.
    pub verts: [usize; 3],
    /// The texture of the face.
    pub tex: TexId,
    /// Texture coordinates of each vertex, in the same order as `verts`.
    pub uvs: [TexCoord; 3],
    /// Whether the face ignores lighting.
    pub unlit: bool,
}

/// A triangle mesh.
///
/// Created once, typically by a procedural generator, and shared by any
/// number of [instances][crate::render::Instance]. Rendering never mutates
/// a mesh; instance transforms are applied to the vertices on the fly.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// A name for diagnostics.
    pub name: String,
    /// The vertices of the mesh in model space.
    pub verts: Vec<Vec3<Model>>,
    /// The faces of the mesh, referring to `verts` by index.
    pub faces: Vec<Face>,
    /// Whether every face of the mesh ignores lighting.
    pub unlit: bool,
    /// Whether the mesh is a camera-facing billboard.
    pub billboard: bool,
}

/// Builder for meshes.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    m: Mesh,
}

/// Error returned by [`Mesh::try_new`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A face refers to a vertex that does not exist.
    IndexOutOfBounds {
        /// The index of the face in the faces vector.
        face: usize,
        /// The offending vertex index.
        index: usize,
        /// The number of vertices.
        len: usize,
    },
}

impl Face {
    /// Returns a lit face with the given vertex indices, texture, and
    /// texture coordinates.
    pub const fn new(
        verts: [usize; 3],
        tex: TexId,
        uvs: [TexCoord; 3],
    ) -> Self {
        Self { verts, tex, uvs, unlit: false }
    }
}

impl Mesh {
    /// Creates a new mesh with the given faces and vertices.
    ///
    /// # Panics
    /// If any of the vertex indices in `faces` ≥ `verts.len()`.
    /// See [`try_new`][Self::try_new] for a non-panicking version.
    pub fn new<F, V>(faces: F, verts: V) -> Self
    where
        F: IntoIterator<Item = Face>,
        V: IntoIterator<Item = Vec3<Model>>,
    {
        match Self::try_new(faces, verts) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a new mesh with the given faces and vertices, or returns
    /// an error if a face refers to a nonexistent vertex.
    pub fn try_new<F, V>(faces: F, verts: V) -> Result<Self, Error>
    where
        F: IntoIterator<Item = Face>,
        V: IntoIterator<Item = Vec3<Model>>,
    {
        let faces: Vec<_> = faces.into_iter().collect();
        let verts: Vec<_> = verts.into_iter().collect();
        let len = verts.len();

        for (face, f) in faces.iter().enumerate() {
            if let Some(&index) = f.verts.iter().find(|&&i| i >= len) {
                return Err(Error::IndexOutOfBounds { face, index, len });
            }
        }
        Ok(Self { faces, verts, ..Self::default() })
    }

    /// Returns a new mesh builder.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns `self` with the given name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns `self` with all faces unlit.
    pub fn unlit(mut self) -> Self {
        self.unlit = true;
        self
    }

    /// Returns `self` marked as a billboard.
    pub fn billboard(mut self) -> Self {
        self.billboard = true;
        self
    }

    /// Returns the vertex positions of `face`.
    #[inline]
    pub fn tri(&self, face: &Face) -> Tri<Vec3<Model>> {
        Tri(face.verts.map(|i| self.verts[i]))
    }

    /// Returns the bounding box of the vertices of `self`, or `None` if
    /// there are no vertices.
    pub fn bounds(&self) -> Option<Aabb<Model>> {
        Aabb::from_points(self.verts.iter().copied())
    }
}

impl Builder {
    /// Appends a vertex and returns its index.
    pub fn push_vert(&mut self, pos: Vec3<Model>) -> usize {
        self.m.verts.push(pos);
        self.m.verts.len() - 1
    }

    /// Appends all the vertices yielded by the given iterator.
    pub fn push_verts<Vs>(&mut self, verts: Vs)
    where
        Vs: IntoIterator<Item = Vec3<Model>>,
    {
        self.m.verts.extend(verts);
    }

    /// Appends a face with the given vertex indices, texture, and texture
    /// coordinates.
    pub fn push_face(
        &mut self,
        verts: [usize; 3],
        tex: TexId,
        uvs: [TexCoord; 3],
    ) {
        self.m.faces.push(Face::new(verts, tex, uvs));
    }

    /// Returns the number of vertices added so far.
    pub fn vert_count(&self) -> usize {
        self.m.verts.len()
    }

    /// Returns the finished mesh containing all the added faces and vertices.
    ///
    /// # Panics
    /// If any of the vertex indices in `faces` ≥ `verts.len()`.
    pub fn build(self) -> Mesh {
        // Sanity checks done by new()
        Mesh::new(self.m.faces, self.m.verts)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds { face, index, len } => write!(
                f,
                "vertex index out of bounds at faces[{face}]: \
                 {index} >= {len}"
            ),
        }
    }
}
