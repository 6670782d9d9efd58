//! Clipping geometry against the near plane.
//!
//! Geometry behind the camera, or too close to it, cannot be projected onto
//! the screen: the perspective divide would flip it around or blow it up to
//! infinity. Triangles and lines that cross the *near plane*, the plane
//! `z = NEAR_PLANE` in view space, are therefore cut so that only the part
//! in front of the plane remains.
//!
//! Only the near plane is clipped against. Geometry extending beyond the
//! sides of the viewport is handled by the rasterizer, which clamps spans
//! to the screen, and whole objects outside the view are culled earlier by
//! the [frustum test][super::frustum].

use alloc::vec::Vec;

use crate::geom::{Edge, Tri};
use crate::math::vary::Lerp;
use crate::math::vec::Vec3;

use super::View;
use super::tex::TexCoord;

/// The view-space depth of the near plane.
///
/// Shared by the projection stage, the clipper, and the frustum tests, so
/// that all agree on which points are projectable.
pub const NEAR_PLANE: f32 = 0.01;

/// Trait for types that can be clipped against the near plane.
///
/// Implemented on slices so that several primitives can be clipped in
/// a single call, reusing the output buffer.
pub trait Clip {
    /// Type of the clipped primitive.
    type Item;

    /// Clips `self` against the near plane, appending the resulting zero or
    /// more primitives to `out`.
    ///
    /// A primitive entirely in front of the plane is emitted unchanged. One
    /// entirely behind it is skipped. Otherwise, it is cut at the plane.
    fn clip(&self, out: &mut Vec<Self::Item>);
}

/// A view-space vertex with texture coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClipVert {
    pub pos: Vec3<View>,
    pub uv: TexCoord,
}

/// Visibility of a primitive with respect to the near plane.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Status {
    /// Entirely in front of the near plane.
    Visible,
    /// Partially behind the near plane, needs clipping.
    Clipped,
    /// Entirely behind the near plane.
    Hidden,
}

/// Returns whether a point at view-space depth `z` is behind the near plane.
#[inline]
pub fn is_behind(z: f32) -> bool {
    z < NEAR_PLANE
}

/// Returns the visibility status of the points `pts`.
pub fn status<'a>(pts: impl IntoIterator<Item = &'a Vec3<View>>) -> Status {
    let (mut any, mut all) = (false, true);
    for p in pts {
        let b = is_behind(p.z());
        any |= b;
        all &= b;
    }
    match (any, all) {
        (false, _) => Status::Visible,
        (true, true) => Status::Hidden,
        (true, false) => Status::Clipped,
    }
}

/// Returns the point where the segment from `inside` to `outside` crosses
/// the near plane. The depth of the result is exactly `NEAR_PLANE`.
#[inline]
fn intersect(inside: &ClipVert, outside: &ClipVert) -> ClipVert {
    let (z_in, z_out) = (inside.pos.z(), outside.pos.z());
    // Nonzero because z_out < NEAR_PLANE <= z_in
    let t = (NEAR_PLANE - z_in) / (z_out - z_in);
    let mut pos = inside.pos.lerp(&outside.pos, t);
    pos[2] = NEAR_PLANE;
    ClipVert { pos, uv: inside.uv.lerp(&outside.uv, t) }
}

/// Clips a triangle against the near plane.
///
/// Appends zero, one, or two triangles to `out`:
/// * If all vertices are in front of the plane, `tri` itself.
/// * If all vertices are behind the plane, nothing.
/// * If one vertex is behind, two triangles spanning the remaining
///   quadrilateral.
/// * If two vertices are behind, one smaller triangle.
///
/// New vertices are placed exactly on the plane, and their texture
/// coordinates are interpolated. The winding order of the output equals
/// that of `tri`, so backface culling is unaffected.
///
/// ```text
///  one behind:                  two behind:
///
///     v0                           v1      v2
///    /  \         near            ___________
///  -p01--p02-     plane           -p01---p02-
///  /      \                         \   /
/// v1------v2                         v0
/// ```
pub fn clip_tri(tri: &Tri<ClipVert>, out: &mut Vec<Tri<ClipVert>>) {
    let vs = &tri.0;
    let behind = vs.map(|v| is_behind(v.pos.z()));
    let n_behind = behind.iter().filter(|&&b| b).count();

    match n_behind {
        0 => out.push(*tri),
        1 | 2 => {
            // Rotate the odd vertex out to v0; rotating preserves winding
            let odd = n_behind == 1;
            let Some(k) = behind.iter().position(|&b| b == odd) else {
                return;
            };
            let [v0, v1, v2] = [vs[k], vs[(k + 1) % 3], vs[(k + 2) % 3]];
            if n_behind == 1 {
                let p01 = intersect(&v1, &v0);
                let p02 = intersect(&v2, &v0);
                out.push(Tri([p01, v1, v2]));
                out.push(Tri([p01, v2, p02]));
            } else {
                let p01 = intersect(&v0, &v1);
                let p02 = intersect(&v0, &v2);
                out.push(Tri([v0, p01, p02]));
            }
        }
        _ => {}
    }
}

/// Clips a line segment against the near plane.
///
/// Returns the segment unchanged if both endpoints are in front of the
/// plane, `None` if both are behind, and otherwise the part in front of
/// the plane, with the behind endpoint moved onto the plane.
///
/// # Examples
/// ```
/// use facet_core::geom::Edge;
/// use facet_core::math::vec3;
/// use facet_core::render::clip::{clip_line, NEAR_PLANE};
///
/// let e = Edge(vec3(0.0, 0.0, -1.0), vec3(0.0, 2.0, 1.0));
/// let Edge(a, b) = clip_line(e).unwrap();
/// assert_eq!(a.z(), NEAR_PLANE);
/// assert_eq!(b, vec3(0.0, 2.0, 1.0));
///
/// assert_eq!(clip_line(Edge(vec3(0.0, 0.0, -1.0), vec3(0.0, 0.0, -2.0))), None);
/// ```
pub fn clip_line(e: Edge<Vec3<View>>) -> Option<Edge<Vec3<View>>> {
    let Edge(a, b) = e;
    let cut = |inside: Vec3<View>, outside: Vec3<View>| {
        let t = (NEAR_PLANE - inside.z()) / (outside.z() - inside.z());
        let mut p = inside.lerp(&outside, t);
        p[2] = NEAR_PLANE;
        p
    };
    match (is_behind(a.z()), is_behind(b.z())) {
        (false, false) => Some(e),
        (true, true) => None,
        (true, false) => Some(Edge(cut(b, a), b)),
        (false, true) => Some(Edge(a, cut(a, b))),
    }
}

impl Clip for [Tri<ClipVert>] {
    type Item = Tri<ClipVert>;

    fn clip(&self, out: &mut Vec<Self::Item>) {
        for tri in self {
            clip_tri(tri, out);
        }
    }
}

impl Clip for [Edge<Vec3<View>>] {
    type Item = Edge<Vec3<View>>;

    fn clip(&self, out: &mut Vec<Self::Item>) {
        out.extend(self.iter().filter_map(|&e| clip_line(e)));
    }
}
