//! Camera-facing sprites.

use fc::geom::Mesh;
use fc::render::{cam::Camera, tex::TexId};

use crate::push_quad;

/// A rectangle rebuilt every frame to face the camera.
///
/// The mesh is centered at the model-space origin, to be placed in the
/// world by an unrotated instance.
#[derive(Copy, Clone, Debug)]
pub struct Billboard {
    pub width: f32,
    pub height: f32,
}

impl Billboard {
    /// Builds the billboard mesh parallel to the view plane of `cam`.
    pub fn build_facing(self, cam: &Camera, tex: TexId) -> Mesh {
        let [x, y, _] = cam.basis();
        let (x, y) = (x * (self.width / 2.0), y * (self.height / 2.0));
        // View-space +x is the left edge of the screen
        let corners = [x - y, x + y, y - x, -x - y];

        let mut b = Mesh::builder();
        b.push_verts(corners.map(|c| c.to()));
        push_quad(&mut b, [0, 1, 2, 3], tex);
        b.build().with_name("billboard").billboard()
    }
}

#[cfg(test)]
mod tests {
    use fc::assert_approx_eq;
    use fc::math::{angle::degs, vec::Vec3, vec::vec3};
    use fc::render::Model;

    use super::*;

    #[test]
    fn faces_the_camera() {
        let cams = [
            Camera::new(vec3(0.0, 0.0, -5.0)),
            Camera::new(vec3(1.0, 2.0, 3.0))
                .with_angles(degs(30.0), degs(20.0)),
            Camera::default().with_angles(degs(-135.0), degs(-60.0)),
        ];
        for cam in cams {
            let m = Billboard { width: 2.0, height: 1.0 }
                .build_facing(&cam, TexId(0));
            assert!(m.billboard);
            let back: Vec3<Model> = (-cam.forward()).to();
            for f in &m.faces {
                let n = m.tri(f).normal().normalize();
                assert_approx_eq!(n, back, eps = 1e-5);
            }
        }
    }

    #[test]
    fn size() {
        let cam = Camera::default();
        let m = Billboard { width: 4.0, height: 2.0 }
            .build_facing(&cam, TexId(0));
        let b = m.bounds().unwrap();
        assert_approx_eq!(b.max.x() - b.min.x(), 4.0);
        assert_approx_eq!(b.max.y() - b.min.y(), 2.0);
    }
}
