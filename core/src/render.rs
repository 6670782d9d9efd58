//! Turning 3D geometry into raster images.
//!
//! This module constitutes the core 3D rendering pipeline of `facet`.
//! Mesh instances are [culled][frustum] as a whole, their faces lit,
//! transformed to [view space][cam], and collected into a face list. The
//! list is [sorted][sort] back to front and drawn with the painter's
//! algorithm: faces are [clipped][clip] against the near plane as needed,
//! [rasterized][raster] into scanlines, and [textured][tex] into an
//! indexed-color [framebuffer][target]. Shading uses brightness variants of
//! textures from a [cache][cache].

use alloc::vec::Vec;
use core::mem;

use log::{trace, warn};

use crate::geom::{Aabb, Edge, Mesh, Tri};
use crate::math::angle::{Angle, dir_to_angles};
use crate::math::mat::{Mat3, rotate_x, rotate_y, rotate_z};
use crate::math::vec::{Vec3, vec2};

use cache::BrightnessCache;
use cam::{Camera, ScreenVert};
use clip::{ClipVert, Status, clip_line, clip_tri};
use ctx::Context;
use light::{Light, Lighting};
use raster::{Scanline, Varyings, line, tri_fill};
use stats::Stats;
use target::{Framebuf, OPAQUE};
use tex::{TexCoord, TexId, Texture, TextureStore};

pub mod cache;
pub mod cam;
pub mod clip;
pub mod ctx;
pub mod frustum;
pub mod light;
pub mod raster;
pub mod sort;
pub mod stats;
pub mod target;
pub mod tex;

/// Model space coordinate basis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Model;

/// World space coordinate basis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct World;

/// View (camera) space coordinate basis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct View;

/// Screen space coordinate basis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Screen;

/// A mesh placed in the world.
///
/// The rotation angles are intrinsic: yaw turns the mesh about its up
/// axis, pitch about its own (already yawed) right axis, and roll about
/// its own forward axis. As a product of fixed-axis rotations this is
/// roll first, then pitch, then yaw. Missing angles count as zero.
#[derive(Copy, Clone, Debug)]
pub struct Instance<'a> {
    pub mesh: &'a Mesh,
    pub pos: Vec3<World>,
    pub yaw: Option<Angle>,
    pub pitch: Option<Angle>,
    pub roll: Option<Angle>,
    /// Ground objects are exempt from distance and frustum culling and
    /// backface culling, and are drawn behind everything else.
    pub ground: bool,
    /// Skybox objects are exempt from distance and frustum culling and
    /// backface culling.
    pub skybox: bool,
    /// Opacity below the dither threshold draws the instance stippled.
    pub dither_opacity: Option<f32>,
    /// Like `dither_opacity`, for fading out exploding objects. The smaller
    /// of the two opacities applies.
    pub explosion_opacity: Option<f32>,
}

/// A face transformed to view space and ready to be drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProjectedFace {
    /// Index of the face in its mesh.
    pub face: usize,
    /// Base texture of the face.
    pub tex: TexId,
    /// Texture coordinates of the vertices.
    pub uvs: [TexCoord; 3],
    /// View-space positions of the vertices.
    pub verts: [Vec3<View>; 3],
    /// Screen-space vertices, or `None` if the face straddles the near
    /// plane and must be clipped before drawing.
    pub screen: Option<[ScreenVert; 3]>,
    /// Mean view depth of the vertices plus any depth bias.
    pub depth: f32,
    /// Light falling on the face in [0, 1], or `None` if unlit.
    pub brightness: Option<f32>,
    /// Fog attenuation of `brightness` in [0, 1].
    pub fog: f32,
    pub dither_opacity: Option<f32>,
    pub explosion_opacity: Option<f32>,
}

/// The mesh stage and the face list of a frame.
///
/// A frame is rendered by calling [`begin_frame`][Self::begin_frame],
/// then [`render_mesh`][Self::render_mesh] for each visible instance,
/// [`sort`][Self::sort], [`draw`][Self::draw], and finally
/// [`end_frame`][Self::end_frame]. [`render`][Self::render] does all of
/// these in one call.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    pub ctx: Context,
    cam: Camera,
    dims: (u32, u32),
    faces: Vec<ProjectedFace>,
    // Per-mesh and per-face scratch space, reused between calls
    view_verts: Vec<Vec3<View>>,
    screen_verts: Vec<Option<ScreenVert>>,
    clipped: Vec<Tri<ClipVert>>,
}

impl<'a> Instance<'a> {
    /// Returns an unrotated instance of `mesh` at `pos`.
    pub fn new(mesh: &'a Mesh, pos: Vec3<World>) -> Self {
        Self {
            mesh,
            pos,
            yaw: None,
            pitch: None,
            roll: None,
            ground: false,
            skybox: false,
            dither_opacity: None,
            explosion_opacity: None,
        }
    }

    /// Returns `self` with the given rotation angles.
    pub fn with_rotation(self, yaw: Angle, pitch: Angle, roll: Angle) -> Self {
        Self {
            yaw: Some(yaw),
            pitch: Some(pitch),
            roll: Some(roll),
            ..self
        }
    }

    /// Returns `self` rotated so that its model-space +Z axis points
    /// towards `dir`.
    pub fn facing(self, dir: Vec3<World>) -> Self {
        let (yaw, pitch) = dir_to_angles(dir);
        Self {
            yaw: Some(yaw),
            pitch: Some(pitch),
            roll: None,
            ..self
        }
    }

    /// Returns `self` marked as ground.
    pub fn ground(self) -> Self {
        Self { ground: true, ..self }
    }

    /// Returns `self` marked as skybox.
    pub fn skybox(self) -> Self {
        Self { skybox: true, ..self }
    }

    /// Returns `self` with the given dither opacity.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self { dither_opacity: Some(opacity), ..self }
    }

    /// Returns `self` with the given explosion opacity.
    pub fn exploding(self, opacity: f32) -> Self {
        Self { explosion_opacity: Some(opacity), ..self }
    }

    /// Returns whether `self` is exempt from culling.
    pub fn is_exempt(&self) -> bool {
        self.ground || self.skybox
    }

    /// Returns the model-to-world rotation, or `None` if all angles are
    /// missing.
    ///
    /// Equals yaw, then pitch, then roll about the mesh's own axes, which is
    /// `rotate_z(roll)`, then `rotate_x(pitch)`, then `rotate_y(yaw)`
    /// about the fixed axes.
    pub fn rotation(&self) -> Option<Mat3> {
        if self.yaw.is_none() && self.pitch.is_none() && self.roll.is_none() {
            return None;
        }
        let [y, p, r] =
            [self.yaw, self.pitch, self.roll].map(Option::unwrap_or_default);
        Some(rotate_z(r).then(&rotate_x(p)).then(&rotate_y(y)))
    }

    /// Transforms a model-space point to world space.
    #[inline]
    pub fn to_world(&self, rot: Option<&Mat3>, pt: Vec3<Model>) -> Vec3<World> {
        let pt: Vec3<World> = match rot {
            Some(r) => r.apply(&pt).to(),
            None => pt.to(),
        };
        pt + self.pos
    }
}

impl ProjectedFace {
    /// Returns the opacity of `self`, the smaller of its dither and
    /// explosion opacities.
    pub fn opacity(&self) -> f32 {
        let d = self.dither_opacity.unwrap_or(1.0);
        let e = self.explosion_opacity.unwrap_or(1.0);
        d.min(e)
    }

    /// Returns the fogged brightness of `self`, or `None` if unlit.
    pub fn shade(&self) -> Option<f32> {
        self.brightness.map(|b| b * self.fog)
    }
}

impl Renderer {
    /// Returns a renderer with context `ctx`.
    pub fn new(ctx: Context) -> Self {
        Self { ctx, ..Self::default() }
    }

    /// Returns the faces collected this frame.
    pub fn faces(&self) -> &[ProjectedFace] {
        &self.faces
    }

    /// Returns the camera of the current frame.
    pub fn camera(&self) -> &Camera {
        &self.cam
    }

    /// Starts a new frame seen by `cam` on a screen of size `dims`.
    ///
    /// Empties the face list and starts the frame timer.
    pub fn begin_frame(&mut self, cam: &Camera, dims: (u32, u32)) {
        self.cam = *cam;
        self.dims = dims;
        self.faces.clear();
        self.ctx.stats.start();
    }

    /// Culls, lights, and transforms the faces of `inst`, appending the
    /// visible ones to the face list.
    ///
    /// Returns the faces appended.
    pub fn render_mesh<L>(
        &mut self,
        inst: &Instance,
        light: &Light,
        lighting: &L,
    ) -> &[ProjectedFace]
    where
        L: Lighting + ?Sized,
    {
        let start = self.faces.len();
        let Self {
            ctx,
            cam,
            dims,
            faces,
            view_verts,
            screen_verts,
            ..
        } = self;
        let mesh = inst.mesh;
        let exempt = inst.is_exempt();
        ctx.stats.objs.i += 1;

        if !exempt {
            let d = (inst.pos - cam.pos).xz();
            let rd = ctx.render_distance;
            if d.len_sqr() > rd * rd {
                return &[];
            }
        }
        let Some(bounds) = mesh.bounds() else {
            return &[];
        };
        let rot = inst.rotation();
        if !exempt {
            let bounds = if rot.is_some() {
                bounds.to_rotation_cube()
            } else {
                bounds
            };
            let bbox = Aabb {
                min: inst.to_world(None, bounds.min),
                max: inst.to_world(None, bounds.max),
            };
            if !ctx.projection(*dims).aabb_visible(cam, &bbox) {
                trace!("culled {:?} at {:?}", mesh.name, inst.pos);
                return &[];
            }
        }
        ctx.stats.objs.o += 1;

        let cam_rot = cam.rotation();
        let vport = ctx.viewport(*dims);
        view_verts.clear();
        screen_verts.clear();
        for &v in &mesh.verts {
            let view = cam.to_view(&cam_rot, inst.to_world(rot.as_ref(), v));
            view_verts.push(view);
            screen_verts.push(vport.project(view));
        }

        let bias = if inst.ground { ctx.ground_depth_bias } else { 0.0 };
        let cull = !exempt && !mesh.billboard;
        ctx.stats.faces.i += mesh.faces.len();

        for (i, face) in mesh.faces.iter().enumerate() {
            let verts = face.verts.map(|j| view_verts[j]);
            if clip::status(&verts) == Status::Hidden {
                continue;
            }
            let [a, b, c] = face.verts.map(|j| screen_verts[j]);
            let screen = all_some([a, b, c]);

            if cull && ctx.face_cull(is_backface(&verts, screen.as_ref())) {
                continue;
            }

            let brightness = (!mesh.unlit && !face.unlit).then(|| {
                let tri = mesh.tri(face);
                let normal: Vec3<World> = match &rot {
                    Some(r) => r.apply(&tri.normal()).to(),
                    None => tri.normal().to(),
                };
                if normal.len_sqr() == 0.0 {
                    light.ambient()
                } else {
                    let pt = inst.to_world(rot.as_ref(), tri.centroid());
                    light.brightness(lighting, pt, normal.normalize_fast())
                }
            });

            let depth = (verts[0].z() + verts[1].z() + verts[2].z()) / 3.0;
            faces.push(ProjectedFace {
                face: i,
                tex: face.tex,
                uvs: face.uvs,
                verts,
                screen,
                depth: depth + bias,
                brightness,
                fog: ctx.fog_factor(depth),
                dither_opacity: inst.dither_opacity,
                explosion_opacity: inst.explosion_opacity,
            });
        }
        ctx.stats.faces.o += faces.len() - start;
        &self.faces[start..]
    }

    /// Sorts the face list far to near.
    pub fn sort(&mut self) {
        sort::sort_faces(&mut self.faces);
    }

    /// Draws the face list into `fb` in its current order.
    ///
    /// Each lit face is drawn with the variant of its texture matching its
    /// brightness, fetched from `cache`. Faces whose texture is missing
    /// from `store` are skipped.
    pub fn draw<S>(
        &mut self,
        fb: &mut Framebuf,
        store: &mut S,
        cache: &mut BrightnessCache,
    ) where
        S: TextureStore + ?Sized,
    {
        self.draw_with(fb, store, cache, |_| {});
    }

    /// Like [`draw`][Self::draw], but also passes each scanline to
    /// `observer` before it is textured.
    pub fn draw_with<S, F>(
        &mut self,
        fb: &mut Framebuf,
        store: &mut S,
        cache: &mut BrightnessCache,
        mut observer: F,
    ) where
        S: TextureStore + ?Sized,
        F: FnMut(&Scanline),
    {
        let vport = self.ctx.viewport(fb.dims());
        let threshold = self.ctx.dither_threshold;
        let faces = mem::take(&mut self.faces);

        for f in &faces {
            let tex_id = match f.shade() {
                Some(b) => cache.get(store, f.tex, cache.level_of(b)),
                None => f.tex,
            };
            let Some(tex) = store.get(tex_id) else {
                warn!("face {} refers to missing texture {tex_id:?}", f.face);
                continue;
            };
            fb.set_opacity(f.opacity(), threshold);
            if fb.mask() == 0 {
                continue;
            }
            let stats = &mut self.ctx.stats;

            if let Some(s) = &f.screen {
                let vs = [0, 1, 2].map(|i| varyings(&s[i], f.uvs[i]));
                fill(fb, tex, vs, stats, &mut observer);
                continue;
            }

            let tri = Tri([0, 1, 2].map(|i| ClipVert {
                pos: f.verts[i],
                uv: f.uvs[i],
            }));
            self.clipped.clear();
            clip_tri(&tri, &mut self.clipped);
            stats.clips.i += 1;
            stats.clips.o += self.clipped.len();

            for Tri(cvs) in &self.clipped {
                let [a, b, c] = cvs.map(|cv| vport.project(cv.pos));
                let Some(s) = all_some([a, b, c]) else {
                    continue;
                };
                let vs = [0, 1, 2].map(|i| varyings(&s[i], cvs[i].uv));
                fill(fb, tex, vs, stats, &mut observer);
            }
        }
        fb.set_mask(OPAQUE);
        self.ctx.stats.cache += cache.take_stats();
        self.faces = faces;
    }

    /// Draws a world-space line segment into `fb` immediately, clipped
    /// against the near plane.
    pub fn draw_line(
        &mut self,
        fb: &mut Framebuf,
        Edge(a, b): Edge<Vec3<World>>,
        color: u8,
    ) {
        let rot = self.cam.rotation();
        let e = Edge(self.cam.to_view(&rot, a), self.cam.to_view(&rot, b));
        let Some(Edge(a, b)) = clip_line(e) else {
            return;
        };
        let vport = self.ctx.viewport(fb.dims());
        let (Some(a), Some(b)) = (vport.project(a), vport.project(b)) else {
            return;
        };
        let ends = [a, b].map(|v| vec2(v.pos.x(), v.pos.y()));
        let dims = fb.dims();
        line(ends, dims, |x, y| fb.plot(x, y, color));
    }

    /// Stops the frame timer and counts the frame.
    ///
    /// Returns the statistics of the frame.
    pub fn end_frame(&mut self) -> Stats {
        self.ctx.stats.finish();
        mem::take(&mut self.ctx.stats)
    }

    /// Renders a complete frame of `instances` seen by `cam` into `fb`.
    ///
    /// Clears `fb` first if the context has a clear color.
    pub fn render<S, L>(
        &mut self,
        cam: &Camera,
        instances: &[Instance],
        (light, lighting): (&Light, &L),
        fb: &mut Framebuf,
        store: &mut S,
        cache: &mut BrightnessCache,
    ) -> Stats
    where
        S: TextureStore + ?Sized,
        L: Lighting + ?Sized,
    {
        if let Some(c) = self.ctx.color_clear {
            fb.clear(c);
        }
        self.begin_frame(cam, fb.dims());
        for inst in instances {
            self.render_mesh(inst, light, lighting);
        }
        self.sort();
        self.draw(fb, store, cache);
        self.end_frame()
    }
}

/// Returns whether a face is facing away from the camera.
///
/// Uses the screen-space winding if the face is projected, otherwise the
/// orientation of the view-space triangle relative to the eye.
fn is_backface(
    verts: &[Vec3<View>; 3],
    screen: Option<&[ScreenVert; 3]>,
) -> bool {
    match screen {
        Some([a, b, c]) => {
            let xy = |v: &ScreenVert| vec2::<Screen>(v.pos.x(), v.pos.y());
            let (a, b, c) = (xy(a), xy(b), xy(c));
            (b - a).perp_dot(&(c - a)) <= 0.0
        }
        None => {
            let [a, b, c] = *verts;
            (b - a).cross(&(c - a)).dot(&a) <= 0.0
        }
    }
}

fn all_some<T: Copy>([a, b, c]: [Option<T>; 3]) -> Option<[T; 3]> {
    Some([a?, b?, c?])
}

fn varyings(v: &ScreenVert, uv: TexCoord) -> Varyings {
    Varyings::new(v.pos.x(), v.pos.y(), v.inv_w, uv)
}

fn fill<F: FnMut(&Scanline)>(
    fb: &mut Framebuf,
    tex: &Texture,
    verts: [Varyings; 3],
    stats: &mut Stats,
    observer: &mut F,
) {
    tri_fill(verts, fb.dims(), |sl| {
        observer(&sl);
        stats.spans += 1;
        stats.pixels += fb.draw_scanline(sl, tex);
    });
}
