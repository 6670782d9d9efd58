use facet_core::assert_approx_eq;
use facet_core::math::rand::{Distrib, Uniform, Xorshift64};
use facet_core::prelude::*;
use facet_core::render::{
    cam::Viewport,
    clip::{ClipVert, NEAR_PLANE, clip_tri, is_behind},
    frustum::Projection,
    sort::sort_faces,
};

const SIDES: [[usize; 4]; 6] = [
    [0b001, 0b011, 0b010, 0b000],
    [0b100, 0b110, 0b111, 0b101],
    [0b000, 0b010, 0b110, 0b100],
    [0b101, 0b111, 0b011, 0b001],
    [0b000, 0b100, 0b101, 0b001],
    [0b011, 0b111, 0b110, 0b010],
];

fn unit_cube(tex: TexId) -> Mesh {
    let verts = (0..8).map(|i| {
        let c = |bit| if i & bit != 0 { 0.5 } else { -0.5 };
        vec3(c(1), c(2), c(4))
    });
    let uvs = [uv(0.0, 1.0), uv(0.0, 0.0), uv(1.0, 0.0), uv(1.0, 1.0)];
    let faces = SIDES.iter().flat_map(|&[a, b, c, d]| {
        [
            Face::new([a, b, c], tex, [uvs[0], uvs[1], uvs[2]]),
            Face::new([a, c, d], tex, [uvs[0], uvs[2], uvs[3]]),
        ]
    });
    Mesh::new(faces, verts)
}

fn sun() -> Light {
    Light::Directional {
        dir: vec3(0.0, 0.0, -1.0),
        intensity: 0.8,
        ambient: 0.2,
    }
}

fn store_and_cache() -> (Textures, BrightnessCache) {
    let mut store = Textures::new();
    store.push(Texture::new(Buf2::new(2, 2, [10, 20, 30, 40])));
    let rows = Buf2::new_with(256, 4, |c, r| match (c, r) {
        (0, _) | (_, 0) => c as u8,
        _ => (c / (r + 1)).max(1) as u8,
    });
    let cmap = ColorMap::new(rows);
    let cache = BrightnessCache::new(cmap, vec![3, 2, 1, 0], TexId(50), 16);
    (store, cache)
}

#[test]
fn cube_seen_from_the_front() {
    let cube = unit_cube(TexId(0));
    let mut rdr = Renderer::default();
    rdr.ctx.render_distance = 20.0;
    assert_eq!(rdr.ctx.fov, degs(70.0));

    rdr.begin_frame(&Camera::new(vec3(0.0, 0.0, -5.0)), (320, 240));
    let inst = Instance::new(&cube, vec3(0.0, 0.0, 0.0));
    let faces = rdr.render_mesh(&inst, &sun(), &Lambert);

    assert_eq!(faces.len(), 2);
    for f in faces {
        assert!((f.depth - 5.0).abs() <= 0.5, "depth {}", f.depth);
        assert_approx_eq!(f.depth, 4.5);
        assert!(f.screen.is_some());
        // Facing the light head on
        assert_approx_eq!(f.brightness.unwrap(), 1.0, eps = 1e-2);
    }
    assert_eq!(rdr.ctx.stats.faces.i, 12);
    assert_eq!(rdr.ctx.stats.faces.o, 2);
}

#[test]
fn cube_seen_from_a_corner() {
    let cube = unit_cube(TexId(0));
    let mut rdr = Renderer::default();
    let cam = Camera::new(vec3(4.0, 4.0, -4.0)).look_at(vec3(0.0, 0.0, 0.0));

    rdr.begin_frame(&cam, (320, 240));
    let inst = Instance::new(&cube, vec3(0.0, 0.0, 0.0));
    let faces = rdr.render_mesh(&inst, &sun(), &Lambert);

    // The +x, +y, and -z sides
    assert_eq!(faces.len(), 6);
    let mut sides: Vec<_> = faces.iter().map(|f| f.face / 2).collect();
    sides.dedup();
    assert_eq!(sides, [0, 3, 5]);
}

#[test]
fn cube_straddling_the_near_plane() {
    let cube = unit_cube(TexId(0));
    let mut rdr = Renderer::default();
    rdr.ctx.face_cull = None;
    rdr.ctx.fov = degs(120.0);

    rdr.begin_frame(&Camera::default(), (200, 200));
    let inst = Instance::new(&cube, vec3(0.0, 0.0, 0.005));
    let faces = rdr.render_mesh(&inst, &sun(), &Lambert).to_vec();

    // The near side is entirely behind the near plane
    assert_eq!(faces.len(), 10);

    let mut n_clipped = 0;
    for f in &faces {
        let any_behind = f.verts.iter().any(|v| is_behind(v.z()));
        assert_eq!(f.screen.is_none(), any_behind);
        if !any_behind {
            continue;
        }
        let tri = Tri([0, 1, 2].map(|i| ClipVert {
            pos: f.verts[i],
            uv: f.uvs[i],
        }));
        let mut out = Vec::new();
        clip_tri(&tri, &mut out);
        assert!(out.len() == 1 || out.len() == 2, "{out:?}");
        for Tri(vs) in &out {
            assert!(vs.iter().all(|v| v.pos.z() >= NEAR_PLANE));
        }
        n_clipped += 1;
    }
    assert_eq!(n_clipped, 8);

    let (mut store, mut cache) = store_and_cache();
    let mut fb = Framebuf::new((200, 200));
    rdr.sort();
    rdr.draw(&mut fb, &mut store, &mut cache);
    let stats = rdr.end_frame();
    // Only the straddling sides go through the clipper
    assert_eq!(stats.clips.i, 8);
    assert!(stats.clips.o >= 8);
    // Surrounded by the cube, (nearly) every pixel is covered
    let covered = fb.buf.data().iter().filter(|&&c| c != 0).count();
    assert!(covered > 200 * 200 * 9 / 10, "{covered}");
}

#[test]
fn faces_are_drawn_back_to_front() {
    let cube = unit_cube(TexId(0));
    let rng = Xorshift64::from_seed(1234);
    let positions: Vec<Vec3<World>> =
        Uniform(vec3(-10.0, -2.0, 5.0)..vec3(10.0, 2.0, 40.0))
            .iter(rng)
            .take(50)
            .collect();
    let insts: Vec<_> = positions
        .iter()
        .map(|&p| Instance::new(&cube, p))
        .collect();

    let mut rdr = Renderer::default();
    rdr.begin_frame(&Camera::default(), (320, 240));
    for inst in &insts {
        rdr.render_mesh(inst, &sun(), &Lambert);
    }
    let n = rdr.faces().len();
    assert!(n > 20);
    rdr.sort();

    let depths: Vec<_> = rdr.faces().iter().map(|f| f.depth).collect();
    assert_eq!(depths.len(), n);
    assert!(depths.windows(2).all(|w| w[0] >= w[1]), "{depths:?}");
}

#[test]
fn sort_faces_around_insertion_threshold() {
    let tmpl = {
        let cube = unit_cube(TexId(0));
        let mut rdr = Renderer::default();
        rdr.begin_frame(&Camera::new(vec3(0.0, 0.0, -5.0)), (10, 10));
        let inst = Instance::new(&cube, vec3(0.0, 0.0, 0.0));
        rdr.render_mesh(&inst, &sun(), &Lambert)[0]
    };
    for n in [0, 1, 19, 20, 21, 1000] {
        let depths = Uniform(0.0..100.0).iter(Xorshift64::from_seed(n as u64));
        let mut faces: Vec<_> = depths
            .take(n)
            .map(|depth| ProjectedFace { depth, ..tmpl })
            .collect();
        sort_faces(&mut faces);
        assert!(
            faces.windows(2).all(|w| w[0].depth >= w[1].depth),
            "n = {n}"
        );
    }
}

#[test]
fn frustum_margin_boundary() {
    let proj = Projection {
        tan_half_fov: 1.0,
        aspect: 1.0,
        near: NEAR_PLANE,
        far: 100.0,
    };
    let cam = Camera::default();
    let at = |x: f32| {
        let p = vec3(x, 0.0, 10.0);
        proj.aabb_visible(&cam, &Aabb { min: p, max: p })
    };
    assert!(at(12.0));
    assert!(at(-12.0));
    assert!(!at(12.1));
    assert!(!at(-12.1));
}

#[test]
fn near_plane_is_shared_by_projection_and_clipping() {
    let vp = Viewport::new(100, 100, degs(90.0));
    assert!(vp.project(vec3(0.0, 0.0, NEAR_PLANE)).is_some());
    assert!(vp.project(vec3(0.0, 0.0, NEAR_PLANE * 0.99)).is_none());

    let tri = Tri([
        ClipVert { pos: vec3(0.0, 0.0, -1.0), uv: uv(0.0, 0.0) },
        ClipVert { pos: vec3(1.0, 0.0, 1.0), uv: uv(1.0, 0.0) },
        ClipVert { pos: vec3(0.0, 1.0, 1.0), uv: uv(0.0, 1.0) },
    ]);
    let mut out = Vec::new();
    clip_tri(&tri, &mut out);
    for Tri(vs) in out {
        for v in vs {
            assert!(vp.project(v.pos).is_some(), "{v:?}");
        }
    }
}

#[test]
fn brightness_cache_properties() {
    let (mut store, mut cache) = store_and_cache();
    let t = TexId(0);

    let a = cache.get(&mut store, t, 1);
    let b = cache.get(&mut store, t, 1);
    assert_eq!(a, b);
    assert_eq!(cache.len(), 1);

    let lo = cache.get(&mut store, t, 0);
    for level in [-1, -5, i32::MIN] {
        assert_eq!(cache.get(&mut store, t, level), lo);
    }
    let hi = cache.get(&mut store, t, 3);
    for level in [4, 100, i32::MAX] {
        assert_eq!(cache.get(&mut store, t, level), hi);
    }
    // The brightest level uses the identity row
    assert_eq!(hi, t);
    assert_eq!(cache.len(), 2);

    let stats = cache.take_stats();
    assert_eq!(stats.fallbacks, 0);
    assert_eq!(stats.misses + stats.hits, 10);
}

#[test]
fn full_frame() {
    let cube = unit_cube(TexId(0));
    let (mut store, mut cache) = store_and_cache();
    let mut fb = Framebuf::new((64, 48));
    let mut rdr = Renderer::default();

    let insts = [
        Instance::new(&cube, vec3(0.0, 0.0, 0.0)),
        // Beyond the render distance
        Instance::new(&cube, vec3(0.0, 0.0, 500.0)),
    ];
    let stats = rdr.render(
        &Camera::new(vec3(0.0, 0.0, -3.0)),
        &insts,
        (&sun(), &Lambert),
        &mut fb,
        &mut store,
        &mut cache,
    );
    assert_eq!(stats.objs.i, 2);
    assert_eq!(stats.objs.o, 1);
    assert_eq!(stats.faces.o, 2);
    assert!(stats.pixels > 0);
    assert_eq!(stats.cache.misses + stats.cache.hits, 2);
    assert_eq!(stats.clips.i, 0);

    // Lit head on, the cube is drawn with the base texture
    let center = fb.buf[[32, 24]];
    assert!([10, 20, 30, 40].contains(&center), "{center}");
    assert_eq!(fb.buf[[0, 0]], 0);
}

#[test]
fn objects_partly_off_screen() {
    let cube = unit_cube(TexId(0));
    let (mut store, mut cache) = store_and_cache();
    let mut rdr = Renderer::default();
    let cam = Camera::new(vec3(0.0, 0.0, -3.0));

    // At |x| = 2.4 the cube is inside the culling margin but has no
    // pixels on screen
    for x in [-2.4, -1.9, -1.6, 1.6, 1.9, 2.4] {
        let mut fb = Framebuf::new((64, 48));
        let insts = [Instance::new(&cube, vec3(x, 0.0, 0.0))];
        let stats = rdr.render(
            &cam,
            &insts,
            (&sun(), &Lambert),
            &mut fb,
            &mut store,
            &mut cache,
        );
        assert_eq!(stats.objs.o, 1, "x = {x}");
        assert_eq!(stats.pixels > 0, x.abs() < 2.0, "x = {x}");
        assert!(stats.pixels < 64 * 48 / 2, "x = {x}");
    }
}
