//! Benchmarks of the clipping, sorting, and drawing stages.

use core::iter::repeat_with;

use criterion::*;

use facet_core::math::rand::{Distrib, Uniform, Xorshift64};
use facet_core::prelude::*;
use facet_core::render::clip::{Clip, ClipVert};
use facet_core::render::sort::sort_desc_by_key;

const SIZES: [usize; 3] = [10, 100, 1000];

fn random_tris(n: usize, z: std::ops::Range<f32>) -> Vec<Tri<ClipVert>> {
    let rng = &mut Xorshift64::from_seed(123);
    let pts = Uniform(vec3(-10.0, -10.0, z.start)..vec3(10.0, 10.0, z.end));
    repeat_with(|| {
        Tri([(); 3].map(|_| ClipVert {
            pos: pts.sample(rng),
            uv: uv(0.5, 0.5),
        }))
    })
    .take(n)
    .collect()
}

fn clip(c: &mut Criterion) {
    let mut group = c.benchmark_group("clip");
    for n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        for (name, z) in [("mixed", -1.0..1.0), ("inside", 1.0..10.0)] {
            let tris = random_tris(n, z);
            let mut out = Vec::with_capacity(2 * n);
            group.bench_with_input(BenchmarkId::new(name, n), &tris, |b, tris| {
                b.iter(|| {
                    out.clear();
                    tris.as_slice().clip(&mut out);
                    out.len()
                })
            });
        }
    }
    group.finish();
}

fn sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    for n in SIZES {
        let depths: Vec<f32> = Uniform(0.0..1000.0)
            .iter(Xorshift64::from_seed(n as u64))
            .take(n)
            .collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("desc", n), &depths, |b, d| {
            b.iter_batched_ref(
                || d.clone(),
                |d| sort_desc_by_key(d, |&x| x),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn frame(c: &mut Criterion) {
    let mut store = Textures::new();
    let tex = store.push(Texture::new(Buf2::new_with(8, 8, |x, y| {
        1 + ((x ^ y) & 7) as u8
    })));
    let rows = Buf2::new_with(256, 8, |c, r| match (c, r) {
        (0, _) | (_, 0) => c as u8,
        _ => (c * (8 - r) / 8).max(1) as u8,
    });
    let mut cache = BrightnessCache::new(
        ColorMap::new(rows),
        (0..8).rev().collect(),
        TexId(100),
        256,
    );

    let uvs = [uv(0.0, 1.0), uv(0.0, 0.0), uv(1.0, 0.0)];
    let mut b = Mesh::builder();
    let pts = Uniform(vec3(-1.0, -1.0, -1.0)..vec3(1.0, 1.0, 1.0));
    let rng = &mut Xorshift64::from_seed(7);
    for _ in 0..200 {
        let i = b.vert_count();
        b.push_verts(repeat_with(|| pts.sample(rng)).take(3));
        b.push_face([i, i + 1, i + 2], tex, uvs);
    }
    let mesh = b.build();

    let insts: Vec<_> = (-3..=3)
        .flat_map(|j| (-3..=3).map(move |i| (i, j)))
        .map(|(i, j)| {
            let pos = vec3(3.0 * i as f32, 0.0, 3.0 * j as f32);
            Instance::new(&mesh, pos)
        })
        .collect();

    let light = Light::default();
    let cam = Camera::new(vec3(0.0, 5.0, -15.0)).look_at(vec3(0.0, 0.0, 0.0));
    let mut fb = Framebuf::new((320, 200));
    let mut rdr = Renderer::default();
    rdr.ctx.face_cull = None;

    c.bench_function("frame", |b| {
        b.iter(|| {
            rdr.render(
                &cam,
                &insts,
                (&light, &Lambert),
                &mut fb,
                &mut store,
                &mut cache,
            )
        })
    });
}

criterion_group!(benches, clip, sort, frame);
criterion_main!(benches);
