use std::ops::ControlFlow::Continue;

use env_logger::Env;
use log::{info, warn};
use minifb::{Key, KeyRepeat};

use fc::math::rand::{Distrib, Uniform, Xorshift64};
use fc::prelude::*;
use fc::render::cache::ColorMap;
use fc::render::tex::TRANSPARENT;
use fc_front::{Palette, dims::VGA_640_480, minifb::Window};
use fc_geom::{Billboard, Box, Build, Cube, Grid, UvSphere};

/// Palette index of shade `shade` of hue `hue`.
fn color(hue: u8, shade: u8) -> u8 {
    hue * 32 + shade.min(31)
}

/// An 8×8 texture of random shades of `hue`.
fn speckled(hue: u8, shades: std::ops::Range<i32>, seed: u64) -> Texture {
    let mut rng = Xorshift64::from_seed(seed);
    let d = Uniform(shades);
    Texture::new(Buf2::new_with(8, 8, |_, _| {
        color(hue, d.sample(&mut rng) as u8)
    }))
}

/// A 16×16 disc fading from a bright center, transparent outside.
fn fireball() -> Texture {
    Texture::new(Buf2::new_with(16, 16, |x, y| {
        let (dx, dy) = (x as f32 - 7.5, y as f32 - 7.5);
        let r = (dx * dx + dy * dy).sqrt() / 8.0;
        if r > 1.0 {
            TRANSPARENT
        } else {
            color(3, (31.0 * (1.0 - r * r)) as u8)
        }
    }))
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
    info!("Press F to toggle fog, Space to pause the camera");

    let palette = Palette::ramps();
    let mut win = match Window::builder()
        .title("facet//orbit")
        .dims(VGA_640_480)
        .palette(palette.clone())
        .build()
    {
        Ok(win) => win,
        Err(e) => {
            warn!("could not open window: {e}");
            return;
        }
    };
    win.ctx.fog = None;
    win.ctx.render_distance = 60.0;

    let mut store = Textures::new();
    let ground = store.push(speckled(2, 8..14, 1));
    let ground_alt = store.push(speckled(2, 12..18, 2));
    let stone = store.push(speckled(0, 14..26, 3));
    let hull = store.push(speckled(5, 18..28, 4));
    let ball = store.push(speckled(4, 16..31, 5));
    let fire = store.push(fireball());

    let cmap = ColorMap::from_palette(palette.rgb(), 32);
    let levels = cmap.level_rows(16);
    let mut cache = BrightnessCache::new(cmap, levels, TexId(64), 1024);

    let grid = Grid { size: 80.0, cells: 16, alt_tex: Some(ground_alt) }
        .build(ground);
    let cube = Cube { side_len: 2.0 }.build(stone);
    let sphere =
        UvSphere { radius: 1.5, sectors: 16, stacks: 10 }.build(ball);
    let ship = Box::new(vec3(-0.5, -0.3, -1.5), vec3(0.5, 0.3, 1.5))
        .build(hull);

    let scatter = Uniform(vec3(-30.0, 1.0, -30.0)..vec3(30.0, 1.0, 30.0));
    let cube_pos: Vec<Vec3<World>> = scatter
        .iter(Xorshift64::from_seed(42))
        .take(24)
        .collect();

    let light = Light::Directional {
        dir: vec3(-1.0, 2.0, -0.5),
        intensity: 0.8,
        ambient: 0.2,
    };

    let mut heading = Quat::IDENTITY;
    let mut ship_pos = vec3(0.0, 4.0, 0.0);
    let mut orbit = turns(0.0);
    let mut paused = false;

    let stats = win.run(|frame| {
        let t = frame.t.as_secs_f32();
        let dt = frame.dt.as_secs_f32();

        let imp = &frame.win.imp;
        if imp.is_key_pressed(Key::F, KeyRepeat::No) {
            let ctx = &mut frame.renderer.ctx;
            ctx.fog = match ctx.fog {
                Some(_) => None,
                None => Some(20.0..50.0),
            };
        }
        if imp.is_key_pressed(Key::Space, KeyRepeat::No) {
            paused = !paused;
        }
        if !paused {
            orbit += turns(0.03 * dt);
        }

        let mut cam = Camera::new(vec3(0.0, 2.0, 0.0))
            .with_angles(orbit, degs(20.0));
        cam.distance = 18.0;

        // The ship chases a target circling the origin
        let target: Vec3<World> =
            vec3(12.0 * (t * 0.4).cos(), 4.0, 12.0 * (t * 0.4).sin());
        let wanted = Quat::from_dir(target - ship_pos);
        heading = heading.turn_towards(&wanted, degs(60.0 * dt));
        let dir: Vec3<World> = heading.to_dir();
        ship_pos = ship_pos + dir * (4.0 * dt);

        let phase = (t % 3.0) / 3.0;
        let size = 1.0 + 4.0 * phase;
        let boom = Billboard { width: size, height: size }
            .build_facing(&cam, fire)
            .unlit();

        let origin = vec3(0.0, 0.0, 0.0);
        let mut insts = vec![Instance::new(&grid, origin).ground()];
        for (i, &pos) in cube_pos.iter().enumerate() {
            let spin = turns(0.1 * t + i as f32 * 0.13);
            let flat = degs(0.0);
            let inst = Instance::new(&cube, pos);
            insts.push(inst.with_rotation(spin, flat, flat));
        }
        insts.push(Instance::new(&sphere, vec3(0.0, 1.5, 0.0)));
        insts.push(Instance::new(&ship, ship_pos).facing(dir));
        insts.push(
            Instance::new(&boom, vec3(-6.0, 3.0, 6.0)).exploding(1.0 - phase),
        );

        *frame.stats += frame.renderer.render(
            &cam,
            &insts,
            (&light, &Lambert),
            frame.buf,
            &mut store,
            &mut cache,
        );

        let axis = Edge(target, target + vec3(0.0, 3.0, 0.0));
        frame.renderer.draw_line(frame.buf, axis, color(1, 31));

        Continue(())
    });
    info!("rendered {} frames in {:?}", stats.frames, stats.time);
}
