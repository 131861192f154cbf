//! Interactive first-person viewer.
//!
//! ```bash
//! RUST_LOG=debug cargo run --release -- --width 960 --height 600
//! ```
//!
//! Arrows / WASD move, Alt + ←/→ strafes, Esc quits.

use anyhow::Context;
use clap::Parser;
use glam::{Vec2, vec2};
use minifb::{Key, Window, WindowOptions};
use std::time::{Duration, Instant};
use tracing::info;

use yacast_rs::{
    renderer::{RenderConfig, RenderFlags, Renderer, Software},
    world::{
        Billboard, Cell, EyePose, GridMap, Rgba, Texture, TextureBank, TextureError, TextureId,
    },
};

const DEMO_MAP: &str = "
1111111111111111
1..............1
1..2222....33..1
1..2..........11
1..2..4444.....1
1.........4....1
1111.3....4..2.1
1....3.......2.1
1....3..1111.2.1
1..............1
1111111111111111
";

const MOVE_SPEED: f32 = 3.0; // map units per second
const TURN_SPEED: f32 = 2.0; // radians per second
const RADIUS: f32 = 0.2; // collision radius

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    #[arg(long, default_value_t = 960)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov_deg: f32,

    /// Render distance in map units
    #[arg(long, default_value_t = 20.0)]
    max_depth: f32,

    #[arg(long)]
    no_fisheye: bool,

    #[arg(long)]
    no_shading: bool,

    #[arg(long)]
    no_fog: bool,

    /// Render on the calling thread only
    #[arg(long)]
    sequential: bool,
}

impl Opts {
    fn config(&self) -> RenderConfig {
        let mut flags = RenderFlags::all();
        flags.set(RenderFlags::FISHEYE_CORRECTION, !self.no_fisheye);
        flags.set(RenderFlags::SIDE_SHADING, !self.no_shading);
        flags.set(RenderFlags::SPRITE_FOG, !self.no_fog);
        flags.set(RenderFlags::PARALLEL, !self.sequential);
        RenderConfig {
            fov: self.fov_deg.to_radians(),
            max_depth: self.max_depth,
            flags,
            ..RenderConfig::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();
    let cfg = opts.config();
    let (w, h) = (opts.width, opts.height);

    let grid = GridMap::from_ascii(DEMO_MAP).context("demo map")?;
    let (bank, sprite_ids) = demo_textures()?;
    let billboards = [
        Billboard::new(vec2(6.5, 3.5), sprite_ids[0]),
        Billboard::new(vec2(11.5, 5.5), sprite_ids[1]),
        Billboard::new(vec2(3.5, 8.5), sprite_ids[0]),
        Billboard::new(vec2(13.5, 9.5), sprite_ids[1]),
    ];

    info!(map_w = grid.width(), map_h = grid.height(), w, h, "grid viewer");

    let mut eye = EyePose::new(vec2(1.5, 1.5), 0.3, cfg.fov);
    let mut renderer = Software::new(cfg)?;

    let mut win = Window::new("yacast software render", w, h, WindowOptions::default())?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let mut last_tick = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let dt = last_tick.elapsed().as_secs_f32();
        last_tick = Instant::now();

        /* movement --------------------------------------------------------- */
        let mut forward = 0.0;
        let mut strafe = 0.0;
        let mut turn = 0.0;
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            forward += 1.0;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            forward -= 1.0;
        }
        let alt = win.is_key_down(Key::LeftAlt) || win.is_key_down(Key::RightAlt);
        if alt {
            if win.is_key_down(Key::Left) {
                strafe -= 1.0;
            }
            if win.is_key_down(Key::Right) {
                strafe += 1.0;
            }
        } else {
            // columns to the right of centre look at larger angles
            if win.is_key_down(Key::Left) {
                turn -= 1.0;
            }
            if win.is_key_down(Key::Right) {
                turn += 1.0;
            }
        }
        if win.is_key_down(Key::A) {
            strafe -= 1.0;
        }
        if win.is_key_down(Key::D) {
            strafe += 1.0;
        }

        eye.angle += turn * TURN_SPEED * dt;
        let fwd = eye.forward();
        let right = vec2(-fwd.y, fwd.x);
        let step = (fwd * forward + right * strafe) * MOVE_SPEED * dt;
        eye.pos = slide(&grid, eye.pos, step);

        /* draw ------------------------------------------------------------- */
        let t0 = Instant::now();
        renderer.begin_frame(w, h);
        renderer.draw_walls(&eye, &grid, &bank);
        renderer.draw_billboards(&eye, &billboards, &bank);
        let mut shown = Ok(());
        renderer.end_frame(|fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            info!(
                avg_ms = %format!("{avg_ms:.2}"),
                fps = %format!("{:.1}", 1000.0 / avg_ms),
                "render timing"
            );
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

/// Move by `step`, one axis at a time, so walls block without sticking.
fn slide(grid: &GridMap, pos: Vec2, step: Vec2) -> Vec2 {
    let blocked = |p: Vec2| {
        [
            vec2(-RADIUS, -RADIUS),
            vec2(RADIUS, -RADIUS),
            vec2(-RADIUS, RADIUS),
            vec2(RADIUS, RADIUS),
        ]
        .iter()
        .any(|o| {
            let c = (p + *o).floor();
            grid.is_wall(c.x as i32, c.y as i32)
        })
    };
    let mut out = pos;
    if !blocked(vec2(out.x + step.x, out.y)) {
        out.x += step.x;
    }
    if !blocked(vec2(out.x, out.y + step.y)) {
        out.y += step.y;
    }
    out
}

/*──────────────────────── procedural textures ────────────────────────*/

const TEX: usize = 64;

fn demo_textures() -> anyhow::Result<(TextureBank, [TextureId; 2])> {
    let mut bank = TextureBank::new();

    let brick = paint("BRICK", |x, y| {
        let offset = if (y / 16) % 2 == 0 { 0 } else { 16 };
        if y % 16 == 0 || (x + offset) % 32 == 0 {
            0xFF_B4B4A0
        } else {
            0xFF_8C2A1E ^ (((x * 7 + y * 13) % 9) as Rgba)
        }
    })?;
    let stone = paint("STONE", |x, y| {
        let g = 0x60 + (((x * 37 + y * 91) ^ (x * y)) % 48) as Rgba;
        0xFF_000000 | (g << 16) | (g << 8) | g
    })?;
    let door = paint("DOOR", |x, y| {
        if x < 4 || x >= TEX - 4 || y < 4 {
            0xFF_505050
        } else if x % 12 == 0 {
            0xFF_5A3A1A
        } else {
            0xFF_7A5230
        }
    })?;

    let stone = bank.insert("STONE", stone)?;
    let brick = bank.insert("BRICK", brick)?;
    let door = bank.insert("DOOR", door)?;
    bank.bind_wall(Cell(1), stone);
    bank.bind_wall(Cell(2), brick);
    bank.bind_wall(Cell::DOOR, door);
    // wall type 4 stays unbound and is drawn from the flat palette

    let orb = paint("ORB", |x, y| {
        let d = vec2(x as f32 - 31.5, y as f32 - 31.5).length();
        if d > 28.0 {
            0x00_000000
        } else if d > 24.0 {
            0xFF_203060
        } else {
            0xFF_40A0FF
        }
    })?;
    let pillar = paint("PILLAR", |x, _| {
        if (20..44).contains(&x) { 0xFF_C8B070 } else { 0x00_000000 }
    })?;
    let orb = bank.insert("ORB", orb)?;
    let pillar = bank.insert("PILLAR", pillar)?;

    Ok((bank, [orb, pillar]))
}

fn paint(name: &str, f: impl Fn(usize, usize) -> Rgba) -> Result<Texture, TextureError> {
    let pixels = (0..TEX * TEX).map(|i| f(i % TEX, i / TEX)).collect();
    Texture::new(name, TEX, TEX, pixels)
}
