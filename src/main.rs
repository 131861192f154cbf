//! Top-down 2-D grid viewer with the cast rays drawn over it.
//!
//! ```bash
//! cargo run --release --bin yacast_rs -- [map.txt]
//! ```
//!
//! ←/→ turn, ↑/↓ move, Esc quits. Without a path a built-in room is shown.

use anyhow::Context;
use glam::{Vec2, vec2};
use minifb::{Key, Window, WindowOptions};
use std::{f32::consts::FRAC_PI_3, fs};
use tracing::info;

use yacast_rs::{
    renderer::{RenderConfig, software::cast_column},
    world::{EyePose, GridMap},
};

const WIDTH: usize = 1024;
const HEIGHT: usize = 768;
const RAYS: usize = 64;

const FALLBACK_MAP: &str = "
11111111
1......1
1..22..1
1......1
1.3..4.1
11111111
";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // ─────────── parse CLI ────────────
    let src = match std::env::args().nth(1) {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("reading {path}"))?
        }
        None => FALLBACK_MAP.to_owned(),
    };
    let grid = GridMap::from_ascii(&src)?;
    info!(w = grid.width(), h = grid.height(), "grid loaded");

    // ─────────── map-space → screen-space transform ────────────
    let scale = (WIDTH as f32 / grid.width() as f32)
        .min(HEIGHT as f32 / grid.height() as f32)
        * 0.9;
    let offset = vec2(
        (WIDTH as f32 - grid.width() as f32 * scale) / 2.0,
        (HEIGHT as f32 - grid.height() as f32 * scale) / 2.0,
    );
    let to_screen = |p: Vec2| -> (i32, i32) {
        let s = p * scale + offset;
        (s.x as i32, s.y as i32)
    };

    let cfg = RenderConfig::default();
    let mut eye = EyePose::new(
        vec2(grid.width() as f32 * 0.5, grid.height() as f32 * 0.5),
        0.0,
        FRAC_PI_3,
    );

    let mut buffer = vec![0u32; WIDTH * HEIGHT];
    let mut window = Window::new("grid map", WIDTH, HEIGHT, WindowOptions::default())?;
    window.set_target_fps(60);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if window.is_key_down(Key::Left) {
            eye.angle -= 0.03;
        }
        if window.is_key_down(Key::Right) {
            eye.angle += 0.03;
        }
        let step = eye.forward() * 0.05;
        if window.is_key_down(Key::Up) && !blocked(&grid, eye.pos + step) {
            eye.pos += step;
        }
        if window.is_key_down(Key::Down) && !blocked(&grid, eye.pos - step) {
            eye.pos -= step;
        }

        // ─────────── rasterise cells ────────────
        buffer.fill(0);
        for (x, y, cell) in grid.iter() {
            if !cell.is_wall() {
                continue;
            }
            let colour = if cell.is_door() { 0x00_A07040 } else { 0x00_606060 };
            let (x0, y0) = to_screen(vec2(x as f32, y as f32));
            let (x1, y1) = to_screen(vec2(x as f32 + 1.0, y as f32 + 1.0));
            fill_rect(&mut buffer, WIDTH, HEIGHT, x0, y0, x1, y1, colour);
        }

        // ─────────── rays ────────────
        let (ex, ey) = to_screen(eye.pos);
        for col in 0..RAYS {
            let ray = cast_column(col, RAYS, &eye, &grid, &cfg);
            let len = ray.hit.map_or(cfg.max_depth, |h| h.ray_len);
            let (sin, cos) = ray.angle.sin_cos();
            let (hx, hy) = to_screen(eye.pos + vec2(cos, sin) * len);
            let colour = if ray.hit.is_some() { 0x00_FFFF00 } else { 0x00_804040 };
            draw_line(&mut buffer, WIDTH, HEIGHT, ex, ey, hx, hy, colour);
        }

        window.update_with_buffer(&buffer, WIDTH, HEIGHT)?;
    }
    Ok(())
}

fn blocked(grid: &GridMap, p: Vec2) -> bool {
    grid.is_wall(p.x.floor() as i32, p.y.floor() as i32)
}

#[allow(clippy::too_many_arguments)]
fn fill_rect(
    buf: &mut [u32],
    w: usize,
    h: usize,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    colour: u32,
) {
    for y in y0.max(0)..(y1 - 1).min(h as i32) {
        let row = y as usize * w;
        // one-pixel gap keeps neighbouring cells apart
        for x in x0.max(0)..(x1 - 1).min(w as i32) {
            buf[row + x as usize] = colour;
        }
    }
}

/// Integer Bresenham line‑drawing algorithm.
#[allow(clippy::too_many_arguments)]
fn draw_line(
    buf: &mut [u32],
    w: usize,
    h: usize,
    mut x0: i32,
    mut y0: i32,
    x1: i32,
    y1: i32,
    colour: u32,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if (0..w as i32).contains(&x0) && (0..h as i32).contains(&y0) {
            buf[y0 as usize * w + x0 as usize] = colour;
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
