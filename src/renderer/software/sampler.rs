// Texture sampling, per-side shading and missing-texture fallback.
//
// Colours are 0xAARRGGBB; shading scales the RGB channels and leaves
// alpha alone.

use tracing::warn;

use crate::{
    renderer::{
        config::{RenderConfig, RenderFlags},
        software::raycast::Side,
    },
    world::{Cell, Rgba, Texture, TextureBank, TextureId},
};

/// Drawn wherever a texture id resolves to nothing.
pub const FALLBACK: Rgba = 0xFF_FF00FF;

/// Flat colour for wall types that have no texture bound.
pub fn wall_palette(code: Cell) -> Rgba {
    match code.0 {
        1 => 0xFF_C80000,
        2 => 0xFF_00C800,
        3 => 0xFF_0000C8,
        4 => 0xFF_C8C800,
        _ => 0xFF_969696,
    }
}

/// Multiply each colour channel by `k` (`0.0 ..= 1.0`).
#[inline]
pub fn shade(c: Rgba, k: f32) -> Rgba {
    let ch = |shift: u32| ((((c >> shift) & 0xFF) as f32 * k) as u32).min(0xFF) << shift;
    (c & 0xFF00_0000) | ch(16) | ch(8) | ch(0)
}

#[inline(always)]
pub fn alpha(c: Rgba) -> u8 {
    (c >> 24) as u8
}

/// Where a wall column takes its colour from.
#[derive(Clone, Copy)]
pub enum WallPaint<'a> {
    Textured(&'a Texture),
    Flat(Rgba),
}

/// Read-only view over a texture bank for one frame.
#[derive(Clone, Copy)]
pub struct Sampler<'a> {
    bank: &'a TextureBank,
    cfg: &'a RenderConfig,
}

impl<'a> Sampler<'a> {
    pub fn new(bank: &'a TextureBank, cfg: &'a RenderConfig) -> Self {
        Self { bank, cfg }
    }

    /// Borrow texture `id`, reporting it once if absent.
    pub fn resolve(&self, id: TextureId) -> Option<&'a Texture> {
        match self.bank.texture(id) {
            Ok(tex) => Some(tex),
            Err(e) => {
                if self.bank.note_missing(id) {
                    warn!(id, error = %e, "missing texture, drawing fallback colour");
                }
                None
            }
        }
    }

    /// Colour of texture `id` at texel `(u, v)`, or [`FALLBACK`].
    pub fn sample(&self, id: TextureId, u: usize, v: usize) -> Rgba {
        self.resolve(id).map_or(FALLBACK, |tex| tex.texel(u, v))
    }

    /// Paint source for walls of type `code`.
    pub fn wall_paint(&self, code: Cell) -> WallPaint<'a> {
        match self.bank.wall_texture(code) {
            Some(id) => match self.resolve(id) {
                Some(tex) => WallPaint::Textured(tex),
                None => WallPaint::Flat(FALLBACK),
            },
            None => WallPaint::Flat(wall_palette(code)),
        }
    }

    /// Brightness multiplier for a hit on `side`.
    #[inline]
    pub fn side_factor(&self, side: Side) -> f32 {
        match side {
            Side::Horizontal if self.cfg.has(RenderFlags::SIDE_SHADING) => self.cfg.side_shade,
            _ => 1.0,
        }
    }

    /// Blend `c` toward black for a billboard `distance` away.
    #[inline]
    pub fn fog(&self, c: Rgba, distance: f32) -> Rgba {
        let cfg = self.cfg;
        if !cfg.has(RenderFlags::SPRITE_FOG) || distance <= cfg.sprite_fog_start {
            return c;
        }
        let dark = (distance * cfg.sprite_fog_per_unit).min(cfg.sprite_fog_max);
        shade(c, 1.0 - (dark / 255.0).clamp(0.0, 1.0))
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
