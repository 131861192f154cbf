use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    renderer::{
        Renderer, Rgba,
        config::{ConfigError, RenderConfig, RenderFlags},
        depth::DepthBuffer,
        software::{
            raycast::{RayResult, cast_column},
            sampler::{Sampler, WallPaint, shade},
            sprites::{draw_sprite, project_billboard},
            walls::{WallStrip, project_wall},
        },
    },
    world::{Billboard, EyePose, GridMap, TextureBank},
};

/// Where the composer is inside the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FramePhase {
    #[default]
    Idle,
    /// Background cleared, waiting for the wall pass.
    Cast,
    /// Walls and depth are final; billboards may be drawn.
    Sprites,
    /// Frame handed to the caller.
    Ready,
}

/// Counters for the last frame, for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub columns_hit: usize,
    pub sprites_drawn: usize,
    pub sprites_culled: usize,
}

/// Ray-casting column renderer.
#[derive(Default)]
pub struct Software {
    pub scratch: Vec<Rgba>,
    pub depth: DepthBuffer,
    pub config: RenderConfig,

    pub width: usize,
    pub height: usize,

    rays: Vec<RayResult>,
    phase: FramePhase,
    stats: FrameStats,
}

/// Everything needed to colour one wall column.
#[derive(Clone, Copy)]
struct ColumnPaint<'a> {
    strip: WallStrip,
    paint: WallPaint<'a>,
    tex_x: usize,
    shade: f32,
}

impl ColumnPaint<'_> {
    #[inline]
    fn color_at(&self, y: i32) -> Rgba {
        let c = match self.paint {
            WallPaint::Textured(tex) => tex.texel(self.tex_x, self.strip.tex_row(y, tex.height())),
            WallPaint::Flat(c) => c,
        };
        if self.shade < 1.0 { shade(c, self.shade) } else { c }
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.depth.reset(w);
        self.rays.clear();
        self.stats = FrameStats::default();

        /* ceiling above the horizon, floor below */
        let horizon = (h / 2) * w;
        self.scratch[..horizon].fill(self.config.ceiling);
        self.scratch[horizon..].fill(self.config.floor);

        self.set_phase(FramePhase::Cast);
    }

    fn draw_walls(&mut self, eye: &EyePose, grid: &GridMap, bank: &TextureBank) {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 {
            self.set_phase(FramePhase::Sprites);
            return;
        }
        let cfg = self.config;
        let parallel = cfg.has(RenderFlags::PARALLEL);

        /* 1. cast every column ------------------------------------------------*/
        let cast = |x: usize| cast_column(x, w, eye, grid, &cfg);
        if parallel {
            (0..w).into_par_iter().map(cast).collect_into_vec(&mut self.rays);
        } else {
            self.rays.extend((0..w).map(cast));
        }

        /* 2. depth + strip per column ----------------------------------------*/
        let sampler = Sampler::new(bank, &cfg);
        let mut paints: Vec<Option<ColumnPaint>> = Vec::with_capacity(w);
        for (x, ray) in self.rays.iter().enumerate() {
            let Some(hit) = ray.hit else {
                paints.push(None);
                continue;
            };
            self.depth.set(x, hit.distance.max(cfg.epsilon));
            self.stats.columns_hit += 1;

            let paint = project_wall(ray, eye.pos, h, cfg.epsilon).map(|strip| {
                let paint = sampler.wall_paint(hit.wall);
                let tex_x = match paint {
                    WallPaint::Textured(tex) => strip.tex_column(tex.width()),
                    WallPaint::Flat(_) => 0,
                };
                ColumnPaint {
                    strip,
                    paint,
                    tex_x,
                    shade: sampler.side_factor(strip.side),
                }
            });
            paints.push(paint);
        }

        /* 3. fill rows; every row owns its own slice of the frame ------------*/
        let fill_row = |(y, row): (usize, &mut [Rgba])| {
            let y = y as i32;
            for (px, col) in row.iter_mut().zip(&paints) {
                if let Some(col) = col {
                    if col.strip.contains_row(y) {
                        *px = col.color_at(y);
                    }
                }
            }
        };
        if parallel {
            self.scratch.par_chunks_mut(w).enumerate().for_each(&fill_row);
        } else {
            self.scratch.chunks_mut(w).enumerate().for_each(&fill_row);
        }

        self.set_phase(FramePhase::Sprites);
    }

    fn draw_billboards(&mut self, eye: &EyePose, billboards: &[Billboard], bank: &TextureBank) {
        if self.phase != FramePhase::Sprites {
            trace!(phase = ?self.phase, "billboards drawn before the wall pass");
        }
        let cfg = self.config;
        let sampler = Sampler::new(bank, &cfg);

        // far-to-near painter’s algorithm so we overdraw correctly
        let mut order: Vec<(f32, &Billboard)> = billboards
            .iter()
            .map(|b| (b.distance_from(eye.pos), b))
            .collect();
        order.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (_, billboard) in order {
            match project_billboard(eye, billboard, self.width, self.height, &cfg) {
                Some(spr) => {
                    let cols = draw_sprite(
                        &mut self.scratch,
                        self.width,
                        self.height,
                        &spr,
                        &self.depth,
                        &sampler,
                    );
                    if cols > 0 {
                        self.stats.sprites_drawn += 1;
                    }
                }
                None => self.stats.sprites_culled += 1,
            }
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.set_phase(FramePhase::Ready);
        debug!(
            columns_hit = self.stats.columns_hit,
            sprites_drawn = self.stats.sprites_drawn,
            sprites_culled = self.stats.sprites_culled,
            "frame ready"
        );
        submit(&self.scratch, self.width, self.height);
    }
}

impl Software {
    /// Renderer with validated tunables.
    pub fn new(config: RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Ray results of the last wall pass, one per column.
    pub fn rays(&self) -> &[RayResult] {
        &self.rays
    }

    fn set_phase(&mut self, next: FramePhase) {
        trace!(from = ?self.phase, to = ?next, "frame phase");
        self.phase = next;
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        renderer::RendererExt,
        world::{Cell, Texture},
    };
    use glam::vec2;
    use std::f32::consts::FRAC_PI_3;

    const RED: Rgba = 0xFF_C80000;

    fn room() -> GridMap {
        GridMap::bordered(10, 10, Cell(1)).unwrap()
    }

    fn frame(
        sw: &mut Software,
        eye: &EyePose,
        billboards: &[Billboard],
        bank: &TextureBank,
    ) -> Vec<Rgba> {
        let mut out = Vec::new();
        sw.draw_frame(64, 48, eye, &room(), billboards, bank, |fb, _, _| {
            out = fb.to_vec()
        });
        out
    }

    #[test]
    fn phases_advance_in_order() {
        let mut sw = Software::default();
        assert_eq!(sw.phase(), FramePhase::Idle);
        sw.begin_frame(8, 8);
        assert_eq!(sw.phase(), FramePhase::Cast);
        let eye = EyePose::new(vec2(5.0, 5.0), 0.0, FRAC_PI_3);
        sw.draw_walls(&eye, &room(), &TextureBank::new());
        assert_eq!(sw.phase(), FramePhase::Sprites);
        assert_eq!(sw.rays().len(), 8);
        sw.draw_billboards(&eye, &[], &TextureBank::new());
        sw.end_frame(|fb, w, h| assert_eq!(fb.len(), w * h));
        assert_eq!(sw.phase(), FramePhase::Ready);
    }

    #[test]
    fn walls_fill_centre_and_background_elsewhere() {
        let mut sw = Software::default();
        let eye = EyePose::new(vec2(5.0, 5.0), 0.0, FRAC_PI_3);
        let fb = frame(&mut sw, &eye, &[], &TextureBank::new());
        // wall at distance 4 → 12 px tall strip at rows 18..30
        assert_eq!(fb[32], sw.config.ceiling);
        assert_eq!(fb[47 * 64 + 32], sw.config.floor);
        assert_eq!(fb[24 * 64 + 32], RED);
        assert_eq!(sw.stats().columns_hit, 64);
        assert!(sw.depth.as_slice().iter().all(|d| (d - 4.0).abs() < 1e-3));
    }

    #[test]
    fn horizontal_faces_are_darker() {
        let mut sw = Software::default();
        // looking +Y at the south wall: horizontal grid line
        let eye = EyePose::new(vec2(5.0, 5.0), std::f32::consts::FRAC_PI_2, FRAC_PI_3);
        let fb = frame(&mut sw, &eye, &[], &TextureBank::new());
        assert_eq!(fb[24 * 64 + 32], shade(RED, 0.5));
    }

    #[test]
    fn textured_wall_samples_bank() {
        let mut bank = TextureBank::new();
        let id = bank.insert("BLUE", Texture::solid("BLUE", 4, 4, 0xFF_0000FF)).unwrap();
        bank.bind_wall(Cell(1), id);
        let mut sw = Software::default();
        let eye = EyePose::new(vec2(5.0, 5.0), 0.0, FRAC_PI_3);
        let fb = frame(&mut sw, &eye, &[], &bank);
        assert!(fb.iter().any(|&px| px == 0xFF_0000FF));
        assert!(!fb.iter().any(|&px| px == RED));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let mut bank = TextureBank::new();
        let id = bank.insert("CHECK", Texture::default()).unwrap();
        bank.bind_wall(Cell(1), id);
        let eye = EyePose::new(vec2(3.3, 6.1), 0.7, FRAC_PI_3);
        let sprites = [Billboard::new(vec2(6.0, 7.5), id)];

        let mut par = Software::default();
        let mut seq = Software::new(
            RenderConfig::default().with_flag(RenderFlags::PARALLEL, false),
        )
        .unwrap();
        assert_eq!(
            frame(&mut par, &eye, &sprites, &bank),
            frame(&mut seq, &eye, &sprites, &bank)
        );
    }

    #[test]
    fn zero_sized_frame_is_harmless() {
        let mut sw = Software::default();
        let eye = EyePose::new(vec2(5.0, 5.0), 0.0, FRAC_PI_3);
        sw.draw_frame(0, 0, &eye, &room(), &[], &TextureBank::new(), |fb, w, h| {
            assert!(fb.is_empty());
            assert_eq!((w, h), (0, 0));
        });
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = RenderConfig {
            max_depth: -1.0,
            ..Default::default()
        };
        assert!(Software::new(cfg).is_err());
    }
}
