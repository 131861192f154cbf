use thiserror::Error;
use tracing::info;

use crate::{
    renderer::{ConfigError, FrameBuffer, RenderConfig, Renderer, RendererExt, Rgba, Software},
    world::{Billboard, EyePose, GridError, GridMap, TextureBank, TextureError},
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("invalid resolution {w}x{h}")]
    Resolution { w: usize, h: usize },
}

/// Owns the map, the textures and a renderer; draws one frame per call.
pub struct Engine<R: Renderer> {
    pub renderer: R,
    pub grid: GridMap,
    pub texture_bank: TextureBank,
    width: usize,
    height: usize,
}

impl<R: Renderer> Engine<R> {
    pub fn new(
        renderer: R,
        grid: GridMap,
        texture_bank: TextureBank,
        w: usize,
        h: usize,
    ) -> Result<Self, EngineError> {
        if w == 0 || h == 0 {
            return Err(EngineError::Resolution { w, h });
        }
        info!(
            map_w = grid.width(),
            map_h = grid.height(),
            textures = texture_bank.len(),
            w,
            h,
            "engine ready"
        );
        Ok(Self {
            renderer,
            grid,
            texture_bank,
            width: w,
            height: h,
        })
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, w: usize, h: usize) -> Result<(), EngineError> {
        if w == 0 || h == 0 {
            return Err(EngineError::Resolution { w, h });
        }
        self.width = w;
        self.height = h;
        Ok(())
    }

    /// Draw the scene seen from `eye` and loan the pixels to `submit`.
    pub fn render_frame(
        &mut self,
        eye: &EyePose,
        billboards: &[Billboard],
        submit: impl FnOnce(&[Rgba], usize, usize),
    ) {
        self.renderer.draw_frame(
            self.width,
            self.height,
            eye,
            &self.grid,
            billboards,
            &self.texture_bank,
            submit,
        );
    }
}

/// Render one frame with default settings.
///
/// Pure with respect to its inputs: the same arguments always give the
/// same pixels.
pub fn render(
    eye: &EyePose,
    grid: &GridMap,
    billboards: &[Billboard],
    bank: &TextureBank,
    w: usize,
    h: usize,
) -> FrameBuffer {
    let mut sw = Software::default();
    draw_into(&mut sw, eye, grid, billboards, bank, w, h)
}

/// [`render`] with explicit tunables.
pub fn render_with(
    cfg: &RenderConfig,
    eye: &EyePose,
    grid: &GridMap,
    billboards: &[Billboard],
    bank: &TextureBank,
    w: usize,
    h: usize,
) -> Result<FrameBuffer, EngineError> {
    let mut sw = Software::new(*cfg)?;
    Ok(draw_into(&mut sw, eye, grid, billboards, bank, w, h))
}

fn draw_into(
    sw: &mut Software,
    eye: &EyePose,
    grid: &GridMap,
    billboards: &[Billboard],
    bank: &TextureBank,
    w: usize,
    h: usize,
) -> FrameBuffer {
    let mut out = FrameBuffer {
        width: w,
        height: h,
        pixels: Vec::new(),
    };
    sw.draw_frame(w, h, eye, grid, billboards, bank, |fb, w, h| {
        out = FrameBuffer::from_slice(fb, w, h)
    });
    out
}

/*──────────────────────────────── Tests ───────────────────────────────*/
