//! Rendering abstraction layer.
//!
//! *The rest of the game never touches a pixel buffer directly.*
//! Each frame it hands a frozen [`EyePose`], the [`GridMap`] and a list of
//! [`Billboard`]s to a type that implements [`Renderer`], and gets the
//! finished pixels back through a closure.
//!
//! * The default back-end is [`Software`], a CPU column renderer.
//! * A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

use crate::world::{Billboard, EyePose, GridMap, TextureBank};

pub use crate::world::Rgba;

pub mod config;
pub mod depth;
pub mod software;

pub use config::{ConfigError, RenderConfig, RenderFlags};
pub use depth::DepthBuffer;
pub use software::Software;

/// A finished frame, row-major, `width * height` pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgba>,
}

impl FrameBuffer {
    pub fn from_slice(pixels: &[Rgba], width: usize, height: usize) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels: pixels.to_vec(),
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    /// Top-to-bottom pixels of column `x`.
    pub fn column(&self, x: usize) -> impl Iterator<Item = Rgba> + '_ {
        (0..self.height).map(move |y| self.pixel(x, y))
    }
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// Calls must come in frame order: `begin_frame`, `draw_walls`,
/// `draw_billboards`, `end_frame`. The billboard pass reads the depth
/// written by the wall pass.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Cast every column and draw the wall strips.
    fn draw_walls(&mut self, eye: &EyePose, grid: &GridMap, bank: &TextureBank);

    /// Depth-sort, project and draw billboards over the walls.
    fn draw_billboards(&mut self, eye: &EyePose, billboards: &[Billboard], bank: &TextureBank);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    #[allow(clippy::too_many_arguments)]
    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        eye: &EyePose,
        grid: &GridMap,
        billboards: &[Billboard],
        bank: &TextureBank,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_walls(eye, grid, bank);
        self.draw_billboards(eye, billboards, bank);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
