// Format-agnostic repository of textures handed over by the asset loader.
// The renderer and world logic interact through `TextureId` only.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::world::grid::Cell;

/// Pixel format shared by textures and the frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// Row-major **ARGB** pixels. Immutable once inserted into a bank.
///
/// Both sides are always non-zero and `pixels.len() == w * h`; the only
/// ways in are [`Texture::new`], [`Texture::solid`] and `Default`.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    name: String,
    w: usize,
    h: usize,
    pixels: Vec<Rgba>,
}

impl Texture {
    /// Wrap `pixels`; fails unless `pixels.len() == w * h` and both sides are non-zero.
    pub fn new<S: Into<String>>(
        name: S,
        w: usize,
        h: usize,
        pixels: Vec<Rgba>,
    ) -> Result<Self, TextureError> {
        if w == 0 || h == 0 || pixels.len() != w * h {
            return Err(TextureError::BadDimensions {
                w,
                h,
                len: pixels.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            w,
            h,
            pixels,
        })
    }

    /// Single-colour texture.
    pub fn solid<S: Into<String>>(name: S, w: usize, h: usize, color: Rgba) -> Self {
        Self {
            name: name.into(),
            w: w.max(1),
            h: h.max(1),
            pixels: vec![color; w.max(1) * h.max(1)],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.h
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Texel at `(u, v)`; coordinates wrap around.
    #[inline(always)]
    pub fn texel(&self, u: usize, v: usize) -> Rgba {
        self.pixels[(v % self.h) * self.w + (u % self.w)]
    }
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: Rgba = 0xFF_A0A0A0;
        const DARK: Rgba = 0xFF_505050;
        let mut pix = vec![0; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
            }
        }
        Texture {
            name: "CHECKER".to_string(),
            w: 8,
            h: 8,
            pixels: pix,
        }
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    #[error("texture is {w}x{h} but carries {len} pixels")]
    BadDimensions { w: usize, h: usize, len: usize },
}

/// A format-agnostic cache of textures plus the wall-type bindings.
///
/// * Does **not** know about image files; decoding is the loader's job.
/// * Stores exactly one copy of every name.
/// * Maps grid cell codes to the texture drawn on those walls.
///
/// **Thread-safety:** lookups take `&self` and the bank is `Sync`, so
/// every render worker can read it at once.
#[derive(Default)]
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
    walls: HashMap<Cell, TextureId>,
    /* ids already reported as missing */
    reported: Mutex<HashSet<TextureId>>,
}

impl TextureBank {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of textures stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Obtain the id for a *loaded* texture by name.
    /// Returns `None` if the name is unknown.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Texture bound to wall code `code`, if any.
    pub fn wall_texture(&self, code: Cell) -> Option<TextureId> {
        self.walls.get(&code).copied()
    }

    /// Record that `id` was requested but is absent.
    /// Returns `true` only the first time a given id is noted.
    pub fn note_missing(&self, id: TextureId) -> bool {
        match self.reported.lock() {
            Ok(mut set) => set.insert(id),
            // a poisoned set only means a worker panicked mid-insert
            Err(poisoned) => poisoned.into_inner().insert(id),
        }
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Draw walls of type `code` with texture `id`.
    ///
    /// Binding an id that is not in the bank is allowed; the sampler will
    /// fall back to the missing-texture colour for it.
    pub fn bind_wall(&mut self, code: Cell, id: TextureId) {
        self.walls.insert(code, id);
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
