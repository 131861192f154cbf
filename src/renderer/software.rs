//! ---------------------------------------------------------------------------
//! Classic software (CPU) ray-casting renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * One DDA ray per screen column; the per-column wall distance doubles
//!   as the depth buffer that clips billboards.
//! * The wall pass fans out over rayon; the billboard pass runs
//!   far-to-near on the calling thread.
//! ---------------------------------------------------------------------------

pub mod raycast;
pub mod renderer;
pub mod sampler;
pub mod sprites;
pub mod walls;

pub use raycast::{RayHit, RayResult, Side, cast_column, cast_ray};
pub use renderer::{FramePhase, FrameStats, Software};
pub use sampler::{FALLBACK, Sampler, WallPaint};
pub use sprites::{VisSprite, project_billboard};
pub use walls::{WallStrip, project_wall};
