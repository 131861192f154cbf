//! Grid ray-casting renderer.
//!
//! A 2-D tile map seen from an eye point is drawn as a first-person view:
//! one ray per screen column finds the nearest wall, walls become vertical
//! textured strips, and billboards are depth-tested against the walls.

pub mod engine;
pub mod renderer;
pub mod world;

pub use engine::{Engine, EngineError, render, render_with};
pub use renderer::{FrameBuffer, RenderConfig, RenderFlags, Renderer, RendererExt, Software};
pub use world::{Billboard, Cell, EyePose, GridMap, Rgba, Texture, TextureBank, TextureId};
