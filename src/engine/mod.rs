#[allow(clippy::module_inception)]
mod engine;

pub use engine::{Engine, EngineError, render, render_with};
