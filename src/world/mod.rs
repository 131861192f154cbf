mod billboard;
mod eye;
mod grid;
mod texture;

pub use billboard::Billboard;

pub use eye::{EyePose, wrap_angle, wrap_signed};

pub use grid::{Cell, GridError, GridMap};

pub use texture::{Rgba, Texture, TextureBank, TextureError, TextureId};
