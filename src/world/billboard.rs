use glam::Vec2;

use crate::world::texture::TextureId;

/// A camera-facing textured square standing on the floor.
///
/// Enemies, pickups and decorations all reduce to this; whatever made the
/// entry (AI, item logic) stays outside the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Billboard {
    pub pos: Vec2,
    pub tex: TextureId,
    /// Added to the eye distance; breaks draw-order ties between
    /// billboards at the same spot.
    pub depth_bias: f32,
}

impl Billboard {
    pub fn new(pos: Vec2, tex: TextureId) -> Self {
        Self {
            pos,
            tex,
            depth_bias: 0.0,
        }
    }

    pub fn with_bias(mut self, depth_bias: f32) -> Self {
        self.depth_bias = depth_bias;
        self
    }

    /// Eye distance including bias.
    #[inline]
    pub fn distance_from(&self, eye: Vec2) -> f32 {
        self.pos.distance(eye) + self.depth_bias
    }
}
