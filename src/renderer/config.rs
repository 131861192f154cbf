//! Renderer tunables.
//!
//! Everything the column and sprite passes read besides the eye pose and
//! the scene lives here, so a caller can tweak the look without touching
//! the passes themselves.

use bitflags::bitflags;
use std::f32::consts::{FRAC_PI_3, PI};

use crate::world::Rgba;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RenderFlags: u8 {
        /// Project ray length onto the forward axis (keep this on).
        const FISHEYE_CORRECTION = 0x01;
        /// Darken hits on horizontal grid lines.
        const SIDE_SHADING       = 0x02;
        /// Fade distant billboards toward black.
        const SPRITE_FOG         = 0x04;
        /// Spread the wall pass over the rayon pool.
        const PARALLEL           = 0x08;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("field of view {0} rad must lie in (0, π)")]
    Fov(f32),

    #[error("max render depth {0} must be finite and positive")]
    MaxDepth(f32),

    #[error("epsilon {0} must be finite and positive")]
    Epsilon(f32),

    #[error("FOV cull margin {0} must be finite and non-negative")]
    CullMargin(f32),

    #[error("side shade factor {0} must lie in [0, 1]")]
    Shade(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// Horizontal FoV (radians) for callers that build an
    /// [`EyePose`](crate::world::EyePose) from the config.
    pub fov: f32,
    /// DDA gives up and sprites are culled past this many map units.
    pub max_depth: f32,
    /// Stand-in for zero direction components and zero distances.
    pub epsilon: f32,
    /// Extra half-angle (radians) a sprite may sit outside the FoV before it is culled.
    pub cull_margin: f32,
    /// Channel multiplier for hits on horizontal grid lines.
    pub side_shade: f32,

    pub ceiling: Rgba,
    pub floor: Rgba,

    pub sprite_fog_start: f32,
    pub sprite_fog_per_unit: f32,
    pub sprite_fog_max: f32,

    pub flags: RenderFlags,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov: FRAC_PI_3,
            max_depth: 20.0,
            epsilon: 1e-4,
            cull_margin: 0.2,
            side_shade: 0.5,
            ceiling: 0xFF_000064,
            floor: 0xFF_323232,
            sprite_fog_start: 5.0,
            sprite_fog_per_unit: 10.0,
            sprite_fog_max: 100.0,
            flags: RenderFlags::default(),
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov > 0.0 && self.fov < PI) {
            return Err(ConfigError::Fov(self.fov));
        }
        if !(self.max_depth.is_finite() && self.max_depth > 0.0) {
            return Err(ConfigError::MaxDepth(self.max_depth));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ConfigError::Epsilon(self.epsilon));
        }
        if !(self.cull_margin.is_finite() && self.cull_margin >= 0.0) {
            return Err(ConfigError::CullMargin(self.cull_margin));
        }
        if !(0.0..=1.0).contains(&self.side_shade) {
            return Err(ConfigError::Shade(self.side_shade));
        }
        Ok(())
    }

    #[inline(always)]
    pub fn has(&self, flag: RenderFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Builder-style flag toggle.
    pub fn with_flag(mut self, flag: RenderFlags, on: bool) -> Self {
        self.flags.set(flag, on);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = RenderConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert!(cfg.has(RenderFlags::FISHEYE_CORRECTION));
        assert!(cfg.has(RenderFlags::PARALLEL));
    }

    #[test]
    fn rejects_bad_values() {
        let bad_fov = RenderConfig {
            fov: PI,
            ..Default::default()
        };
        assert_eq!(bad_fov.validate(), Err(ConfigError::Fov(PI)));

        let bad_depth = RenderConfig {
            max_depth: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(bad_depth.validate(), Err(ConfigError::MaxDepth(_))));

        let bad_shade = RenderConfig {
            side_shade: 1.5,
            ..Default::default()
        };
        assert_eq!(bad_shade.validate(), Err(ConfigError::Shade(1.5)));
    }

    #[test]
    fn flag_toggle() {
        let cfg = RenderConfig::default().with_flag(RenderFlags::PARALLEL, false);
        assert!(!cfg.has(RenderFlags::PARALLEL));
        assert!(cfg.has(RenderFlags::SIDE_SHADING));
    }
}
