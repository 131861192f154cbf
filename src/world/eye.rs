use glam::{Vec2, vec2};
use std::f32::consts::{PI, TAU};

/// Frozen view-point for one frame.
///
/// * `pos` is in map units; cell `(i, j)` covers `[i, i+1) × [j, j+1)`.
/// * `angle` is the heading in radians (0 = +X, counter-clockwise toward +Y).
/// * `fov` is the horizontal field of view in radians.
///
/// The renderer only ever reads a copy of this value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyePose {
    pub pos: Vec2,
    pub angle: f32,
    pub fov: f32,
}

impl EyePose {
    pub fn new(pos: Vec2, angle: f32, fov: f32) -> Self {
        Self { pos, angle, fov }
    }

    /// Ray heading for screen column `column` of `width`, wrapped into `[0, 2π)`.
    ///
    /// ```text
    /// angle + (column / width - 0.5) * fov
    /// ```
    #[inline]
    pub fn column_angle(&self, column: usize, width: usize) -> f32 {
        let t = column as f32 / width.max(1) as f32;
        wrap_angle(self.angle + (t - 0.5) * self.fov)
    }

    /// Unit vector pointing where the eye looks.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.angle.sin_cos();
        vec2(c, s)
    }

    /// Signed heading of `p` relative to the forward axis, in `[-π, π]`.
    #[inline]
    pub fn relative_angle(&self, p: Vec2) -> f32 {
        let d = p - self.pos;
        wrap_signed(d.y.atan2(d.x) - self.angle)
    }
}

/// Wrap any finite angle into `[0, 2π)`.
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    let w = a.rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs
    if w >= TAU { 0.0 } else { w }
}

/// Wrap any finite angle into `[-π, π]`.
#[inline]
pub fn wrap_signed(a: f32) -> f32 {
    let w = wrap_angle(a);
    if w > PI { w - TAU } else { w }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_3;

    #[test]
    fn centre_column_looks_forward() {
        let eye = EyePose::new(Vec2::ZERO, 1.0, FRAC_PI_3);
        assert!((eye.column_angle(320, 640) - 1.0).abs() < 1e-6);
        // first column is half a FoV to the right (clockwise)
        assert!((eye.column_angle(0, 640) - (1.0 - FRAC_PI_3 / 2.0)).abs() < 1e-6);
    }

    #[test]
    fn relative_angle_wraps() {
        let eye = EyePose::new(Vec2::ZERO, 0.1, FRAC_PI_3);
        // point slightly below +X axis: angle -0.1 - 0.1 = -0.2
        let p = vec2(1.0, -(0.1f32).tan());
        assert!((eye.relative_angle(p) + 0.2).abs() < 1e-5);

        let eye = EyePose::new(Vec2::ZERO, 6.2, FRAC_PI_3);
        let p = vec2(1.0, 0.0);
        assert!((eye.relative_angle(p) - (TAU - 6.2)).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn wrap_angle_range(a in -1000.0f32..1000.0) {
            let w = wrap_angle(a);
            prop_assert!((0.0..TAU).contains(&w));
            let s = wrap_signed(a);
            prop_assert!((-PI..=PI).contains(&s));
        }
    }
}
