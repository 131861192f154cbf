use glam::Vec2;

use crate::renderer::software::raycast::{RayHit, RayResult, Side};

/// One vertical wall slice in screen space.
///
/// Rows `top .. bottom` (exclusive) belong to the wall; everything above
/// is ceiling, everything below is floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallStrip {
    pub top: i32,
    pub bottom: i32,
    /// Visible height in pixels, at most the screen height.
    pub height: i32,
    /// Unclamped projected height; larger than `height` for walls closer
    /// than one map unit.
    pub full_height: f32,
    /// The projected wall reached the screen height and was cut to fit.
    pub clamped: bool,
    /// Hit position along the wall face, `[0, 1)`.
    pub wall_x: f32,
    /// Texture column must be flipped so both faces of a wall read the same way.
    pub mirror: bool,
    pub side: Side,
}

impl WallStrip {
    #[inline]
    pub fn contains_row(&self, y: i32) -> bool {
        y >= self.top && y < self.bottom
    }

    /// Texture column for a texture `tex_w` texels wide.
    #[inline]
    pub fn tex_column(&self, tex_w: usize) -> usize {
        let tx = ((self.wall_x * tex_w as f32) as usize).min(tex_w.saturating_sub(1));
        if self.mirror { tex_w - tx - 1 } else { tx }
    }

    /// Texture row for screen row `y` and a texture `tex_h` texels tall.
    ///
    /// A strip clamped to the screen shows only the centred part of the
    /// texture that the full wall would cover.
    #[inline]
    pub fn tex_row(&self, y: i32, tex_h: usize) -> usize {
        let y_in = (y - self.top).max(0) as f32;
        let v = if self.clamped {
            let skipped = (self.full_height - self.height as f32) * 0.5;
            ((y_in + skipped) * tex_h as f32 / self.full_height) as usize
        } else {
            (y_in * tex_h as f32 / self.height.max(1) as f32) as usize
        };
        v.min(tex_h.saturating_sub(1))
    }
}

/// Project a column's ray result into a wall strip; `None` for an empty column.
pub fn project_wall(
    ray: &RayResult,
    eye: Vec2,
    screen_h: usize,
    epsilon: f32,
) -> Option<WallStrip> {
    let hit = ray.hit.as_ref()?;
    let h = screen_h as f32;

    let full_height = h / hit.distance.max(epsilon);
    let clamped = full_height >= h;
    let height = full_height.min(h) as i32;
    let top = (screen_h as i32 - height) / 2;

    let (wall_x, mirror) = face_coordinate(hit, ray.angle, eye);

    Some(WallStrip {
        top,
        bottom: top + height,
        height,
        full_height,
        clamped,
        wall_x,
        mirror,
        side: hit.side,
    })
}

/// Fractional hit position along the struck face, plus whether the
/// texture must be mirrored for this ray direction.
fn face_coordinate(hit: &RayHit, angle: f32, eye: Vec2) -> (f32, bool) {
    let (sin, cos) = angle.sin_cos();
    let along = match hit.side {
        Side::Vertical => eye.y + hit.ray_len * sin,
        Side::Horizontal => eye.x + hit.ray_len * cos,
    };
    let mirror = match hit.side {
        Side::Vertical => cos > 0.0,
        Side::Horizontal => sin < 0.0,
    };
    (along - along.floor(), mirror)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
