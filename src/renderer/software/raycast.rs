//! Per-column ray caster (grid DDA).
//!
//! Every column is a pure function of the eye pose, the grid and the
//! config, so columns can be cast in any order or on any thread.

use glam::{IVec2, Vec2, ivec2, vec2};

use crate::{
    renderer::config::{RenderConfig, RenderFlags},
    world::{Cell, EyePose, GridMap, wrap_angle},
};

/// Which kind of grid line the ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// `x = const` line (`side == 0`).
    Vertical,
    /// `y = const` line (`side == 1`); drawn darker.
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance used for projection and depth testing. Along the forward
    /// axis when fisheye correction is on, along the ray otherwise.
    pub distance: f32,
    /// Distance travelled along the ray itself.
    pub ray_len: f32,
    pub wall: Cell,
    pub side: Side,
    /// Grid cell that stopped the ray.
    pub cell: IVec2,
}

/// Outcome of one column's cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayResult {
    /// Ray heading in `[0, 2π)`.
    pub angle: f32,
    /// `None` when nothing solid lies within max render depth.
    pub hit: Option<RayHit>,
}

/// Cast the ray for screen column `column` out of `width`.
pub fn cast_column(
    column: usize,
    width: usize,
    eye: &EyePose,
    grid: &GridMap,
    cfg: &RenderConfig,
) -> RayResult {
    let angle = eye.column_angle(column, width);
    let hit = cast_ray(eye.pos, angle, grid, cfg).map(|mut hit| {
        if cfg.has(RenderFlags::FISHEYE_CORRECTION) {
            hit.distance = hit.ray_len * (angle - eye.angle).cos();
        }
        hit
    });
    RayResult { angle, hit }
}

/// Walk the grid from `origin` toward `angle` one cell boundary at a time.
///
/// Returns the first wall cell entered, with `distance == ray_len`.
pub fn cast_ray(origin: Vec2, angle: f32, grid: &GridMap, cfg: &RenderConfig) -> Option<RayHit> {
    let angle = wrap_angle(angle);
    let (sin, cos) = angle.sin_cos();
    let eps = cfg.epsilon;

    // near-zero components become ±eps so the step sizes stay finite
    let safe = |c: f32| if c.abs() < eps { eps.copysign(c) } else { c };
    let dir = vec2(safe(cos), safe(sin));

    let delta = vec2(dir.x.recip().abs(), dir.y.recip().abs());
    let step = ivec2(
        if dir.x >= 0.0 { 1 } else { -1 },
        if dir.y >= 0.0 { 1 } else { -1 },
    );

    let mut cell = origin.floor().as_ivec2();
    let mut side_dist = vec2(
        if step.x < 0 {
            (origin.x - cell.x as f32) * delta.x
        } else {
            (cell.x as f32 + 1.0 - origin.x) * delta.x
        },
        if step.y < 0 {
            (origin.y - cell.y as f32) * delta.y
        } else {
            (cell.y as f32 + 1.0 - origin.y) * delta.y
        },
    );

    loop {
        // distance to the boundary we are about to cross
        let (crossed, side) = if side_dist.x < side_dist.y {
            let d = side_dist.x;
            side_dist.x += delta.x;
            cell.x += step.x;
            (d, Side::Vertical)
        } else {
            let d = side_dist.y;
            side_dist.y += delta.y;
            cell.y += step.y;
            (d, Side::Horizontal)
        };

        // also stops NaN origins: they never compare below max_depth
        if !(crossed <= cfg.max_depth) {
            return None;
        }

        let wall = grid.cell_at(cell.x, cell.y);
        if !wall.is_wall() {
            continue;
        }

        let ray_len = match side {
            Side::Vertical => {
                (cell.x as f32 - origin.x + (1 - step.x) as f32 * 0.5) / dir.x
            }
            Side::Horizontal => {
                (cell.y as f32 - origin.y + (1 - step.y) as f32 * 0.5) / dir.y
            }
        };
        let ray_len = ray_len.max(0.0);

        return Some(RayHit {
            distance: ray_len,
            ray_len,
            wall,
            side,
            cell,
        });
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI};

    fn room() -> GridMap {
        GridMap::bordered(10, 10, Cell(1)).unwrap()
    }

    #[test]
    fn straight_ahead_hits_east_wall() {
        let cfg = RenderConfig::default();
        let hit = cast_ray(vec2(5.0, 5.0), 0.0, &room(), &cfg).unwrap();
        // east wall cell x = 9, face at x = 9
        assert!((hit.ray_len - 4.0).abs() < 1e-5);
        assert_eq!(hit.side, Side::Vertical);
        assert_eq!(hit.cell, ivec2(9, 5));
        assert_eq!(hit.wall, Cell(1));
    }

    #[test]
    fn axis_aligned_rays_terminate() {
        let cfg = RenderConfig::default();
        // faces at x = 9 / y = 9 (east, south) and x = 1 / y = 1 (west, north)
        for (a, want) in [(0.0, 4.5), (FRAC_PI_2, 4.5), (PI, 3.5), (3.0 * FRAC_PI_2, 3.5)] {
            let hit = cast_ray(vec2(4.5, 4.5), a, &room(), &cfg).unwrap();
            assert!((hit.ray_len - want).abs() < 1e-3, "angle {a}: {hit:?}");
        }
        let south = cast_ray(vec2(4.5, 4.5), FRAC_PI_2, &room(), &cfg).unwrap();
        assert_eq!(south.side, Side::Horizontal);
    }

    #[test]
    fn perpendicular_distance_is_constant_across_columns() {
        let cfg = RenderConfig::default();
        let eye = EyePose::new(vec2(5.0, 5.0), 0.0, FRAC_PI_3);
        let grid = room();
        let width = 64;
        for col in 0..width {
            let r = cast_column(col, width, &eye, &grid, &cfg);
            let hit = r.hit.unwrap();
            // every ray in a 60° cone from the centre reaches x = 9 first
            assert_eq!(hit.side, Side::Vertical, "column {col}");
            assert!((hit.distance - 4.0).abs() < 1e-4, "column {col}: {hit:?}");
            let offset = r.angle - eye.angle;
            let offset = if offset > PI { offset - 2.0 * PI } else { offset };
            assert!((hit.ray_len - 4.0 / offset.cos()).abs() < 1e-3);
        }
    }

    #[test]
    fn without_correction_distance_is_ray_length() {
        let cfg = RenderConfig::default().with_flag(RenderFlags::FISHEYE_CORRECTION, false);
        let eye = EyePose::new(vec2(5.0, 5.0), 0.0, FRAC_PI_3);
        let hit = cast_column(0, 64, &eye, &room(), &cfg).hit.unwrap();
        assert_eq!(hit.distance, hit.ray_len);
        assert!(hit.distance > 4.0);
    }

    #[test]
    fn max_depth_means_no_hit() {
        let cfg = RenderConfig {
            max_depth: 3.0,
            ..Default::default()
        };
        assert!(cast_ray(vec2(5.0, 5.0), 0.0, &room(), &cfg).is_none());
        let cfg = RenderConfig {
            max_depth: 4.5,
            ..Default::default()
        };
        assert!(cast_ray(vec2(5.0, 5.0), 0.0, &room(), &cfg).is_some());
    }

    #[test]
    fn ray_never_escapes_open_map() {
        // no walls at all: the outside of the grid is solid
        let grid = GridMap::from_rows([[0u8; 4]; 4]).unwrap();
        let cfg = RenderConfig::default();
        let hit = cast_ray(vec2(2.0, 2.0), 0.0, &grid, &cfg).unwrap();
        assert_eq!(hit.cell, ivec2(4, 2));
        assert_eq!(hit.wall, Cell::SOLID);
        assert!((hit.ray_len - 2.0).abs() < 1e-5);
    }

    #[test]
    fn nan_origin_gives_up() {
        let cfg = RenderConfig::default();
        assert!(cast_ray(vec2(f32::NAN, 1.0), 0.3, &room(), &cfg).is_none());
    }

    proptest! {
        #[test]
        fn dda_halts_on_random_grids(
            cells in prop::collection::vec(0u8..3, 64),
            ox in 0.0f32..8.0,
            oy in 0.0f32..8.0,
            angle in -10.0f32..10.0,
        ) {
            let grid = GridMap::from_rows(cells.chunks(8)).unwrap();
            let cfg = RenderConfig::default();
            if let Some(hit) = cast_ray(vec2(ox, oy), angle, &grid, &cfg) {
                prop_assert!(hit.ray_len >= 0.0);
                prop_assert!(hit.ray_len <= cfg.max_depth + 1.0);
                prop_assert!(hit.wall.is_wall());
            }
        }
    }
}
