use std::ops::Range;

use smallvec::SmallVec;

use crate::{
    renderer::{
        config::RenderConfig,
        depth::DepthBuffer,
        software::sampler::{FALLBACK, Sampler, alpha},
    },
    world::{Billboard, EyePose, Rgba, TextureId},
};

/// Column ranges of one sprite that survive the depth test.
/// Most sprites are cut by at most a couple of wall edges.
pub type VisibleSpans = SmallVec<[Range<i32>; 4]>;

/// Screen-space placement of one billboard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisSprite {
    /// Horizontal centre in pixels.
    pub center_x: f32,
    /// First covered column (may be off-screen).
    pub left: i32,
    pub top: i32,
    /// Square side in pixels, at most the screen height.
    pub size: i32,
    /// Eye distance including depth bias, clamped to epsilon.
    pub distance: f32,
    pub tex: TextureId,
}

impl VisSprite {
    /// Covered columns clipped to `0 .. width`.
    #[inline]
    pub fn columns(&self, width: usize) -> Range<i32> {
        self.left.max(0)..(self.left + self.size).min(width as i32)
    }

    /// Split the covered columns into runs that are nearer than the wall there.
    pub fn visible_spans(&self, depth: &DepthBuffer) -> VisibleSpans {
        let mut spans = VisibleSpans::new();
        let mut run: Option<i32> = None;
        let cols = self.columns(depth.width());
        for x in cols.clone() {
            let open = depth.is_visible(x as usize, self.distance);
            match (open, run) {
                (true, None) => run = Some(x),
                (false, Some(start)) => {
                    spans.push(start..x);
                    run = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run {
            spans.push(start..cols.end);
        }
        spans
    }
}

/// Place `billboard` on screen, or `None` when it is culled.
///
/// Culled when farther than max depth or outside the FoV plus margin.
/// A billboard closer than epsilon is clamped, not culled.
pub fn project_billboard(
    eye: &EyePose,
    billboard: &Billboard,
    screen_w: usize,
    screen_h: usize,
    cfg: &RenderConfig,
) -> Option<VisSprite> {
    let distance = billboard.distance_from(eye.pos);
    if !(distance <= cfg.max_depth) {
        return None;
    }
    let distance = distance.max(cfg.epsilon);

    let rel = eye.relative_angle(billboard.pos);
    if rel.abs() > eye.fov * 0.5 + cfg.cull_margin {
        return None;
    }

    let w = screen_w as f32;
    let h = screen_h as f32;
    let center_x = (rel / eye.fov + 0.5) * w;
    let size = (h / distance).min(h) as i32;
    let top = (screen_h as i32 - size) / 2;
    let left = (center_x - size as f32 * 0.5).floor() as i32;

    Some(VisSprite {
        center_x,
        left,
        top,
        size,
        distance,
        tex: billboard.tex,
    })
}

/// Draw the visible columns of `spr` into a row-major frame.
///
/// Returns the number of columns that passed the depth test.
pub fn draw_sprite(
    frame: &mut [Rgba],
    width: usize,
    height: usize,
    spr: &VisSprite,
    depth: &DepthBuffer,
    sampler: &Sampler,
) -> usize {
    if spr.size <= 0 {
        return 0;
    }
    let spans = spr.visible_spans(depth);
    let tex = sampler.resolve(spr.tex);

    let y0 = spr.top.max(0);
    let y1 = (spr.top + spr.size).min(height as i32);
    let size = spr.size as f32;

    let mut drawn = 0;
    for span in spans {
        for x in span {
            drawn += 1;
            let u_rel = (x - spr.left) as f32 / size;
            for y in y0..y1 {
                let v_rel = (y - spr.top) as f32 / size;
                let c = match tex {
                    Some(t) => {
                        let (tw, th) = (t.width(), t.height());
                        let u = ((u_rel * tw as f32) as usize).min(tw - 1);
                        let v = ((v_rel * th as f32) as usize).min(th - 1);
                        t.texel(u, v)
                    }
                    None => FALLBACK,
                };
                // fully transparent texels leave the background alone
                if alpha(c) == 0 {
                    continue;
                }
                frame[y as usize * width + x as usize] = sampler.fog(c, spr.distance);
            }
        }
    }
    drawn
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use std::f32::consts::FRAC_PI_3;

    fn eye() -> EyePose {
        EyePose::new(vec2(5.0, 5.0), 0.0, FRAC_PI_3)
    }

    #[test]
    fn on_axis_sprite_is_centred() {
        let cfg = RenderConfig::default();
        let b = Billboard::new(vec2(8.0, 5.0), 0);
        let s = project_billboard(&eye(), &b, 320, 200, &cfg).unwrap();
        assert_eq!(s.center_x, 160.0);
        assert!((s.distance - 3.0).abs() < 1e-6);
        assert_eq!(s.size, 66);
        assert_eq!(s.top, 67);
        assert_eq!(s.left, 127);
    }

    #[test]
    fn max_depth_boundary() {
        let cfg = RenderConfig::default();
        let near_edge = Billboard::new(vec2(5.0 + cfg.max_depth - 0.01, 5.0), 0);
        assert!(project_billboard(&eye(), &near_edge, 320, 200, &cfg).is_some());
        let beyond = Billboard::new(vec2(5.0 + cfg.max_depth + 0.01, 5.0), 0);
        assert!(project_billboard(&eye(), &beyond, 320, 200, &cfg).is_none());
        // bias alone can push a sprite past the limit
        let biased = Billboard::new(vec2(6.0, 5.0), 0).with_bias(cfg.max_depth);
        assert!(project_billboard(&eye(), &biased, 320, 200, &cfg).is_none());
    }

    #[test]
    fn outside_fov_is_culled() {
        let cfg = RenderConfig::default();
        // behind the eye
        let b = Billboard::new(vec2(2.0, 5.0), 0);
        assert!(project_billboard(&eye(), &b, 320, 200, &cfg).is_none());
        // 35° off axis: beyond half-FoV (30°) but inside the margin
        let a = 35f32.to_radians();
        let b = Billboard::new(vec2(5.0 + 3.0 * a.cos(), 5.0 + 3.0 * a.sin()), 0);
        assert!(project_billboard(&eye(), &b, 320, 200, &cfg).is_some());
        // 50° off axis
        let a = 50f32.to_radians();
        let b = Billboard::new(vec2(5.0 + 3.0 * a.cos(), 5.0 + 3.0 * a.sin()), 0);
        assert!(project_billboard(&eye(), &b, 320, 200, &cfg).is_none());
    }

    #[test]
    fn sprite_at_eye_clamps() {
        let cfg = RenderConfig::default();
        let b = Billboard::new(vec2(5.0 + 1e-7, 5.0), 0);
        let s = project_billboard(&eye(), &b, 320, 200, &cfg).unwrap();
        assert_eq!(s.distance, cfg.epsilon);
        assert_eq!(s.size, 200);
        assert_eq!(s.top, 0);
    }

    #[test]
    fn spans_split_at_walls() {
        let spr = VisSprite {
            center_x: 5.0,
            left: 0,
            top: 0,
            size: 10,
            distance: 3.0,
            tex: 0,
        };
        let mut depth = DepthBuffer::new(8);
        depth.set(2, 2.0);
        depth.set(3, 2.5);
        depth.set(6, 1.0);
        let spans = spr.visible_spans(&depth);
        assert_eq!(spans.as_slice(), &[0..2, 4..6, 7..8]);
    }

    #[test]
    fn fully_hidden_sprite_draws_nothing() {
        let bank = crate::world::TextureBank::new();
        let cfg = RenderConfig::default();
        let sampler = Sampler::new(&bank, &cfg);

        let spr = VisSprite {
            center_x: 4.0,
            left: 0,
            top: 0,
            size: 8,
            distance: 3.0,
            tex: 0,
        };
        let mut depth = DepthBuffer::new(8);
        depth.as_mut_slice().fill(2.0);
        let mut frame = vec![0u32; 64];
        assert_eq!(draw_sprite(&mut frame, 8, 8, &spr, &depth, &sampler), 0);
        assert!(frame.iter().all(|&p| p == 0));

        depth.as_mut_slice().fill(f32::INFINITY);
        assert_eq!(draw_sprite(&mut frame, 8, 8, &spr, &depth, &sampler), 8);
        assert!(frame.iter().all(|&p| p == FALLBACK));
    }
}
