/// Per-column distance to the nearest wall, written by the wall pass and
/// read by the sprite pass.
///
/// Allocated for one render width and overwritten every frame. Columns
/// whose ray found nothing hold `f32::INFINITY`.
#[derive(Clone, Debug, Default)]
pub struct DepthBuffer {
    depth: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: usize) -> Self {
        Self {
            depth: vec![f32::INFINITY; width],
        }
    }

    /// Resize for `width` columns and mark every column open.
    pub fn reset(&mut self, width: usize) {
        self.depth.resize(width, f32::INFINITY);
        self.depth.fill(f32::INFINITY);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.depth.len()
    }

    #[inline]
    pub fn get(&self, x: usize) -> f32 {
        self.depth.get(x).copied().unwrap_or(f32::INFINITY)
    }

    #[inline]
    pub fn set(&mut self, x: usize, d: f32) {
        if let Some(slot) = self.depth.get_mut(x) {
            *slot = d;
        }
    }

    /// True if something at `distance` in column `x` is in front of the wall there.
    #[inline]
    pub fn is_visible(&self, x: usize, distance: f32) -> bool {
        distance < self.get(x)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.depth
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.depth
    }
}
