//! The G-buffer (§3, §4.8): MSAA-expanded frame/depth/position/normal
//! arrays, a `full_covered` bitmap, and a per-pixel lock standing in for
//! the original's OpenMP per-pixel locks (§9 redesign). Each pixel's five
//! MSAA arrays and `full_covered` flag share one `Mutex`, so acquiring the
//! lock genuinely owns the data it guards rather than only conventionally
//! serializing access to it.

use renderer_core::math::Vec3;
use renderer_core::pixel::Sample;
use std::sync::Mutex;

pub const MSAA_LEVEL: usize = 4;

/// Sample offsets from the top-left corner of each pixel (§4.4).
pub const SAMPLE_OFFSETS: [(f32, f32); MSAA_LEVEL] =
    [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];

#[derive(Clone, Copy)]
pub struct PixelCell {
    pub frame: [Vec3; MSAA_LEVEL],
    pub depth: [f32; MSAA_LEVEL],
    pub position: [Vec3; MSAA_LEVEL],
    pub normal: [Vec3; MSAA_LEVEL],
    pub full_covered: bool,
}

impl PixelCell {
    fn new(background: Vec3) -> Self {
        Self {
            frame: [background; MSAA_LEVEL],
            depth: [1.0; MSAA_LEVEL],
            position: [Vec3::ZERO; MSAA_LEVEL],
            normal: [Vec3::ZERO; MSAA_LEVEL],
            full_covered: false,
        }
    }
}

pub struct Buffer {
    pub width: u32,
    pub height: u32,
    cells: Vec<Mutex<PixelCell>>,
}

impl Buffer {
    pub fn new(width: u32, height: u32, background: Vec3) -> Self {
        let count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: (0..count).map(|_| Mutex::new(PixelCell::new(background))).collect(),
        }
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Runs `f` with exclusive access to this pixel's cell (§4.4 step
    /// 7a/7d, §5).
    pub fn with_pixel<R>(&self, x: u32, y: u32, f: impl FnOnce(&mut PixelCell) -> R) -> R {
        let idx = self.index(x, y);
        let mut guard = self.cells[idx].lock().unwrap();
        f(&mut guard)
    }

    pub fn frame_samples(&self) -> Vec<[Vec3; MSAA_LEVEL]> {
        self.cells.iter().map(|c| c.lock().unwrap().frame).collect()
    }

    pub fn depth_samples(&self) -> Vec<[f32; MSAA_LEVEL]> {
        self.cells.iter().map(|c| c.lock().unwrap().depth).collect()
    }

    pub fn position_samples(&self) -> Vec<[Vec3; MSAA_LEVEL]> {
        self.cells.iter().map(|c| c.lock().unwrap().position).collect()
    }

    pub fn normal_samples(&self) -> Vec<[Vec3; MSAA_LEVEL]> {
        self.cells.iter().map(|c| c.lock().unwrap().normal).collect()
    }

    pub fn full_covered(&self) -> Vec<bool> {
        self.cells.iter().map(|c| c.lock().unwrap().full_covered).collect()
    }

    /// Writes back a full-buffer snapshot of frame samples. Used by
    /// post-process passes (rim-light, bloom) that read a snapshot,
    /// compute in plain arrays, then commit the result — safe because
    /// these passes run after the rasterization barrier, with no
    /// concurrent writers left (§5).
    pub fn set_frame_samples(&self, values: Vec<[Vec3; MSAA_LEVEL]>) {
        for (cell, value) in self.cells.iter().zip(values.into_iter()) {
            cell.lock().unwrap().frame = value;
        }
    }
}

/// MSAA resolve (§4.8): when a pixel is fully covered, sample 0 already
/// equals the others by construction; otherwise average the four samples.
pub fn resolve<T: Sample>(full_covered: &[bool], samples: &[[T; MSAA_LEVEL]]) -> Vec<T> {
    full_covered
        .iter()
        .zip(samples.iter())
        .map(|(&fc, s)| {
            if fc {
                s[0]
            } else {
                let mut acc = T::ZERO;
                for &v in s {
                    acc = acc.add(v);
                }
                acc.scale(1.0 / MSAA_LEVEL as f32)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_fully_covered_takes_sample_zero() {
        let samples = vec![[1.0f32, 1.0, 1.0, 1.0]];
        let full_covered = vec![true];
        let out = resolve(&full_covered, &samples);
        assert_eq!(out[0], 1.0);
    }

    #[test]
    fn resolve_partial_coverage_averages() {
        let samples = vec![[0.0f32, 4.0, 0.0, 0.0]];
        let full_covered = vec![false];
        let out = resolve(&full_covered, &samples);
        assert_eq!(out[0], 1.0);
    }

    #[test]
    fn resolving_identical_samples_twice_is_identity() {
        let samples = vec![[2.0f32, 2.0, 2.0, 2.0]];
        let full_covered = vec![false];
        let once = resolve(&full_covered, &samples);
        let expanded: Vec<[f32; MSAA_LEVEL]> = once.iter().map(|&v| [v; MSAA_LEVEL]).collect();
        let twice = resolve(&vec![true], &expanded);
        assert_eq!(once, twice);
    }

    #[test]
    fn fresh_buffer_cells_start_uncovered_at_background() {
        let buffer = Buffer::new(2, 2, Vec3::new(0.1, 0.1, 0.1));
        assert_eq!(buffer.full_covered(), vec![false; 4]);
        assert_eq!(buffer.frame_samples()[0][0], Vec3::new(0.1, 0.1, 0.1));
    }
}
