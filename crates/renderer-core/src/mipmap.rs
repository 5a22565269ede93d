//! 4x4 anisotropic mipmap pyramid (§4.2).
//!
//! `levels[lod_y][lod_x]` has dimensions `(W >> lod_x, H >> lod_y)`. Column
//! 0 is built by a vertical cascade of 2-tap box filters from the base
//! texture; each row is then built by a horizontal cascade from column 0.
//! Level `(0, 0)` aliases the base texture (cloned once into the grid —
//! the original's shared-ownership semantics are expressed here as the
//! grid simply holding its own copy, since `Texture` is cheap to share via
//! `Arc` at the `Material` layer above).

use crate::pixel::Sample;
use crate::texture::Texture;

pub const MIPMAP_LEVELS: usize = 4;

pub struct Mipmap<T: Sample> {
    levels: Vec<Vec<Texture<T>>>,
}

fn halve(dim: u32) -> u32 {
    (dim / 2).max(1)
}

fn box_filter_vertical<T: Sample>(src: &Texture<T>) -> Texture<T> {
    let out_h = halve(src.height);
    let mut data = Vec::with_capacity((src.width * out_h) as usize);
    for y in 0..out_h {
        let y0 = (2 * y).min(src.height - 1);
        let y1 = (2 * y + 1).min(src.height - 1);
        for x in 0..src.width {
            let a = src.texel(x as i64, y0 as i64);
            let b = src.texel(x as i64, y1 as i64);
            data.push(a.add(b).scale(0.5));
        }
    }
    Texture::new(src.width, out_h, data).expect("halved dims are non-zero")
}

fn box_filter_horizontal<T: Sample>(src: &Texture<T>) -> Texture<T> {
    let out_w = halve(src.width);
    let mut data = Vec::with_capacity((out_w * src.height) as usize);
    for y in 0..src.height {
        for x in 0..out_w {
            let x0 = (2 * x).min(src.width - 1);
            let x1 = (2 * x + 1).min(src.width - 1);
            let a = src.texel(x0 as i64, y as i64);
            let b = src.texel(x1 as i64, y as i64);
            data.push(a.add(b).scale(0.5));
        }
    }
    Texture::new(out_w, src.height, data).expect("halved dims are non-zero")
}

impl<T: Sample> Mipmap<T> {
    pub fn build(base: Texture<T>) -> Self {
        let mut column0 = Vec::with_capacity(MIPMAP_LEVELS);
        column0.push(base);
        for i in 1..MIPMAP_LEVELS {
            let prev = &column0[i - 1];
            column0.push(box_filter_vertical(prev));
        }

        let mut levels = Vec::with_capacity(MIPMAP_LEVELS);
        for base_row in column0 {
            let mut row = Vec::with_capacity(MIPMAP_LEVELS);
            row.push(base_row);
            for j in 1..MIPMAP_LEVELS {
                let prev = &row[j - 1];
                row.push(box_filter_horizontal(prev));
            }
            levels.push(row);
        }

        Self { levels }
    }

    pub fn level(&self, lod_y: usize, lod_x: usize) -> &Texture<T> {
        &self.levels[lod_y][lod_x]
    }

    pub fn base(&self) -> &Texture<T> {
        self.level(0, 0)
    }

    /// Sample with screen-space derivatives `(du, dv)` (§4.2): select the
    /// fractional LOD from the derivative magnitude and bilinearly blend
    /// the four surrounding integer-LOD bilinear samples.
    pub fn sample(&self, u: f32, v: f32, du: f32, dv: f32, wrap: bool) -> T {
        let base = self.base();
        let max_lod = (MIPMAP_LEVELS - 1) as f32;
        let eps = 1e-4;

        let lod_x = (du * base.width as f32).max(1e-8).log2().clamp(eps, max_lod - eps);
        let lod_y = (dv * base.height as f32).max(1e-8).log2().clamp(eps, max_lod - eps);

        let x0 = lod_x.floor() as usize;
        let x1 = (x0 + 1).min(MIPMAP_LEVELS - 1);
        let y0 = lod_y.floor() as usize;
        let y1 = (y0 + 1).min(MIPMAP_LEVELS - 1);
        let fx = lod_x - x0 as f32;
        let fy = lod_y - y0 as f32;

        let s00 = self.level(y0, x0).sample_bilinear(u, v, wrap);
        let s01 = self.level(y0, x1).sample_bilinear(u, v, wrap);
        let s10 = self.level(y1, x0).sample_bilinear(u, v, wrap);
        let s11 = self.level(y1, x1).sample_bilinear(u, v, wrap);

        let top = s00.lerp(s01, fx);
        let bottom = s10.lerp(s11, fx);
        top.lerp(bottom, fy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(w: u32, h: u32) -> Texture<f32> {
        let mut data = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                data.push(if (x + y) % 2 == 0 { 1.0 } else { 0.0 });
            }
        }
        Texture::new(w, h, data).unwrap()
    }

    #[test]
    fn level_dimensions_follow_bit_shift() {
        let mip = Mipmap::build(checkerboard(16, 16));
        for i in 0..MIPMAP_LEVELS {
            for j in 0..MIPMAP_LEVELS {
                let level = mip.level(i, j);
                assert_eq!(level.width, (16u32 >> j).max(1));
                assert_eq!(level.height, (16u32 >> i).max(1));
            }
        }
    }

    #[test]
    fn level_00_aliases_base_values() {
        let base = checkerboard(8, 8);
        let base_data = base.data.clone();
        let mip = Mipmap::build(base);
        assert_eq!(mip.level(0, 0).data, base_data);
    }

    #[test]
    fn level_matches_separable_box_filter_of_parents() {
        let mip = Mipmap::build(checkerboard(16, 16));
        let expected = box_filter_vertical(mip.level(0, 0));
        assert_eq!(mip.level(1, 0).data, expected.data);
        let expected_h = box_filter_horizontal(mip.level(1, 0));
        assert_eq!(mip.level(1, 1).data, expected_h.data);
    }

    #[test]
    fn flat_texture_mipmaps_to_constant_value() {
        let tex = Texture::filled(8, 8, 0.5f32);
        let mip = Mipmap::build(tex);
        for i in 0..MIPMAP_LEVELS {
            for j in 0..MIPMAP_LEVELS {
                for &v in &mip.level(i, j).data {
                    assert!((v - 0.5).abs() < 1e-5);
                }
            }
        }
    }
}
