//! `Texture<T>`: a row-major 2D pixel buffer with bilinear sampling (§4.2).
//!
//! Texel centers sit at half-pixel offsets: `(u, v)` maps to image space as
//! `x = u*W - 0.5`, `y = (1-v)*H - 0.5` (image origin is top-left, y=0 at
//! the top — so `v` increases upward in texture space but the backing
//! array is stored with row 0 on top).

use crate::error::{CoreError, Result};
use crate::gamma;
use crate::pixel::Sample;
use glam::Vec3;
use image::{DynamicImage, GenericImageView};

#[derive(Clone, Debug)]
pub struct Texture<T: Sample> {
    pub width: u32,
    pub height: u32,
    pub data: Vec<T>,
}

impl<T: Sample> Texture<T> {
    pub fn new(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::ZeroDimensions { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(CoreError::DataLengthMismatch {
                got: data.len(),
                expected,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn texel(&self, x: i64, y: i64) -> T {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.data[y * self.width as usize + x]
    }

    #[inline]
    fn texel_wrap(&self, x: i64, y: i64) -> T {
        let w = self.width as i64;
        let h = self.height as i64;
        let x = x.rem_euclid(w) as usize;
        let y = y.rem_euclid(h) as usize;
        self.data[y * self.width as usize + x]
    }

    /// Bilinear sample at `(u, v)`. `wrap = true` wraps the fractional
    /// part first (default behavior); `wrap = false` clamps to edges
    /// ("no-repeat" variant).
    pub fn sample_bilinear(&self, u: f32, v: f32, wrap: bool) -> T {
        let (u, v) = if wrap {
            (u.rem_euclid(1.0), v.rem_euclid(1.0))
        } else {
            (u.clamp(0.0, 1.0), v.clamp(0.0, 1.0))
        };

        let x = u * self.width as f32 - 0.5;
        let y = (1.0 - v) * self.height as f32 - 0.5;

        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let fetch = |xi: i64, yi: i64| -> T {
            if wrap {
                self.texel_wrap(xi, yi)
            } else {
                self.texel(xi, yi)
            }
        };

        let c00 = fetch(x0, y0);
        let c10 = fetch(x0 + 1, y0);
        let c01 = fetch(x0, y0 + 1);
        let c11 = fetch(x0 + 1, y0 + 1);

        let top = c00.lerp(c10, fx);
        let bottom = c01.lerp(c11, fx);
        top.lerp(bottom, fy)
    }
}

impl Texture<f32> {
    /// Load a single-channel texture (e.g. roughness, metallic, alpha,
    /// bump) from a loaded image, taking the red channel.
    pub fn from_image(img: &DynamicImage, linear: bool) -> Result<Self> {
        let (w, h) = img.dimensions();
        let rgba = img.to_rgba8();
        let mut data = Vec::with_capacity((w * h) as usize);
        for px in rgba.pixels() {
            let v = if linear {
                px[0] as f32 / 255.0
            } else {
                gamma::decode_u8(px[0])
            };
            data.push(v);
        }
        Texture::new(w, h, data)
    }
}

impl Texture<Vec3> {
    /// Load an RGB texture, decoding gamma-2.2 to linear unless `linear`
    /// (normal maps and similar) is set.
    pub fn from_image(img: &DynamicImage, linear: bool) -> Result<Self> {
        let (w, h) = img.dimensions();
        let rgba = img.to_rgba8();
        let mut data = Vec::with_capacity((w * h) as usize);
        for px in rgba.pixels() {
            let v = if linear {
                Vec3::new(
                    px[0] as f32 / 255.0,
                    px[1] as f32 / 255.0,
                    px[2] as f32 / 255.0,
                )
            } else {
                Vec3::new(
                    gamma::decode_u8(px[0]),
                    gamma::decode_u8(px[1]),
                    gamma::decode_u8(px[2]),
                )
            };
            data.push(v);
        }
        Texture::new(w, h, data)
    }

    /// Encode to an 8-bit RGB image, gamma-2.2 encoding linear values.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        let mut img = image::RgbImage::new(self.width, self.height);
        for (i, px) in self.data.iter().enumerate() {
            let x = (i % self.width as usize) as u32;
            let y = (i / self.width as usize) as u32;
            let mut bytes = [0u8; 3];
            px.to_gamma_bytes(gamma::encode_u8, &mut bytes);
            img.put_pixel(x, y, image::Rgb(bytes));
        }
        img
    }

    pub fn save_png(&self, path: &str) -> Result<()> {
        let img = self.to_rgb_image();
        img.save(path).map_err(|e| CoreError::ImageWrite {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bilinear_sample_at_texel_center_is_exact() {
        let tex = Texture::new(2, 2, vec![0.0f32, 1.0, 2.0, 3.0]).unwrap();
        let sample = tex.sample_bilinear(0.25, 0.75, true);
        assert!((sample - 0.0).abs() < 1e-5);
    }

    #[test]
    fn wrap_sampling_wraps_fractional_coordinate() {
        let tex = Texture::new(2, 2, vec![0.0f32, 10.0, 20.0, 30.0]).unwrap();
        let inside = tex.sample_bilinear(0.25, 0.75, true);
        let wrapped = tex.sample_bilinear(1.25, 0.75, true);
        assert!((inside - wrapped).abs() < 1e-5);
    }

    #[test]
    fn clamp_sampling_does_not_wrap() {
        let tex = Texture::new(2, 2, vec![0.0f32, 10.0, 20.0, 30.0]).unwrap();
        let at_edge = tex.sample_bilinear(0.999, 0.001, false);
        let past_edge = tex.sample_bilinear(5.0, 0.001, false);
        assert!((at_edge - past_edge).abs() < 1e-5);
    }

    #[test]
    fn zero_dimensions_is_rejected() {
        let result = Texture::new(0, 4, Vec::<f32>::new());
        assert!(result.is_err());
    }
}
