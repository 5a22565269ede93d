//! Screen-space ambient occlusion (§4.11): a hemisphere kernel sampled
//! per covered MSAA sample, reprojected through the camera matrix and
//! compared against the resolved depth buffer, then bilaterally blurred.

use crate::camera::Camera;
use crate::gbuffer::{Buffer, MSAA_LEVEL};
use renderer_core::math::{Vec3, Vec4, EPSILON};
use renderer_core::texture::Texture;
use std::f32::consts::{FRAC_PI_2, TAU};

pub const SAMPLES_NUM: usize = 64;
pub const SAMPLE_RADIUS: f32 = 0.05;

/// §9: named consts rather than magic numbers, values from §4.11.
pub const BILATERAL_DIAMETER: i64 = 5;
pub const BILATERAL_SIGMA_COLOR: f32 = 0.2;
pub const BILATERAL_SIGMA_SPACE: f32 = 15.0;

const KERNEL_GRID: usize = 8; // 8x8 = SAMPLES_NUM, a 4x4-per-quadrant grid.

/// Cheap deterministic hash used for the per-pixel tangent jitter, in
/// place of a random-number dependency the original also avoids by
/// precomputing a noise texture.
fn hash01(x: u32, y: u32) -> f32 {
    let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2545_F491);
    h ^= h >> 13;
    ((h >> 8) & 0x00FF_FFFF) as f32 / 0x00FF_FFFF as f32
}

fn hemisphere_kernel() -> Vec<Vec3> {
    let mut kernel = Vec::with_capacity(SAMPLES_NUM);
    for i in 0..KERNEL_GRID {
        for j in 0..KERNEL_GRID {
            let u = (i as f32 + 0.5) / KERNEL_GRID as f32;
            let v = (j as f32 + 0.5) / KERNEL_GRID as f32;
            let theta = u * FRAC_PI_2;
            let phi = v * TAU;
            let dir = Vec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
            let linear = (i * KERNEL_GRID + j) as f32 / SAMPLES_NUM as f32;
            let radius = SAMPLE_RADIUS * (0.1 + 0.9 * linear * linear);
            kernel.push(dir * radius);
        }
    }
    kernel
}

fn tangent_basis(normal: Vec3, rand_vec: Vec3) -> (Vec3, Vec3) {
    let mut t = (rand_vec - normal * rand_vec.dot(normal)).normalize_or_zero();
    if t.length_squared() < EPSILON {
        t = normal.cross(Vec3::X).normalize_or_zero();
        if t.length_squared() < EPSILON {
            t = normal.cross(Vec3::Y).normalize_or_zero();
        }
    }
    let b = normal.cross(t);
    (t, b)
}

fn sample_clamp(depth: &[f32], width: u32, height: u32, u: f32, v: f32) -> f32 {
    let x = (u.clamp(0.0, 1.0) * width as f32 - 0.5).clamp(0.0, (width - 1) as f32);
    let y = (v.clamp(0.0, 1.0) * height as f32 - 0.5).clamp(0.0, (height - 1) as f32);
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let at = |xi: u32, yi: u32| depth[(yi * width + xi) as usize];
    let top = at(x0, y0) * (1.0 - fx) + at(x1, y0) * fx;
    let bottom = at(x0, y1) * (1.0 - fx) + at(x1, y1) * fx;
    top * (1.0 - fy) + bottom * fy
}

/// Computes the raw (unblurred) occlusion texture: `1 - occlusion`, ready
/// for the bilateral blur.
pub fn compute(buffer: &Buffer, camera: &Camera, resolved_depth: &[f32]) -> Texture<f32> {
    let kernel = hemisphere_kernel();
    let camera_matrix = camera.camera_matrix();
    let width = buffer.width;
    let height = buffer.height;

    let depth_samples = buffer.depth_samples();
    let position_samples = buffer.position_samples();
    let normal_samples = buffer.normal_samples();

    let mut ao = vec![1.0f32; (width * height) as usize];

    for y in 0..height {
        for x in 0..width {
            let idx = buffer.index(x, y);
            let rand_vec = Vec3::new(hash01(x, y) * 2.0 - 1.0, hash01(y, x) * 2.0 - 1.0, 0.0);

            let mut accum = 0.0f32;
            let mut covered = 0usize;

            for i in 0..MSAA_LEVEL {
                if depth_samples[idx][i] >= 1.0 - EPSILON {
                    continue;
                }
                covered += 1;
                let n = normal_samples[idx][i];
                let p = position_samples[idx][i];
                let (t, b) = tangent_basis(n, rand_vec);

                for &s in &kernel {
                    let offset = t * s.x + b * s.y + n * s.z;
                    let sample_pos = p + offset;

                    let homog = camera_matrix * Vec4::new(sample_pos.x, sample_pos.y, sample_pos.z, 1.0);
                    if homog.w.abs() < EPSILON {
                        continue;
                    }
                    let screen = homog.truncate() / homog.w;
                    let u = screen.x / width as f32;
                    let v = screen.y / height as f32;
                    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
                        continue;
                    }

                    let sample_z = screen.z;
                    let buffer_z = sample_clamp(resolved_depth, width, height, u, v);
                    if sample_z > buffer_z {
                        let dir = offset.normalize_or_zero();
                        let weight = dir.dot(n).max(0.0) * (1.0 - (offset.length() / SAMPLE_RADIUS).min(1.0));
                        accum += weight;
                    }
                }
            }

            if covered > 0 {
                let normalized = accum / (MSAA_LEVEL.max(covered) as f32 * SAMPLES_NUM as f32);
                let occlusion = (normalized * 6.0).min(1.0).powf(1.5);
                ao[idx] = 1.0 - occlusion;
            }
        }
    }

    Texture::new(width, height, ao).expect("buffer dimensions are non-zero")
}

/// Edge-preserving blur with fixed parameters (§4.11, §9).
pub fn bilateral_blur(ao: &Texture<f32>) -> Texture<f32> {
    let radius = BILATERAL_DIAMETER / 2;
    let mut out = vec![0.0f32; ao.data.len()];

    for y in 0..ao.height as i64 {
        for x in 0..ao.width as i64 {
            let center = ao.texel(x, y);
            let mut weight_sum = 0.0f32;
            let mut value_sum = 0.0f32;

            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let sample = ao.texel(x + dx, y + dy);
                    let spatial2 = (dx * dx + dy * dy) as f32;
                    let color_diff = sample - center;
                    let w = (-spatial2 / (2.0 * BILATERAL_SIGMA_SPACE * BILATERAL_SIGMA_SPACE)
                        - (color_diff * color_diff) / (2.0 * BILATERAL_SIGMA_COLOR * BILATERAL_SIGMA_COLOR))
                        .exp();
                    weight_sum += w;
                    value_sum += w * sample;
                }
            }

            out[(y as u32 * ao.width + x as u32) as usize] = value_sum / weight_sum.max(EPSILON);
        }
    }

    Texture::new(ao.width, ao.height, out).expect("same dimensions as input")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_has_samples_num_entries() {
        assert_eq!(hemisphere_kernel().len(), SAMPLES_NUM);
    }

    #[test]
    fn kernel_directions_stay_within_radius() {
        for s in hemisphere_kernel() {
            assert!(s.length() <= SAMPLE_RADIUS + 1e-5);
        }
    }

    #[test]
    fn blurring_a_flat_texture_is_identity() {
        let flat = Texture::filled(8, 8, 0.5f32);
        let blurred = bilateral_blur(&flat);
        for &v in &blurred.data {
            assert!((v - 0.5).abs() < 1e-4);
        }
    }
}
