//! Bloom (§4.12): a small dual-filter mip pyramid built by repeated 5-tap
//! tent downsampling, then collapsed back up with 8-tap tent upsampling,
//! and blended into the resolved frame per channel: a blurred channel only
//! ever brightens, never adds on top of an already-bright pixel.

use renderer_core::math::Vec3;
use renderer_core::texture::Texture;

pub const MIP_COUNT: usize = 5;

fn downsample(src: &Texture<Vec3>) -> Texture<Vec3> {
    let w = (src.width / 2).max(1);
    let h = (src.height / 2).max(1);
    let mut data = Vec::with_capacity((w * h) as usize);

    for y in 0..h {
        for x in 0..w {
            let cx = (x * 2) as i64;
            let cy = (y * 2) as i64;
            // 5-tap tent: center (weight 4), four diagonal corners at 2px
            // offset (weight 1 each), normalized by 8.
            let center = src.texel(cx, cy) * 4.0;
            let corners = src.texel(cx - 2, cy - 2)
                + src.texel(cx + 2, cy - 2)
                + src.texel(cx - 2, cy + 2)
                + src.texel(cx + 2, cy + 2);
            data.push((center + corners) / 8.0);
        }
    }

    Texture::new(w, h, data).expect("non-zero dimensions")
}

fn upsample(src: &Texture<Vec3>, target_width: u32, target_height: u32) -> Texture<Vec3> {
    let mut data = Vec::with_capacity((target_width * target_height) as usize);
    let sx = src.width as f32 / target_width as f32;
    let sy = src.height as f32 / target_height as f32;

    for y in 0..target_height {
        for x in 0..target_width {
            let cx = x as f32 * sx;
            let cy = y as f32 * sy;
            // 8-tap tent around the nearest source texel: 4 edge-adjacent
            // taps at weight 2, 4 diagonal taps at weight 1, center unused
            // (matches the standard dual-filter upsample kernel).
            let ix = cx as i64;
            let iy = cy as i64;
            let mut acc = Vec3::ZERO;
            let taps: [(i64, i64, f32); 8] = [
                (-1, 0, 2.0),
                (1, 0, 2.0),
                (0, -1, 2.0),
                (0, 1, 2.0),
                (-1, -1, 1.0),
                (1, -1, 1.0),
                (-1, 1, 1.0),
                (1, 1, 1.0),
            ];
            for (dx, dy, w) in taps {
                acc += src.texel(ix + dx, iy + dy) * w;
            }
            data.push(acc / 12.0);
        }
    }

    Texture::new(target_width, target_height, data).expect("non-zero dimensions")
}

/// Per-channel conditional blend: a blurred channel only ever raises a
/// pixel toward it, never adds a separate contribution on top.
fn mix_channel(orig: f32, blurred: f32, strength: f32) -> f32 {
    if blurred > orig {
        orig + (blurred - orig) * strength
    } else {
        orig
    }
}

/// Builds the blurred mip pyramid and blends it into `frame` in place,
/// per channel, per the conditional rule above. `mip_count` caps the
/// pyramid depth (the config's `bloom-iteration`), clamped to `MIP_COUNT`.
pub fn apply(frame: &mut Texture<Vec3>, strength: f32, mip_count: usize) {
    let mip_count = mip_count.clamp(1, MIP_COUNT);

    let mut pyramid = vec![frame.clone()];
    for _ in 1..mip_count {
        let prev = pyramid.last().unwrap();
        if prev.width <= 2 || prev.height <= 2 {
            break;
        }
        pyramid.push(downsample(prev));
    }

    let mut collapsed = pyramid.last().unwrap().clone();
    for level in pyramid.iter().rev().skip(1) {
        collapsed = upsample(&collapsed, level.width, level.height);
        for (dst, src) in collapsed.data.iter_mut().zip(level.data.iter()) {
            *dst += *src;
        }
    }

    let blurred = upsample(&collapsed, frame.width, frame.height);
    for (dst, &b) in frame.data.iter_mut().zip(blurred.data.iter()) {
        *dst = Vec3::new(
            mix_channel(dst.x, b.x, strength),
            mix_channel(dst.y, b.y, strength),
            mix_channel(dst.z, b.z, strength),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_channel_leaves_a_brighter_original_untouched() {
        assert_eq!(mix_channel(2.0, 0.5, 1.0), 2.0);
    }

    #[test]
    fn mix_channel_raises_a_dimmer_original_toward_the_blur_scaled_by_strength() {
        let out = mix_channel(0.0, 1.0, 0.5);
        assert!((out - 0.5).abs() < 1e-6);
    }

    #[test]
    fn applying_bloom_to_an_all_dark_frame_leaves_it_unchanged() {
        let mut frame = Texture::filled(16, 16, Vec3::ZERO);
        apply(&mut frame, 1.0, MIP_COUNT);
        for &c in &frame.data {
            assert_eq!(c, Vec3::ZERO);
        }
    }

    #[test]
    fn zero_strength_leaves_frame_unchanged() {
        let original = Texture::filled(16, 16, Vec3::splat(2.0));
        let mut frame = original.clone();
        apply(&mut frame, 0.0, MIP_COUNT);
        for (a, b) in frame.data.iter().zip(original.data.iter()) {
            assert!((*a - *b).length() < 1e-4);
        }
    }

    #[test]
    fn a_bright_spot_brightens_its_dim_neighbors_but_never_dims_itself() {
        let mut data = vec![Vec3::ZERO; 16 * 16];
        data[8 * 16 + 8] = Vec3::splat(10.0);
        let original = Texture::new(16, 16, data).unwrap();
        let mut frame = original.clone();
        apply(&mut frame, 1.0, MIP_COUNT);

        let center = frame.data[8 * 16 + 8];
        assert_eq!(center, original.data[8 * 16 + 8]);

        let neighbor = frame.data[8 * 16 + 9];
        assert!(neighbor.x > 0.0);
    }
}
