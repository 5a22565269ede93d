//! Cel (toon) shading (§4.7). The silhouette comes from a separate
//! outline pass (§4.9); this shader only quantizes the lit diffuse band.

use super::ShadeInput;
use crate::material::Material;
use crate::types::CelRampKind;
use renderer_core::math::{lerp, smoothstep, Vec3, EPSILON};
use std::f32::consts::PI;

const RAMP_LOW: f32 = 0.3;
const RAMP_MID: f32 = 0.6;
const RAMP_HIGH: f32 = 0.8;
const RAMP_SMOOTHNESS: f32 = 0.02;

/// Two-band smooth ramp: plateaus at `0.3 -> 0.6 -> 0.8`, each transition
/// a narrow `smoothstep` around the next luminance threshold.
fn ramp_smooth(y: f32) -> f32 {
    let t1 = smoothstep(RAMP_LOW - RAMP_SMOOTHNESS, RAMP_LOW + RAMP_SMOOTHNESS, y);
    let t2 = smoothstep(RAMP_MID - RAMP_SMOOTHNESS, RAMP_MID + RAMP_SMOOTHNESS, y);
    let stage1 = lerp(RAMP_LOW, RAMP_MID, t1);
    lerp(stage1, RAMP_HIGH, t2)
}

/// Single-step ramp for materials tagged `CelRampKind::Face` (§9: replaces
/// the original's material-name string sniffing).
fn ramp_face(y: f32) -> f32 {
    smoothstep(RAMP_MID - RAMP_SMOOTHNESS, RAMP_MID + RAMP_SMOOTHNESS, y)
}

pub fn shade(input: &ShadeInput) -> Vec3 {
    let m = input.material;
    let ambient = Material::sample_color(&m.ambient_map, input.uv, input.duv, m.ambient);
    let diffuse_c = Material::sample_color(&m.diffuse_map, input.uv, input.duv, m.diffuse);
    let n = input.normal;

    let mut diffuse_sum = Vec3::ZERO;
    for light in input.lights {
        let l = (light.position - input.pos).normalize_or_zero();
        diffuse_sum += light.color * (light.intensity * n.dot(l).max(0.0) / PI);
    }
    let lit = diffuse_c * diffuse_sum;

    let luminance = (0.2126 * lit.x + 0.7152 * lit.y + 0.0722 * lit.z).clamp(0.0, 1.0);
    let ramped = match m.cel_ramp_kind {
        CelRampKind::Smooth => ramp_smooth(luminance),
        CelRampKind::Face => ramp_face(luminance),
    };

    let scale = if luminance < EPSILON { ramped } else { ramped / luminance };
    ambient + lit * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::Light;
    use renderer_core::math::Vec2;

    #[test]
    fn darkness_yields_ambient_only() {
        let material = Material::default();
        let input = ShadeInput {
            pos: Vec3::ZERO,
            normal: Vec3::Y,
            uv: Vec2::ZERO,
            duv: Vec2::ONE,
            material: &material,
            lights: &[],
            eye_pos: Vec3::Y,
        };
        assert_eq!(shade(&input), material.ambient);
    }

    #[test]
    fn ramp_is_monotonic_nondecreasing() {
        let mut prev = 0.0;
        let mut y = 0.0f32;
        while y <= 1.0 {
            let r = ramp_smooth(y);
            assert!(r + 1e-6 >= prev);
            prev = r;
            y += 0.05;
        }
    }
}
