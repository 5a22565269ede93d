//! Disney-style metallic-roughness PBR (§4.7).

use super::ShadeInput;
use crate::material::Material;
use renderer_core::math::{Vec3, EPSILON};
use std::f32::consts::PI;

pub fn shade(input: &ShadeInput) -> Vec3 {
    let m = input.material;
    let base = Material::sample_color(&m.diffuse_map, input.uv, input.duv, m.diffuse);
    let roughness = Material::sample_scalar(&m.roughness_map, input.uv, input.duv, m.roughness).clamp(0.045, 1.0);
    let metallic = Material::sample_scalar(&m.metallic_map, input.uv, input.duv, m.metallic).clamp(0.0, 1.0);

    let n = input.normal;
    let v = (input.eye_pos - input.pos).normalize_or_zero();
    let n_dot_v = n.dot(v).max(EPSILON);

    let alpha = roughness * roughness;
    let alpha2 = alpha * alpha;
    let k = ((roughness + 1.0) * (roughness + 1.0)) / 8.0;
    let f0 = Vec3::splat(0.04).lerp(base, metallic);

    let mut lo = Vec3::ZERO;
    for light in input.lights {
        let to_light = light.position - input.pos;
        let dist2 = to_light.length_squared().max(EPSILON);
        let l = to_light.normalize();
        let h = (l + v).normalize_or_zero();

        let n_dot_l = n.dot(l).max(0.0);
        if n_dot_l <= 0.0 {
            continue;
        }
        let n_dot_h = n.dot(h).max(0.0);
        let l_dot_h = l.dot(h).max(0.0);

        let fd90 = 0.5 + 2.0 * roughness * l_dot_h * l_dot_h;
        let diffuse = (base / PI)
            * (1.0 + (fd90 - 1.0) * (1.0 - n_dot_l).powf(5.0))
            * (1.0 + (fd90 - 1.0) * (1.0 - n_dot_v).powf(5.0));

        let denom = n_dot_h * n_dot_h * (alpha2 - 1.0) + 1.0;
        let d = alpha2 / (PI * denom * denom).max(EPSILON);

        let g_v = n_dot_v / (n_dot_v * (1.0 - k) + k);
        let g_l = n_dot_l / (n_dot_l * (1.0 - k) + k);
        let g = g_v * g_l;

        let f = f0 + (Vec3::ONE - f0) * (1.0 - n_dot_v).powf(5.0);

        let specular = f * (d * g / (4.0 * n_dot_v * n_dot_l + EPSILON));

        let reflected_intensity = light.intensity / dist2;
        lo += light.color * reflected_intensity * (diffuse + specular) * n_dot_l;
    }

    let occlusion = Material::sample_scalar(&m.bump_map, input.uv, input.duv, 1.0);
    let emissive = Material::sample_color(&m.emissive_map, input.uv, input.duv, m.emission);

    lo * (0.5 + 0.5 * occlusion) + emissive * m.ior
}
