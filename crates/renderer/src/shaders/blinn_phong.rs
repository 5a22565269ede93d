//! Blinn-Phong shading (§4.7).

use super::ShadeInput;
use crate::material::Material;
use renderer_core::math::{Vec3, EPSILON};

pub fn shade(input: &ShadeInput) -> Vec3 {
    let m = input.material;
    let ambient = Material::sample_color(&m.ambient_map, input.uv, input.duv, m.ambient);
    let diffuse_c = Material::sample_color(&m.diffuse_map, input.uv, input.duv, m.diffuse);
    let specular_c = Material::sample_color(&m.specular_map, input.uv, input.duv, m.specular);

    let n = input.normal;
    let v = (input.eye_pos - input.pos).normalize_or_zero();

    let mut color = ambient;
    for light in input.lights {
        let to_light = light.position - input.pos;
        let dist2 = to_light.length_squared().max(EPSILON);
        let l = to_light.normalize();
        let h = (l + v).normalize_or_zero();

        let reflected_intensity = light.intensity / dist2;
        let reflection = light.color * reflected_intensity;

        color += reflection * diffuse_c * n.dot(l).max(0.0);
        color += reflection * specular_c * n.dot(h).max(0.0).powf(m.shininess);
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::Light;
    use renderer_core::math::{Vec2, Vec3};

    #[test]
    fn no_lights_yields_ambient_only() {
        let material = Material::default();
        let input = ShadeInput {
            pos: Vec3::ZERO,
            normal: Vec3::Y,
            uv: Vec2::ZERO,
            duv: Vec2::ONE,
            material: &material,
            lights: &[],
            eye_pos: Vec3::new(0.0, 1.0, 0.0),
        };
        let color = shade(&input);
        assert_eq!(color, material.ambient);
    }

    #[test]
    fn textureless_material_ignores_uv() {
        let material = Material::default();
        let lights = [Light::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE, 10.0)];
        let base = ShadeInput {
            pos: Vec3::ZERO,
            normal: Vec3::Y,
            uv: Vec2::ZERO,
            duv: Vec2::ONE,
            material: &material,
            lights: &lights,
            eye_pos: Vec3::new(0.0, 1.0, 0.0),
        };
        let moved = ShadeInput {
            uv: Vec2::new(0.7, 0.3),
            duv: Vec2::new(0.4, 0.1),
            ..base
        };
        assert_eq!(shade(&base), shade(&moved));
    }
}
