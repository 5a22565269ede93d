//! Per-frame orchestration (§2, §5): the fixed pass order from scene data
//! down to a gamma-encoded image, with triangle rasterization and the
//! G-buffer resolve parallelized with `rayon`.

use crate::camera::Camera;
use crate::gbuffer::Buffer;
use crate::geometry::{Object, Vertex};
use crate::light::Light;
use crate::post_process::{bloom, msaa_resolve, rim_light, ssao};
use crate::shaders::Shader;
use crate::types::{CullMode, ShadingType};
use rayon::prelude::*;
use renderer_core::math::Vec3;
use renderer_core::texture::Texture;
use tracing::{debug, info};

/// Knobs that apply to a whole frame rather than to one object (§6).
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub cull_mode: CullMode,
    pub rim_light_enabled: bool,
    pub ssao_enabled: bool,
    pub bloom_enabled: bool,
    pub bloom_strength: f32,
    pub bloom_mip_count: usize,
    pub background: Vec3,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Back,
            rim_light_enabled: true,
            ssao_enabled: true,
            bloom_enabled: true,
            bloom_strength: 0.4,
            bloom_mip_count: bloom::MIP_COUNT,
            background: Vec3::ZERO,
        }
    }
}

pub struct Scene {
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub objects: Vec<Object>,
    pub settings: RenderSettings,
}

fn shader_for(shading_type: ShadingType) -> Shader {
    match shading_type {
        ShadingType::Default => Shader::BlinnPhong,
        ShadingType::Cel => Shader::Cel,
        ShadingType::Pbr => Shader::Pbr,
    }
}

fn shade_triangle_vertices(object: &Object, triangle: &crate::geometry::Triangle, camera_matrix: renderer_core::math::Mat4) -> [Vertex; 3] {
    let normals = triangle.corner_normals(object);
    let mut shaded = std::array::from_fn(|i| object.vertex(triangle.v[i], normals[i]));
    for v in &mut shaded {
        crate::vertex_shader::shade_vertex(camera_matrix, v);
    }
    shaded
}

/// Displaces a triangle's vertices outward along their normals for the
/// cel outline pass (§4.9): `pos += normal * width * tanh(|view_vec|) +
/// view_vec.normalize() * 50*eps`.
fn inflate_for_outline(object: &Object, triangle: &crate::geometry::Triangle, camera_pos: Vec3, width: f32) -> Object {
    let mut inflated = Object::new(
        object.positions.clone(),
        object.normals.clone(),
        object.texcoords.clone(),
        object.materials.clone(),
        Vec::new(),
        object.model_matrix,
        object.normal_matrix,
        object.shading_type,
    );
    let normals = triangle.corner_normals(object);
    for (i, &idx) in triangle.v.iter().enumerate() {
        let p = inflated.positions[idx as usize];
        let view_vec = camera_pos - p;
        let displaced = p + normals[i] * width * view_vec.length().tanh()
            + view_vec.normalize_or_zero() * (50.0 * renderer_core::math::EPSILON);
        inflated.positions[idx as usize] = displaced;
    }
    inflated
}

impl Scene {
    /// Runs the full per-frame pipeline and returns the gamma-ready linear
    /// image (§2 data flow). The caller encodes/writes the PNG.
    pub fn render(&mut self, width: u32, height: u32) -> Texture<Vec3> {
        self.camera.width = width;
        self.camera.height = height;

        for object in &mut self.objects {
            object.apply_model_transform();
        }

        let camera_matrix = self.camera.camera_matrix();
        let buffer = Buffer::new(width, height, self.settings.background);

        info!(objects = self.objects.len(), lights = self.lights.len(), "rasterizing frame");

        for object in &self.objects {
            let shader = shader_for(object.shading_type);
            let triangles: Vec<&crate::geometry::Triangle> =
                object.shapes.iter().flat_map(|s| s.triangles.iter()).collect();

            triangles.par_iter().for_each(|&triangle| {
                let shaded = shade_triangle_vertices(object, triangle, camera_matrix);
                crate::geometry::triangle::rasterize(
                    triangle,
                    object,
                    &shaded,
                    &self.camera,
                    &shader,
                    self.settings.cull_mode,
                    &self.lights,
                    &buffer,
                );
            });

            if object.shading_type == ShadingType::Cel {
                let camera_pos = self.camera.position_f32();
                triangles.par_iter().for_each(|&triangle| {
                    let material = object.material(triangle.material);
                    let inflated = inflate_for_outline(object, triangle, camera_pos, material.outline_width);
                    let shaded = shade_triangle_vertices(&inflated, triangle, camera_matrix);
                    let outline_shader = Shader::Outline(material.outline_color);
                    crate::geometry::triangle::rasterize(
                        triangle,
                        &inflated,
                        &shaded,
                        &self.camera,
                        &outline_shader,
                        CullMode::Front,
                        &self.lights,
                        &buffer,
                    );
                });
            }
        }

        if self.settings.rim_light_enabled {
            debug!("rim-light pass");
            rim_light::apply(&buffer, self.camera.near as f32, self.camera.far as f32);
        }

        debug!("msaa resolve");
        let resolved = msaa_resolve::resolve_buffer(&buffer);
        let mut frame = Texture::new(width, height, resolved.frame).expect("buffer dims are non-zero");

        if self.settings.ssao_enabled {
            debug!("ssao");
            let raw_ao = ssao::compute(&buffer, &self.camera, &resolved.depth);
            let ao = ssao::bilateral_blur(&raw_ao);
            for (pixel, &occlusion) in frame.data.iter_mut().zip(ao.data.iter()) {
                *pixel *= occlusion;
            }
        }

        if self.settings.bloom_enabled {
            debug!(strength = self.settings.bloom_strength, "bloom");
            bloom::apply(&mut frame, self.settings.bloom_strength, self.settings.bloom_mip_count);
        }

        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Shape, Triangle};
    use crate::material::Material;
    use renderer_core::math::{DVec3, Mat3, Mat4, Vec2};
    use std::sync::Arc;

    fn single_triangle_object() -> Object {
        Object::new(
            vec![Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
            vec![Vec3::Z],
            vec![Vec2::ZERO; 3],
            vec![Arc::new(Material::default())],
            vec![Shape {
                triangles: vec![Triangle {
                    v: [0, 1, 2],
                    vn: [None, None, None],
                    vt: [None, None, None],
                    material: 0,
                }],
            }],
            Mat4::IDENTITY,
            Mat3::IDENTITY,
            ShadingType::Default,
        )
    }

    #[test]
    fn rendering_a_single_front_facing_triangle_covers_its_pixels() {
        let camera = Camera::new(
            DVec3::new(0.0, 0.0, 5.0),
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::Y,
            60.0,
            0.1,
            100.0,
            32,
            32,
            1.2,
        )
        .unwrap();
        let light = Light::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ONE, 5.0);
        let mut scene = Scene {
            camera,
            lights: vec![light],
            objects: vec![single_triangle_object()],
            settings: RenderSettings {
                ssao_enabled: false,
                bloom_enabled: false,
                ..RenderSettings::default()
            },
        };

        let frame = scene.render(32, 32);
        let center = frame.data[16 * 32 + 16];
        assert!(center.length() > 0.0, "expected the triangle's center pixel to be lit");
    }
}
