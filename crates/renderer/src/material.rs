//! Material parameters and their optional Mipmap handles (§3, §4.2, §6).
//!
//! Texture handles are shared across materials via `Arc` rather than the
//! original's reference-counted C++ pointers (§9 ownership redesign).
//! `Arc` rather than `Rc`: triangle rasterization fans out across rayon
//! worker threads (§5), so `Object`/`Material` must be `Sync`.

use crate::types::CelRampKind;
use renderer_core::math::{Vec2, Vec3};
use renderer_core::mipmap::Mipmap;
use std::sync::Arc;

#[derive(Clone)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub emission: Vec3,
    pub shininess: f32,
    pub ior: f32,
    pub roughness: f32,
    pub metallic: f32,
    pub sheen: f32,
    pub dissolve: f32,

    pub ambient_map: Option<Arc<Mipmap<Vec3>>>,
    pub diffuse_map: Option<Arc<Mipmap<Vec3>>>,
    pub specular_map: Option<Arc<Mipmap<Vec3>>>,
    pub emissive_map: Option<Arc<Mipmap<Vec3>>>,
    pub normal_map: Option<Arc<Mipmap<Vec3>>>,
    pub roughness_map: Option<Arc<Mipmap<f32>>>,
    pub metallic_map: Option<Arc<Mipmap<f32>>>,
    pub alpha_map: Option<Arc<Mipmap<f32>>>,
    pub bump_map: Option<Arc<Mipmap<f32>>>,

    /// Outline pass parameters (§9: exposed as `Material` fields rather
    /// than global constants, one per cel-shaded object).
    pub outline_width: f32,
    pub outline_color: Vec3,
    pub cel_ramp_kind: CelRampKind,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(0.5),
            emission: Vec3::ZERO,
            shininess: 32.0,
            ior: 1.0,
            roughness: 0.5,
            metallic: 0.0,
            sheen: 0.0,
            dissolve: 1.0,
            ambient_map: None,
            diffuse_map: None,
            specular_map: None,
            emissive_map: None,
            normal_map: None,
            roughness_map: None,
            metallic_map: None,
            alpha_map: None,
            bump_map: None,
            outline_width: 0.02,
            outline_color: Vec3::ZERO,
            cel_ramp_kind: CelRampKind::Smooth,
        }
    }
}

impl Material {
    pub fn sample_color(map: &Option<Arc<Mipmap<Vec3>>>, uv: Vec2, duv: Vec2, constant: Vec3) -> Vec3 {
        match map {
            Some(mip) => mip.sample(uv.x, uv.y, duv.x, duv.y, true),
            None => constant,
        }
    }

    pub fn sample_scalar(map: &Option<Arc<Mipmap<f32>>>, uv: Vec2, duv: Vec2, constant: f32) -> f32 {
        match map {
            Some(mip) => mip.sample(uv.x, uv.y, duv.x, duv.y, true),
            None => constant,
        }
    }

    /// Alpha-mask test used by the rasterizer (§4.4 step 7b). Materials
    /// without an alpha map never reject a sample on this basis.
    pub fn alpha_at(&self, uv: Vec2) -> f32 {
        match &self.alpha_map {
            Some(mip) => mip.sample(uv.x, uv.y, 1.0, 1.0, true),
            None => 1.0,
        }
    }
}
