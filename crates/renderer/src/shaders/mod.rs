//! Fragment shaders (§4.7, §4.9). A `Shader` sum type replaces the
//! original's virtual shader dispatch (§9 redesign).

pub mod blinn_phong;
pub mod cel;
pub mod outline;
pub mod pbr;

use crate::light::Light;
use crate::material::Material;
use renderer_core::math::{Vec2, Vec3};

/// Everything a fragment shader needs, gathered at the rasterizer's
/// shading anchor (§4.4 step 7c).
pub struct ShadeInput<'a> {
    pub pos: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub duv: Vec2,
    pub material: &'a Material,
    pub lights: &'a [Light],
    pub eye_pos: Vec3,
}

#[derive(Clone, Copy)]
pub enum Shader {
    BlinnPhong,
    Cel,
    Pbr,
    /// Outline pass (§4.9): a constant color, independent of lighting.
    Outline(Vec3),
}

impl Shader {
    pub fn shade(&self, input: &ShadeInput) -> Vec3 {
        match self {
            Shader::BlinnPhong => blinn_phong::shade(input),
            Shader::Cel => cel::shade(input),
            Shader::Pbr => pbr::shade(input),
            Shader::Outline(color) => outline::shade(*color),
        }
    }
}
