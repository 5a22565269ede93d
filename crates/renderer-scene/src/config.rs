//! YAML scene configuration (§6). `#[serde(default)]` on every optional
//! key so a minimal config only needs what it wants to override.

use renderer::types::ShadingType;
use serde::Deserialize;

fn default_up() -> [f64; 3] {
    [0.0, 1.0, 0.0]
}

fn default_fov() -> f64 {
    60.0
}

fn default_near() -> f64 {
    0.1
}

fn default_far() -> f64 {
    1000.0
}

fn default_relax_culling() -> f64 {
    1.2
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_bloom_strength() -> f32 {
    0.4
}

fn default_bloom_radius() -> f32 {
    1.0
}

fn default_bloom_iteration() -> u32 {
    5
}

fn default_intensity() -> f32 {
    1.0
}

fn default_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn default_output_path() -> String {
    "out.png".to_string()
}

fn default_basepath() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    pub pos: [f64; 3],
    #[serde(rename = "look-dir")]
    pub look_dir: [f64; 3],
    #[serde(rename = "up-dir", default = "default_up")]
    pub up_dir: [f64; 3],
    #[serde(default = "default_fov")]
    pub fov: f64,
    #[serde(rename = "near-plane", default = "default_near")]
    pub near_plane: f64,
    #[serde(rename = "far-plane", default = "default_far")]
    pub far_plane: f64,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(rename = "relax-view-culling-factor", default = "default_relax_culling")]
    pub relax_view_culling_factor: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    pub pos: [f32; 3],
    #[serde(default = "default_white")]
    pub color: [f32; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
}

fn default_white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialOverrideConfig {
    pub ambient: Option<[f32; 3]>,
    pub diffuse: Option<[f32; 3]>,
    pub specular: Option<[f32; 3]>,
    pub shininess: Option<f32>,
    pub ior: Option<f32>,
    pub roughness: Option<f32>,
    pub metallic: Option<f32>,
    pub sheen: Option<f32>,
    #[serde(rename = "ambient-texname")]
    pub ambient_texname: Option<String>,
    #[serde(rename = "diffuse-texname")]
    pub diffuse_texname: Option<String>,
    #[serde(rename = "specular-texname")]
    pub specular_texname: Option<String>,
    #[serde(rename = "alpha-texname")]
    pub alpha_texname: Option<String>,
    #[serde(rename = "normal-texname")]
    pub normal_texname: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectConfig {
    pub path: String,
    #[serde(default = "default_basepath")]
    pub basepath: String,
    #[serde(default)]
    pub pos: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
    #[serde(rename = "shading-type", default)]
    pub shading_type: ShadingType,
    #[serde(default)]
    pub material: MaterialOverrideConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(rename = "threads-num", default)]
    pub threads_num: Option<usize>,
    #[serde(rename = "background-color", default)]
    pub background_color: [f32; 3],
    #[serde(rename = "enable-rimlight", default = "default_true")]
    pub enable_rimlight: bool,
    #[serde(rename = "enable-bloom", default = "default_true")]
    pub enable_bloom: bool,
    #[serde(rename = "bloom-strength", default = "default_bloom_strength")]
    pub bloom_strength: f32,
    #[serde(rename = "bloom-radius", default = "default_bloom_radius")]
    pub bloom_radius: f32,
    #[serde(rename = "bloom-iteration", default = "default_bloom_iteration")]
    pub bloom_iteration: u32,
    #[serde(rename = "enable-pbr", default)]
    pub enable_pbr: bool,
    #[serde(rename = "enable-ssao", default = "default_true")]
    pub enable_ssao: bool,
    pub camera: CameraConfig,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
    #[serde(rename = "output-path", default = "default_output_path")]
    pub output_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_in_defaults() {
        let yaml = r#"
camera:
  pos: [0, 0, 5]
  look-dir: [0, 0, -1]
"#;
        let config: SceneConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.camera.width, 800);
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.output_path, "out.png");
        assert!(config.objects.is_empty());
        assert!(config.enable_bloom);
    }

    #[test]
    fn objects_default_to_default_shading() {
        let yaml = r#"
camera:
  pos: [0, 0, 5]
  look-dir: [0, 0, -1]
objects:
  - path: mesh.obj
"#;
        let config: SceneConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.objects[0].shading_type, ShadingType::Default);
        assert_eq!(config.objects[0].scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let result: std::result::Result<SceneConfig, _> = serde_yaml::from_str("not: [valid");
        assert!(result.is_err());
    }
}
