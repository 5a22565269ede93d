//! The external collaborators (§2B): OBJ/MTL + texture loading and the
//! YAML config schema, assembled into a `renderer::scene::Scene` that
//! `renderer-cli` can hand straight to `Scene::render`.

pub mod config;
pub mod error;
pub mod loader;

use config::SceneConfig;
use error::{Result, SceneError};
use renderer::camera::Camera;
use renderer::light::Light;
use renderer::scene::{RenderSettings, Scene};
use renderer::types::CullMode;
use renderer_core::math::{DVec3, Vec3};
use renderer_core::progress::Progress;
use std::path::Path;
use tracing::{error, warn};

pub struct LoadedScene {
    pub scene: Scene,
    pub threads_num: Option<usize>,
    pub output_path: String,
}

pub fn load_config(path: &Path) -> Result<SceneConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| SceneError::ConfigRead {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_yaml::from_str(&text)?)
}

/// Builds the in-memory `Scene` from a parsed config (§6). Per §7, a
/// single object failing to load is fatal (aborts the whole load); a
/// missing texture on an object that does load is not.
pub fn build_scene(config: &SceneConfig) -> Result<LoadedScene> {
    let camera = Camera::new(
        DVec3::from_array(config.camera.pos),
        DVec3::from_array(config.camera.look_dir),
        DVec3::from_array(config.camera.up_dir),
        config.camera.fov,
        config.camera.near_plane,
        config.camera.far_plane,
        config.camera.width,
        config.camera.height,
        config.camera.relax_view_culling_factor,
    )?;

    let lights: Vec<Light> = config
        .lights
        .iter()
        .map(|l| Light::new(Vec3::from_array(l.pos), Vec3::from_array(l.color), l.intensity))
        .collect();

    if lights.is_empty() {
        warn!("scene config has no lights; non-cel, non-outline shading will render black");
    }

    let mut objects = Vec::with_capacity(config.objects.len());
    let progress = Progress::new("loading objects", config.objects.len() as u64);
    for object_config in &config.objects {
        match loader::load_object(object_config) {
            Ok(object) => objects.push(object),
            Err(err) => {
                error!(path = %object_config.path, %err, "failed to load object");
                progress.finish();
                return Err(err);
            }
        }
        progress.inc(1);
    }
    progress.finish();

    let settings = RenderSettings {
        cull_mode: CullMode::Back,
        rim_light_enabled: config.enable_rimlight,
        ssao_enabled: config.enable_ssao,
        bloom_enabled: config.enable_bloom,
        bloom_strength: config.bloom_strength,
        bloom_mip_count: config.bloom_iteration as usize,
        background: Vec3::from_array(config.background_color),
    };

    Ok(LoadedScene {
        scene: Scene { camera, lights, objects, settings },
        threads_num: config.threads_num,
        output_path: config.output_path.clone(),
    })
}

/// Loads a config file and builds the `Scene` in one step.
pub fn load_scene(config_path: &Path) -> Result<LoadedScene> {
    let config = load_config(config_path)?;
    build_scene(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn building_a_scene_with_no_objects_succeeds() {
        let yaml = r#"
camera:
  pos: [0, 0, 5]
  look-dir: [0, 0, -1]
lights:
  - pos: [0, 5, 5]
    intensity: 2.0
"#;
        let config: SceneConfig = serde_yaml::from_str(yaml).unwrap();
        let loaded = build_scene(&config).unwrap();
        assert_eq!(loaded.scene.objects.len(), 0);
        assert_eq!(loaded.scene.lights.len(), 1);
        assert_eq!(loaded.output_path, "out.png");
    }

    #[test]
    fn invalid_camera_parameters_fail_to_build() {
        let yaml = r#"
camera:
  pos: [0, 0, 5]
  look-dir: [0, 0, -1]
  near-plane: 10.0
  far-plane: 1.0
"#;
        let config: SceneConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(build_scene(&config).is_err());
    }
}
