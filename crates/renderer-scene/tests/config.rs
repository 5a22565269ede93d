//! Integration tests for YAML config parsing and scene assembly (§8).

use std::io::Write;

fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("renderer-scene-test-{}-{name}", std::process::id()));
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn full_config_with_lights_and_no_meshes_builds_a_scene() {
    let path = write_temp(
        "full.yaml",
        r#"
threads-num: 4
background-color: [0.1, 0.1, 0.1]
enable-rimlight: true
enable-bloom: true
bloom-strength: 0.6
camera:
  pos: [0, 1, 6]
  look-dir: [0, -0.1, -1]
  fov: 45
  near-plane: 0.1
  far-plane: 200
  width: 64
  height: 48
lights:
  - pos: [2, 3, 4]
    color: [1, 1, 1]
    intensity: 3.0
output-path: render.png
"#,
    );

    let loaded = renderer_scene::load_scene(&path).unwrap();
    assert_eq!(loaded.threads_num, Some(4));
    assert_eq!(loaded.output_path, "render.png");
    assert_eq!(loaded.scene.camera.width, 64);
    assert_eq!(loaded.scene.lights.len(), 1);
    assert!(loaded.scene.settings.bloom_enabled);

    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_config_file_is_reported_not_panicked() {
    let missing = std::env::temp_dir().join("renderer-scene-test-does-not-exist.yaml");
    let result = renderer_scene::load_scene(&missing);
    assert!(result.is_err());
}
