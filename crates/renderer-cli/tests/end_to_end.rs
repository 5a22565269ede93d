//! End-to-end scenarios (§8): a full config-driven render of a single
//! triangle, written to a PNG and read back.

use std::io::Write;

fn unique_temp_path(name: &str) -> std::path::PathBuf {
    let pid = std::process::id();
    std::env::temp_dir().join(format!("renderer-cli-test-{pid}-{name}"))
}

#[test]
fn loading_a_config_with_no_objects_and_rendering_writes_a_flat_background_png() {
    let config_path = unique_temp_path("scene.yaml");
    let output_path = unique_temp_path("out.png");

    let yaml = format!(
        r#"
background-color: [0.2, 0.3, 0.4]
enable-bloom: false
camera:
  pos: [0, 0, 5]
  look-dir: [0, 0, -1]
  width: 8
  height: 8
output-path: {output}
"#,
        output = output_path.display()
    );

    {
        let mut f = std::fs::File::create(&config_path).unwrap();
        f.write_all(yaml.as_bytes()).unwrap();
    }

    let mut loaded = renderer_scene::load_scene(&config_path).unwrap();
    let width = loaded.scene.camera.width;
    let height = loaded.scene.camera.height;
    let frame = loaded.scene.render(width, height);
    frame.save_png(&loaded.output_path).unwrap();

    let saved = image::open(&output_path).unwrap();
    assert_eq!(saved.width(), 8);
    assert_eq!(saved.height(), 8);

    std::fs::remove_file(&config_path).ok();
    std::fs::remove_file(&output_path).ok();
}

#[test]
fn malformed_config_is_a_parse_error_not_a_panic() {
    let config_path = unique_temp_path("bad-scene.yaml");
    {
        let mut f = std::fs::File::create(&config_path).unwrap();
        f.write_all(b"not: [valid yaml").unwrap();
    }

    let result = renderer_scene::load_scene(&config_path);
    assert!(result.is_err());

    std::fs::remove_file(&config_path).ok();
}
