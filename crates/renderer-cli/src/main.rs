//! `renderer [config.yaml]` (§6): loads a YAML scene, rasterizes it with
//! the configured thread pool, and writes a gamma-encoded PNG.

mod error;
mod logger;

use error::Result;
use renderer_core::timer::Timer;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "scene.yaml";

fn config_path() -> PathBuf {
    std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn run() -> Result<()> {
    let config_path = config_path();
    tracing::info!(path = %config_path.display(), "loading scene");

    let loaded = {
        let _timer = Timer::start("load scene");
        renderer_scene::load_scene(&config_path)?
    };

    if let Some(threads) = loaded.threads_num {
        rayon::ThreadPoolBuilder::new().num_threads(threads).build_global()?;
    }

    let renderer_scene::LoadedScene { mut scene, output_path, .. } = loaded;
    let width = scene.camera.width;
    let height = scene.camera.height;

    let frame = {
        let _timer = Timer::start("render frame");
        scene.render(width, height)
    };

    {
        let _timer = Timer::start("write png");
        frame.save_png(&output_path)?;
    }

    tracing::info!(path = %output_path, "wrote image");
    Ok(())
}

fn main() {
    logger::init();

    if let Err(err) = run() {
        tracing::error!(%err, "render failed");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_path_resolves_against_the_current_directory() {
        assert!(Path::new(DEFAULT_CONFIG_PATH).is_relative());
    }
}
