use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Aggregates the lower crates' errors (§7), mirroring the teacher's
/// top-level `AwsmError`. `main` converts any `Err` into a logged message
/// and exit code 1.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scene(#[from] renderer_scene::error::SceneError),

    #[error(transparent)]
    Core(#[from] renderer_core::CoreError),

    #[error("failed to build the render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
