use thiserror::Error;

pub type Result<T> = std::result::Result<T, SceneError>;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to parse scene config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("failed to read config file '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load mesh '{path}': {source}")]
    ObjLoad {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error(transparent)]
    Render(#[from] renderer::RenderError),

    #[error(transparent)]
    Core(#[from] renderer_core::CoreError),
}
