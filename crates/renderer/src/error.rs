use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Core(#[from] renderer_core::CoreError),

    #[error("camera {field} must be {constraint}, got {value}")]
    InvalidCamera {
        field: &'static str,
        constraint: &'static str,
        value: f64,
    },

    #[error("object '{0}' has no shapes")]
    EmptyObject(String),
}
