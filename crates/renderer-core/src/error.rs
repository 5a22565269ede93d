use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("texture dimensions are zero: {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("texture data length {got} does not match width*height {expected}")]
    DataLengthMismatch { got: usize, expected: usize },

    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    #[error("failed to encode image: {0}")]
    ImageEncode(String),

    #[error("failed to write image to {path}: {source}")]
    ImageWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
