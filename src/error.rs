use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolyMultError {
    #[error("Coefficient buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },

    #[error("Invalid tile configuration: {0}")]
    InvalidTileConfig(String),
}

pub type Result<T> = std::result::Result<T, PolyMultError>;
