use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewportError {
    #[error("unsupported city: {0}")]
    UnknownCity(String),
}
