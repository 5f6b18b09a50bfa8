use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid form schema: {0}")]
    Schema(String),

    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Timed out waiting for locator: {0}")]
    LocateTimeout(String),

    #[error("Element interaction failed: {0}")]
    Interaction(String),

    #[error("Value mismatch: control holds {actual:?}, expected {expected:?}")]
    ValueMismatch { expected: String, actual: String },

    #[error("No element with id: {0}")]
    NotFound(String),

    #[error("CDP error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
