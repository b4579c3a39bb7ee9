//! Error handling and custom error types
//!
//! Provides unified error handling across the pipeline using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Upstream response error: {0}")]
    UpstreamResponse(String),

    #[error("Asset count mismatch: {pages} story pages but {images} illustrations")]
    AssetCountMismatch { pages: usize, images: usize },

    #[error("Page {page}: {asset} {reason}")]
    Asset {
        page: usize,
        asset: &'static str,
        reason: String,
    },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid builder state: cannot {operation} in state {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    #[error("PDF error: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, Error>;
