//! Error handling for resume scout

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeScoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("LLM inference error: {0}")]
    LlmInference(String),

    /// The entity tagger's backing model or gazetteer could not be loaded.
    #[error("Entity model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Job search error: {0}")]
    JobSearch(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeScoutError>;

