//! Resume scout library

pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod input;
pub mod jobs;
pub mod keywords;
pub mod llm;
pub mod output;

pub use config::Config;
pub use error::{Result, ResumeScoutError};
pub use extraction::{ResumeParser, ResumeRecord};
