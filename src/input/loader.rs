//! Resume document loading with a per-path text cache

use crate::error::{Result, ResumeScoutError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct DocumentLoader {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Plain text of a PDF, text or Markdown resume.
    pub async fn load_text(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(text) = self.cache.get(path) {
                debug!("Using cached text for: {}", path.display());
                return Ok(text.clone());
            }
        }

        if !tokio::fs::try_exists(path).await? {
            return Err(ResumeScoutError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path)?;
        info!("Reading {} resume: {}", file_type.label(), path.display());

        let text = match file_type {
            FileType::Pdf => PdfExtractor.extract(path).await?,
            FileType::Text => PlainTextExtractor.extract(path).await?,
            FileType::Markdown => MarkdownExtractor.extract(path).await?,
            FileType::Unknown => {
                return Err(ResumeScoutError::UnsupportedFormat(format!(
                    "{} (expected .pdf, .txt or .md)",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
