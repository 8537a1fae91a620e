//! Resume file type detection

use crate::error::{Result, ResumeScoutError};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" | "text" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .ok_or_else(|| {
                ResumeScoutError::InvalidInput(format!("File has no extension: {}", path.display()))
            })
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileType::Pdf => "PDF",
            FileType::Text => "plain text",
            FileType::Markdown => "Markdown",
            FileType::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mapping() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("txt"), FileType::Text);
        assert_eq!(FileType::from_extension("markdown"), FileType::Markdown);
        assert_eq!(FileType::from_extension("docx"), FileType::Unknown);
    }

    #[test]
    fn test_from_path_requires_extension() {
        assert_eq!(FileType::from_path(Path::new("cv.md")).unwrap(), FileType::Markdown);
        assert!(matches!(
            FileType::from_path(Path::new("resume")),
            Err(ResumeScoutError::InvalidInput(_))
        ));
    }
}
