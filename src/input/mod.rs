//! Resume document input: file type detection, text extraction and loading

pub mod file_detector;
pub mod loader;
pub mod text_extractor;

pub use file_detector::FileType;
pub use loader::DocumentLoader;
