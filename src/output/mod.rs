//! Output formatting for the command line

pub mod formatter;

pub use formatter::{ConsoleFormatter, JsonFormatter, MarkdownFormatter, OutputFormatter, OutputRenderer};
