//! CLI interface for resume scout

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "resume-scout")]
#[command(about = "Resume information extraction and AI-assisted job search")]
#[command(long_about = "Extract contact details, skills, education and experience from resumes, then use them to find jobs, check job fit and prepare for interviews")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract structured information from a resume
    Parse {
        /// Path to resume file (PDF, TXT, MD)
        resume: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Skip retrieval-augmented enhancement (heuristics only)
        #[arg(long)]
        no_rag: bool,
    },

    /// Suggest job search keywords and a job title for a resume
    Keywords {
        /// Path to resume file (PDF, TXT, MD)
        resume: PathBuf,

        /// Maximum number of keywords
        #[arg(short, long, default_value_t = 10)]
        max: usize,
    },

    /// Get improvement suggestions for a resume
    Feedback {
        /// Path to resume file (PDF, TXT, MD)
        resume: PathBuf,

        /// Save feedback to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Analyze how well a resume matches a job description
    Match {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Job title
        #[arg(long, default_value = "Job Opening")]
        title: String,

        /// Company name
        #[arg(long, default_value = "Unknown Company")]
        company: String,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate interview questions for a job
    Interview {
        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Job title
        #[arg(long, default_value = "Job Opening")]
        title: String,

        /// Company name
        #[arg(long, default_value = "Unknown Company")]
        company: String,

        /// Resume to tailor the questions to
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Extra instructions, e.g. "focus on system design"
        #[arg(long)]
        focus: Option<String>,

        /// Number of questions
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },

    /// Search for jobs by keywords or by a resume's skills
    Search {
        /// Resume to derive keywords from
        #[arg(short, long, conflicts_with = "keywords")]
        resume: Option<PathBuf>,

        /// Search keywords
        #[arg(short, long)]
        keywords: Option<String>,

        /// Job location
        #[arg(short, long, default_value = "Remote")]
        location: String,

        /// Restrict to one platform (e.g. LinkedIn)
        #[arg(short, long, conflicts_with = "all_platforms")]
        platform: Option<String>,

        /// Search every configured platform
        #[arg(long)]
        all_platforms: bool,

        /// Maximum results per search
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Only jobs posted within this many days
        #[arg(long)]
        days: Option<u32>,

        /// Save the results to the saved jobs directory
        #[arg(long)]
        save: bool,
    },

    /// Manage saved jobs
    Jobs {
        #[command(subcommand)]
        action: JobsAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug)]
pub enum JobsAction {
    /// List saved jobs
    List,

    /// Remove a saved job
    Remove {
        /// Job title
        title: String,

        /// Company name
        company: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
