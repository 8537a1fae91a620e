//! Output formatters for parsed resumes and assistant results

use crate::config::OutputFormat;
use crate::error::{Result, ResumeScoutError};
use crate::extraction::{EnhancementStatus, ParseOutcome};
use crate::jobs::JobListing;
use crate::llm::{InterviewQuestion, MatchAnalysis};
use colored::{Color, Colorize};
use std::fmt::Write as _;
use std::path::Path;

/// Formats a parse outcome for one output format.
pub trait OutputFormatter {
    fn format_outcome(&self, outcome: &ParseOutcome) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal output, also used for the assistant commands.
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON output for scripting.
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_status: bool,
}

/// Picks the formatter for the configured output format.
pub struct OutputRenderer {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u32) -> String {
        let (badge, color) = match score {
            80..=100 => ("STRONG MATCH", Color::Green),
            60..=79 => ("GOOD MATCH", Color::Yellow),
            40..=59 => ("PARTIAL MATCH", Color::BrightYellow),
            _ => ("WEAK MATCH", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn push_list(&self, output: &mut String, title: &str, items: &[String], color: Color) {
        output.push_str(&self.format_header(title, 2));
        if items.is_empty() {
            output.push_str(&format!("  {}\n", self.colorize("(none found)", Color::BrightBlack)));
            return;
        }
        for item in items {
            output.push_str(&format!("  • {}\n", self.colorize(item, color)));
        }
    }

    pub fn format_keywords(&self, job_title: &str, keywords: &[String]) -> String {
        let mut output = self.format_header("Search Keywords", 1);
        output.push_str(&format!(
            "Suggested job title: {}\n",
            self.colorize(job_title, Color::Cyan)
        ));
        self.push_list(&mut output, "Keywords", keywords, Color::White);
        output
    }

    pub fn format_feedback(&self, feedback: &str) -> String {
        let mut output = self.format_header("Resume Feedback", 1);
        for line in feedback.lines() {
            let trimmed = line.trim();
            // Section titles come back in capitals
            if !trimmed.is_empty() && trimmed.chars().any(char::is_alphabetic) && trimmed == trimmed.to_uppercase() {
                output.push_str(&format!("\n{}\n", self.colorize(trimmed, Color::Green)));
            } else {
                output.push_str(line);
                output.push('\n');
            }
        }
        output
    }

    pub fn format_match(&self, job: &JobListing, analysis: &MatchAnalysis) -> String {
        let mut output = self.format_header(&format!("Match: {} at {}", job.title, job.company), 1);
        output.push_str(&format!(
            "Match score: {}% {}\n",
            analysis.match_score,
            self.format_score_badge(analysis.match_score)
        ));

        self.push_list(&mut output, "✅ Key Matches", &analysis.key_matches, Color::Green);
        self.push_list(&mut output, "🎯 Gaps", &analysis.gaps, Color::Yellow);
        self.push_list(&mut output, "📋 Recommendations", &analysis.recommendations, Color::White);

        if let Some(summary) = &analysis.summary {
            output.push_str(&self.format_header("🤖 Analysis", 2));
            output.push_str(summary);
            output.push('\n');
        }
        output
    }

    pub fn format_questions(&self, job: &JobListing, questions: &[InterviewQuestion]) -> String {
        let mut output = self.format_header(&format!("Interview Preparation: {}", job.title), 1);

        for (i, question) in questions.iter().enumerate() {
            output.push_str(&format!(
                "\n{}. {}\n",
                i + 1,
                self.colorize(&question.question, Color::Cyan)
            ));
            if let Some(context) = &question.context {
                output.push_str(&format!("   Why it's asked: {}\n", context));
            }
            if let Some(tips) = &question.tips {
                output.push_str(&format!("   {} {}\n", self.colorize("Tips:", Color::Green), tips));
            }
            if let Some(answer) = &question.suggested_answer {
                output.push_str(&format!("   Suggested answer: {}\n", answer));
            }
        }
        output
    }

    pub fn format_jobs(&self, title: &str, jobs: &[JobListing]) -> String {
        let mut output = self.format_header(title, 1);
        if jobs.is_empty() {
            output.push_str("No jobs found.\n");
            return output;
        }

        for (i, job) in jobs.iter().enumerate() {
            output.push_str(&format!(
                "\n{}. {} - {}\n",
                i + 1,
                self.colorize(&job.title, Color::Cyan),
                job.company
            ));
            if !job.location.is_empty() {
                output.push_str(&format!("   Location: {}\n", job.location));
            }
            if !job.platform.is_empty() {
                output.push_str(&format!("   Platform: {}\n", job.platform));
            }
            if !job.date_posted.is_empty() {
                output.push_str(&format!("   Posted: {}\n", job.date_posted));
            }
            if let Some(url) = job.apply_url.as_ref().or(job.url.as_ref()) {
                output.push_str(&format!("   Apply: {}\n", self.colorize(url, Color::Blue)));
            }
            if let Some(saved) = &job.date_saved {
                output.push_str(&format!("   Saved: {}\n", saved));
            }
        }
        output
    }

    fn format_status(&self, status: &EnhancementStatus) -> String {
        match status {
            EnhancementStatus::Disabled => self.colorize("disabled", Color::BrightBlack),
            EnhancementStatus::Empty => self.colorize("no additional results", Color::Yellow),
            EnhancementStatus::Failed { reason } => {
                self.colorize(&format!("failed ({})", reason), Color::Red)
            }
            EnhancementStatus::Applied { skills, education, experience } => self.colorize(
                &format!(
                    "applied (+{} skills, +{} education, +{} experience)",
                    skills, education, experience
                ),
                Color::Green,
            ),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_outcome(&self, outcome: &ParseOutcome) -> Result<String> {
        let record = &outcome.record;
        let mut output = self.format_header("📄 PARSED RESUME", 1);

        output.push_str(&self.format_header("Contact", 2));
        match &record.contact_info.email {
            Some(email) => output.push_str(&format!("  Email: {}\n", self.colorize(email, Color::Cyan))),
            None => output.push_str("  Email: -\n"),
        }
        match &record.contact_info.phone {
            Some(phone) => output.push_str(&format!("  Phone: {}\n", self.colorize(phone, Color::Cyan))),
            None => output.push_str("  Phone: -\n"),
        }

        self.push_list(&mut output, "Skills", &record.skills, Color::Green);
        self.push_list(&mut output, "Education", &record.education, Color::White);
        self.push_list(&mut output, "Experience", &record.experience, Color::White);

        output.push_str(&format!(
            "\nRetrieval enhancement: {}\n",
            self.format_status(&outcome.enhancement)
        ));
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_outcome(&self, outcome: &ParseOutcome) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(outcome)?)
        } else {
            Ok(serde_json::to_string(outcome)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_status: bool) -> Self {
        Self { include_status }
    }

    fn push_section(output: &mut String, title: &str, items: &[String]) -> Result<()> {
        writeln!(output, "## {}\n", title).map_err(fmt_error)?;
        if items.is_empty() {
            output.push_str("_None found._\n\n");
            return Ok(());
        }
        for item in items {
            // Keep multi-line experience blocks inside one list item
            writeln!(output, "- {}", item.replace('\n', "\n  ")).map_err(fmt_error)?;
        }
        output.push('\n');
        Ok(())
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_outcome(&self, outcome: &ParseOutcome) -> Result<String> {
        let record = &outcome.record;
        let mut output = String::from("# Parsed Resume\n\n");

        output.push_str("## Contact\n\n");
        output.push_str("| Field | Value |\n|-------|-------|\n");
        writeln!(
            output,
            "| Email | {} |",
            record.contact_info.email.as_deref().unwrap_or("-")
        )
        .map_err(fmt_error)?;
        writeln!(
            output,
            "| Phone | {} |\n",
            record.contact_info.phone.as_deref().unwrap_or("-")
        )
        .map_err(fmt_error)?;

        Self::push_section(&mut output, "Skills", &record.skills)?;
        Self::push_section(&mut output, "Education", &record.education)?;
        Self::push_section(&mut output, "Experience", &record.experience)?;

        if self.include_status {
            let status = match &outcome.enhancement {
                EnhancementStatus::Disabled => "disabled".to_string(),
                EnhancementStatus::Empty => "no additional results".to_string(),
                EnhancementStatus::Failed { reason } => format!("failed ({})", reason),
                EnhancementStatus::Applied { skills, education, experience } => format!(
                    "applied (+{} skills, +{} education, +{} experience)",
                    skills, education, experience
                ),
            };
            writeln!(output, "---\n\n*Retrieval enhancement: {}*", status).map_err(fmt_error)?;
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

fn fmt_error(e: std::fmt::Error) -> ResumeScoutError {
    ResumeScoutError::OutputFormatting(e.to_string())
}

impl OutputRenderer {
    pub fn new(use_colors: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn render(&self, outcome: &ParseOutcome, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_outcome(outcome),
            OutputFormat::Json => self.json_formatter.format_outcome(outcome),
            OutputFormat::Markdown => self.markdown_formatter.format_outcome(outcome),
        }
    }

    pub fn console(&self) -> &ConsoleFormatter {
        &self.console_formatter
    }
}

pub fn save_output_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    match format {
        OutputFormat::Console => format!("{}_parsed.txt", base_name),
        OutputFormat::Json => format!("{}_parsed.json", base_name),
        OutputFormat::Markdown => format!("{}_parsed.md", base_name),
    }
}
