//! Resume feedback and job match analysis
//!
//! Both operations ask the completion model when one is configured and fall
//! back to deterministic analysis when it is not, or when the call fails.

use crate::config::Config;
use crate::error::Result;
use crate::extraction::{Completer, ResumeRecord};
use crate::jobs::JobListing;
use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use strsim::jaro_winkler;
use unicode_segmentation::UnicodeSegmentation;

use super::client::{strip_json_fences, OpenAiClient};
use super::prompts;

const FUZZY_THRESHOLD: f64 = 0.93;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchAnalysis {
    #[serde(deserialize_with = "deserialize_score")]
    pub match_score: u32,
    pub key_matches: Vec<String>,
    pub gaps: Vec<String>,
    pub recommendations: Vec<String>,
    /// Free-text analysis when the model did not answer in JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Accepts `85`, `85.4` or `"85%"`, clamped to 0..=100.
fn deserialize_score<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let score = match &value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(score.round().clamp(0.0, 100.0) as u32)
}

pub struct ResumeAdvisor {
    completer: Option<Arc<dyn Completer>>,
}

impl ResumeAdvisor {
    pub fn new(completer: Option<Arc<dyn Completer>>) -> Self {
        Self { completer }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let completer = OpenAiClient::from_config(config)?.map(|c| Arc::new(c) as Arc<dyn Completer>);
        Ok(Self::new(completer))
    }

    pub fn ai_enabled(&self) -> bool {
        self.completer.is_some()
    }

    /// Improvement suggestions in four sections.
    pub async fn analyze_resume(&self, record: &ResumeRecord) -> String {
        let Some(completer) = &self.completer else {
            return basic_resume_analysis(record);
        };

        let prompt = prompts::render_resume_analysis(record);
        match completer.complete(prompts::ADVISOR_SYSTEM, &prompt).await {
            Ok(analysis) => analysis.trim().to_string(),
            Err(e) => {
                warn!("Resume analysis failed, using basic analysis: {}", e);
                basic_resume_analysis(record)
            }
        }
    }

    pub async fn match_job(&self, record: &ResumeRecord, job: &JobListing) -> MatchAnalysis {
        let Some(completer) = &self.completer else {
            return basic_match_analysis(record, job);
        };

        let prompt = prompts::render_job_match(record, job);
        let answer = match completer.complete(prompts::MATCH_SYSTEM, &prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Job match analysis failed, using basic analysis: {}", e);
                return basic_match_analysis(record, job);
            }
        };

        match serde_json::from_str::<MatchAnalysis>(strip_json_fences(&answer)) {
            Ok(analysis) => analysis,
            Err(e) => {
                info!("Match answer was not JSON ({}), keeping it as a summary", e);
                MatchAnalysis {
                    summary: Some(answer.trim().to_string()),
                    ..basic_match_analysis(record, job)
                }
            }
        }
    }
}

/// Skills that appear in the job description, exactly or as a near spelling.
pub fn matching_skills(skills: &[String], description: &str) -> Vec<String> {
    let description = description.to_lowercase();
    let words: Vec<&str> = description.unicode_words().collect();

    skills
        .iter()
        .filter(|skill| {
            let skill = skill.to_lowercase();
            description.contains(&skill)
                || (!skill.contains(' ')
                    && words.iter().any(|word| jaro_winkler(&skill, word) >= FUZZY_THRESHOLD))
        })
        .cloned()
        .collect()
}

pub fn basic_match_analysis(record: &ResumeRecord, job: &JobListing) -> MatchAnalysis {
    let matches = matching_skills(&record.skills, &job.description);
    let match_score = if record.skills.is_empty() {
        50
    } else {
        (matches.len() as u32 * 10).min(100)
    };

    MatchAnalysis {
        match_score,
        key_matches: matches.into_iter().take(5).collect(),
        gaps: vec!["Unable to analyze gaps without AI processing".to_string()],
        recommendations: vec![
            "Review the job description and identify key requirements".to_string(),
            "Customize your resume to highlight relevant skills and experience".to_string(),
            "Add any missing skills that you possess but aren't in your resume".to_string(),
        ],
        summary: None,
    }
}

pub fn basic_resume_analysis(record: &ResumeRecord) -> String {
    let skills_lower: Vec<String> = record.skills.iter().map(|s| s.to_lowercase()).collect();

    let mut strengths = Vec::new();
    if record.skills.len() >= 5 {
        strengths.push("Good range of technical skills");
    }
    if record.experience.len() >= 3 {
        strengths.push("Solid work experience");
    }
    if skills_lower
        .iter()
        .any(|s| s.contains("machine learning") || s.split_whitespace().any(|w| w == "ai"))
    {
        strengths.push("Valuable AI/ML skills that are in high demand");
    }
    if strengths.is_empty() {
        strengths.push("Resume contains some relevant skills");
    }

    let mut weaknesses = Vec::new();
    if record.skills.len() < 5 {
        weaknesses.push("Limited range of technical skills listed");
    }
    if !skills_lower.iter().any(|s| s.contains("python")) {
        weaknesses.push("Python (a widely used programming language) not explicitly listed");
    }
    if weaknesses.is_empty() {
        weaknesses.push("Consider adding more specific technical skills");
    }

    let mut analysis = String::from("OVERALL ASSESSMENT\n\nStrengths:\n");
    for strength in strengths {
        analysis.push_str(&format!("- {}\n", strength));
    }
    analysis.push_str("\nWeaknesses:\n");
    for weakness in weaknesses {
        analysis.push_str(&format!("- {}\n", weakness));
    }

    analysis.push_str(
        "\nCONTENT IMPROVEMENTS\n\n\
         - Quantify your achievements with specific metrics\n\
         - Organize skills by category (programming languages, frameworks, tools)\n\
         - Highlight the skills most relevant to your target roles\n\
         \nFORMAT SUGGESTIONS\n\n\
         - Use a clean, ATS-friendly format with clear section headings\n\
         - Keep formatting consistent (bullet points, dates)\n\
         - Keep the resume to 1-2 pages\n\
         \nATS OPTIMIZATION\n\n\
         - Mirror keywords from job descriptions\n\
         - Save the resume as a PDF to preserve formatting\n\
         - Avoid tables, headers/footers and images that confuse ATS parsers\n",
    );

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResumeScoutError;
    use async_trait::async_trait;

    struct Canned(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl Completer for Canned {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String> {
            self.0
                .map(str::to_string)
                .map_err(|e| ResumeScoutError::LlmInference(e.to_string()))
        }
    }

    fn record(skills: &[&str]) -> ResumeRecord {
        ResumeRecord {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn job() -> JobListing {
        JobListing::from_description(
            "Backend Engineer",
            "Initech",
            "We need Python, Kubernetes and PostgresSQL experience on AWS.",
        )
    }

    #[test]
    fn test_matching_skills_exact_and_fuzzy() {
        let skills: Vec<String> = ["python", "PostgreSQL", "aws", "java", "machine learning"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let matches = matching_skills(&skills, &job().description);
        assert_eq!(matches, vec!["python", "PostgreSQL", "aws"]);
    }

    #[test]
    fn test_basic_match_scores() {
        let analysis = basic_match_analysis(&record(&["python", "aws"]), &job());
        assert_eq!(analysis.match_score, 20);
        assert_eq!(analysis.key_matches, vec!["python", "aws"]);

        let empty = basic_match_analysis(&record(&[]), &job());
        assert_eq!(empty.match_score, 50);
    }

    #[test]
    fn test_score_parsing_is_lenient() {
        let analysis: MatchAnalysis =
            serde_json::from_str(r#"{"match_score": "87%", "key_matches": ["Python"]}"#).unwrap();
        assert_eq!(analysis.match_score, 87);
        assert!(analysis.gaps.is_empty());

        let analysis: MatchAnalysis = serde_json::from_str(r#"{"match_score": 140.2}"#).unwrap();
        assert_eq!(analysis.match_score, 100);
    }

    #[test]
    fn test_basic_resume_analysis_sections() {
        let analysis = basic_resume_analysis(&record(&["rust"]));
        assert!(analysis.starts_with("OVERALL ASSESSMENT"));
        assert!(analysis.contains("Limited range of technical skills listed"));
        assert!(analysis.contains("Python (a widely used programming language) not explicitly listed"));
        assert!(analysis.contains("ATS OPTIMIZATION"));
    }

    #[tokio::test]
    async fn test_without_model_uses_basic_analysis() {
        let advisor = ResumeAdvisor::new(None);
        assert!(!advisor.ai_enabled());
        let analysis = advisor.match_job(&record(&["python"]), &job()).await;
        assert_eq!(analysis.match_score, 10);
    }

    #[tokio::test]
    async fn test_fenced_json_answer() {
        let advisor = ResumeAdvisor::new(Some(Arc::new(Canned(Ok(
            "```json\n{\"match_score\": 72, \"key_matches\": [\"Python\"], \"gaps\": [\"Go\"], \"recommendations\": [\"Ship\"]}\n```",
        )))));
        let analysis = advisor.match_job(&record(&["python"]), &job()).await;
        assert_eq!(analysis.match_score, 72);
        assert_eq!(analysis.gaps, vec!["Go"]);
        assert!(analysis.summary.is_none());
    }

    #[tokio::test]
    async fn test_prose_answer_kept_as_summary() {
        let advisor = ResumeAdvisor::new(Some(Arc::new(Canned(Ok("Strong fit overall.")))));
        let analysis = advisor.match_job(&record(&["python"]), &job()).await;
        assert_eq!(analysis.summary.as_deref(), Some("Strong fit overall."));
        assert_eq!(analysis.match_score, 10);
    }

    #[tokio::test]
    async fn test_model_error_falls_back() {
        let advisor = ResumeAdvisor::new(Some(Arc::new(Canned(Err("timeout")))));
        let feedback = advisor.analyze_resume(&record(&["python"])).await;
        assert!(feedback.starts_with("OVERALL ASSESSMENT"));
    }
}
