//! Retrieval-augmented enhancement of heuristic extraction
//!
//! The resume is chunked, embedded and indexed in memory. Three fixed
//! questions (skills, education, experience) each retrieve the closest chunks
//! and ask a completion model to answer from them. Answers are split into
//! candidates that the parser merges into its buckets.

use crate::error::{Result, ResumeScoutError};
use crate::llm::prompts;
use async_trait::async_trait;
use log::{debug, info};
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

use super::chunker::{TextChunk, TextChunker};

const MAX_SKILL_CHARS: usize = 50;
const MIN_EXPERIENCE_CHARS: usize = 20;

/// Turns texts into dense vectors. One vector per input, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Answers a prompt with free text.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Outcome of the enhancement stage for one parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnhancementStatus {
    /// No enhancer configured
    Disabled,
    /// The stage errored; heuristic results were kept
    Failed { reason: String },
    /// The stage ran but produced no candidates
    Empty,
    /// Number of candidates that survived de-duplication, per bucket
    Applied {
        skills: usize,
        education: usize,
        experience: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalQuery {
    Skills,
    Education,
    Experience,
}

impl RetrievalQuery {
    pub fn question(&self) -> &'static str {
        match self {
            RetrievalQuery::Skills => prompts::SKILLS_QUESTION,
            RetrievalQuery::Education => prompts::EDUCATION_QUESTION,
            RetrievalQuery::Experience => prompts::EXPERIENCE_QUESTION,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnhancedCandidates {
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
}

impl EnhancedCandidates {
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.education.is_empty() && self.experience.is_empty()
    }
}

/// Cosine similarity between two vectors of equal length
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ResumeScoutError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

/// Brute-force in-memory vector index over resume chunks.
#[derive(Debug, Default)]
pub struct VectorIndex {
    entries: Vec<(TextChunk, Vec<f32>)>,
}

impl VectorIndex {
    pub fn build(chunks: Vec<TextChunk>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(ResumeScoutError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }
        Ok(Self {
            entries: chunks.into_iter().zip(embeddings).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `k` chunks, most similar first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(f32, &TextChunk)>> {
        let mut scored = self
            .entries
            .iter()
            .map(|(chunk, embedding)| Ok((cosine_similarity(query, embedding)?, chunk)))
            .collect::<Result<Vec<_>>>()?;

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

pub struct RagEnhancer {
    embedder: Arc<dyn Embedder>,
    completer: Arc<dyn Completer>,
    chunker: TextChunker,
    top_k: usize,
}

impl RagEnhancer {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        completer: Arc<dyn Completer>,
        chunker: TextChunker,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            completer,
            chunker,
            top_k: top_k.max(1),
        }
    }

    pub async fn build_index(&self, text: &str) -> Result<VectorIndex> {
        let chunks = self.chunker.split(text);
        if chunks.is_empty() {
            return Ok(VectorIndex::default());
        }

        let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed(&contents).await?;
        debug!("Embedded {} chunks", chunks.len());

        VectorIndex::build(chunks, embeddings)
    }

    /// Retrieve context for one question and ask the completion model.
    pub async fn ask(&self, index: &VectorIndex, query: RetrievalQuery) -> Result<String> {
        let question = query.question();
        let query_embedding = self
            .embedder
            .embed(&[question.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ResumeScoutError::Embedding("No embedding returned for query".to_string()))?;

        let context = index
            .search(&query_embedding, self.top_k)?
            .into_iter()
            .map(|(_, chunk)| chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = prompts::render_retrieval_prompt(&context, question);
        self.completer.complete(prompts::RETRIEVAL_SYSTEM, &prompt).await
    }

    pub async fn enhance(&self, text: &str) -> Result<EnhancedCandidates> {
        let index = self.build_index(text).await?;
        if index.is_empty() {
            return Ok(EnhancedCandidates::default());
        }

        let skills = parse_skills_answer(&self.ask(&index, RetrievalQuery::Skills).await?);
        let education = parse_line_answer(&self.ask(&index, RetrievalQuery::Education).await?, 0);
        let experience = parse_line_answer(
            &self.ask(&index, RetrievalQuery::Experience).await?,
            MIN_EXPERIENCE_CHARS + 1,
        );

        info!(
            "Retrieval answered {} skills, {} education lines, {} experience lines",
            skills.len(),
            education.len(),
            experience.len()
        );

        Ok(EnhancedCandidates {
            skills,
            education,
            experience,
        })
    }
}

/// Split a skills answer on commas, semicolons, newlines and bullets.
///
/// Entries of 50 chars or more are assumed to be prose and dropped.
pub fn parse_skills_answer(answer: &str) -> Vec<String> {
    answer
        .split(|c| matches!(c, ',' | ';' | '\n' | '•'))
        .map(strip_list_marker)
        .map(|s| s.trim_end_matches('.').trim())
        .filter(|s| !s.is_empty() && s.chars().count() < MAX_SKILL_CHARS)
        .map(str::to_string)
        .collect()
}

/// One candidate per non-empty line with at least `min_chars` chars.
pub fn parse_line_answer(answer: &str, min_chars: usize) -> Vec<String> {
    answer
        .lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty() && line.chars().count() >= min_chars)
        .map(str::to_string)
        .collect()
}

/// Drop a leading bullet or list number; interior hyphens are kept.
fn strip_list_marker(item: &str) -> &str {
    let item = item
        .trim()
        .trim_start_matches(|c| matches!(c, '-' | '*' | '•' | '–'))
        .trim_start();

    let digits = item.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &item[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim();
        }
    }
    item.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const AXES: &[&str] = &["skill", "education", "experience"];

    /// Embeds by counting axis words, so questions land near matching chunks
    struct AxisEmbedder;

    #[async_trait]
    impl Embedder for AxisEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    let lower = t.to_lowercase();
                    AXES.iter().map(|axis| lower.matches(axis).count() as f32).collect()
                })
                .collect())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(ResumeScoutError::Embedding("service unavailable".to_string()))
        }
    }

    #[derive(Default)]
    struct ScriptedCompleter {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Completer for ScriptedCompleter {
        async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let answer = if prompt.contains(prompts::SKILLS_QUESTION) {
                "- Rust\n- Kubernetes, Terraform\n• PostgreSQL"
            } else if prompt.contains(prompts::EDUCATION_QUESTION) {
                "1. MSc Distributed Systems, Tech Institute, 2016\n\n2. BSc Mathematics, 2014"
            } else {
                "Platform Engineer at Initech, 2019 - Present\nshort line"
            };
            Ok(answer.to_string())
        }
    }

    fn enhancer(embedder: Arc<dyn Embedder>, completer: Arc<ScriptedCompleter>) -> RagEnhancer {
        RagEnhancer::new(embedder, completer, TextChunker::new(120, 20).unwrap(), 2)
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
        assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_index_search_orders_by_similarity() {
        let chunk = |id: usize, content: &str| TextChunk {
            content: content.to_string(),
            start_index: 0,
            end_index: content.len(),
            chunk_id: id,
        };
        let index = VectorIndex::build(
            vec![chunk(0, "skills"), chunk(1, "education"), chunk(2, "both")],
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]],
        )
        .unwrap();

        let hits = index.search(&[1.0, 0.1], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].1.content, "skills");
        assert_eq!(hits[1].1.content, "both");
    }

    #[test]
    fn test_index_rejects_count_mismatch() {
        let result = VectorIndex::build(Vec::new(), vec![vec![1.0]]);
        assert!(matches!(result, Err(ResumeScoutError::Embedding(_))));
    }

    #[test]
    fn test_parse_skills_answer() {
        let answer = "Skills:\n- Python\n* scikit-learn, CI/CD; Node.js\n• Docker.\n1. Go\nThis line is a long explanation that clearly is not a skill name at all";
        let skills = parse_skills_answer(answer);
        assert_eq!(
            skills,
            vec!["Skills:", "Python", "scikit-learn", "CI/CD", "Node.js", "Docker", "Go"]
        );
    }

    #[test]
    fn test_parse_line_answer_applies_min_length() {
        let answer = "- Senior Engineer at Acme Corp, 2019-2021\nIntern\n\n  Staff Engineer at Globex since 2021  ";
        assert_eq!(
            parse_line_answer(answer, MIN_EXPERIENCE_CHARS + 1),
            vec![
                "Senior Engineer at Acme Corp, 2019-2021",
                "Staff Engineer at Globex since 2021"
            ]
        );
        assert_eq!(parse_line_answer(answer, 0).len(), 3);
    }

    #[tokio::test]
    async fn test_enhance_collects_all_three_answers() {
        let completer = Arc::new(ScriptedCompleter::default());
        let enhancer = enhancer(Arc::new(AxisEmbedder), completer.clone());

        let text = "Skills: Rust and Kubernetes skill set.\n\nEducation: MSc from Tech Institute.\n\nExperience: Platform Engineer at Initech, years of experience.";
        let candidates = enhancer.enhance(text).await.unwrap();

        assert_eq!(candidates.skills, vec!["Rust", "Kubernetes", "Terraform", "PostgreSQL"]);
        assert_eq!(
            candidates.education,
            vec!["MSc Distributed Systems, Tech Institute, 2016", "BSc Mathematics, 2014"]
        );
        assert_eq!(candidates.experience, vec!["Platform Engineer at Initech, 2019 - Present"]);

        let prompts = completer.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("Skills: Rust"));
    }

    #[tokio::test]
    async fn test_enhance_propagates_embedding_failure() {
        let enhancer = enhancer(Arc::new(FailingEmbedder), Arc::new(ScriptedCompleter::default()));
        let result = enhancer.enhance("Skills: Rust").await;
        assert!(matches!(result, Err(ResumeScoutError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_blank_text_yields_no_candidates() {
        let completer = Arc::new(ScriptedCompleter::default());
        let enhancer = enhancer(Arc::new(AxisEmbedder), completer.clone());

        let candidates = enhancer.enhance("   \n ").await.unwrap();
        assert!(candidates.is_empty());
        assert!(completer.prompts.lock().unwrap().is_empty());
    }
}
