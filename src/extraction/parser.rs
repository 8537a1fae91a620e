//! Resume parser orchestrating heuristic extraction and optional enhancement

use crate::config::Config;
use crate::error::Result;
use crate::llm::OpenAiClient;
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

use super::aggregator::{aggregate, CandidateBuckets};
use super::chunker::TextChunker;
use super::classifier::EntityClassifier;
use super::enhancement::{EnhancedCandidates, EnhancementStatus, RagEnhancer};
use super::entities::{EntityTagger, GazetteerTagger};
use super::patterns::PatternExtractor;
use super::record::{ContactInfo, ResumeRecord};

/// A parsed record together with what happened in the enhancement stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub record: ResumeRecord,
    pub enhancement: EnhancementStatus,
}

pub struct ResumeParser {
    patterns: PatternExtractor,
    tagger: Arc<dyn EntityTagger>,
    classifier: EntityClassifier,
    enhancer: Option<RagEnhancer>,
}

impl ResumeParser {
    /// Heuristic-only parser.
    pub fn new(tagger: Arc<dyn EntityTagger>) -> Self {
        Self {
            patterns: PatternExtractor::new(),
            tagger,
            classifier: EntityClassifier::new(),
            enhancer: None,
        }
    }

    pub fn with_enhancer(tagger: Arc<dyn EntityTagger>, enhancer: RagEnhancer) -> Self {
        Self {
            enhancer: Some(enhancer),
            ..Self::new(tagger)
        }
    }

    /// Build the tagger and, when enabled and credentialed, the retrieval enhancer.
    pub fn from_config(config: &Config) -> Result<Self> {
        let tagger: Arc<dyn EntityTagger> = match &config.extraction.gazetteer_path {
            Some(path) => Arc::new(GazetteerTagger::from_file(path)?),
            None => Arc::new(GazetteerTagger::new()),
        };

        if !config.extraction.enable_rag {
            info!("Retrieval enhancement disabled in configuration");
            return Ok(Self::new(tagger));
        }

        match OpenAiClient::from_config(config)? {
            Some(client) => {
                let client = Arc::new(client);
                let chunker = TextChunker::new(config.extraction.chunk_size, config.extraction.chunk_overlap)?;
                let enhancer = RagEnhancer::new(
                    client.clone(),
                    client,
                    chunker,
                    config.extraction.retrieval_top_k,
                );
                Ok(Self::with_enhancer(tagger, enhancer))
            }
            None => {
                info!(
                    "{} not set, using heuristic extraction only",
                    config.llm.api_key_env
                );
                Ok(Self::new(tagger))
            }
        }
    }

    pub fn rag_enabled(&self) -> bool {
        self.enhancer.is_some()
    }

    /// Deterministic extraction without any network calls.
    pub fn extract_heuristic(&self, text: &str) -> ResumeRecord {
        let (contact, buckets) = self.collect_heuristic(text);
        build_record(text, contact, buckets)
    }

    /// Parse resume text. `None` for empty or whitespace-only input.
    pub async fn parse(&self, text: &str) -> Option<ResumeRecord> {
        self.parse_with_status(text).await.map(|outcome| outcome.record)
    }

    pub async fn parse_with_status(&self, text: &str) -> Option<ParseOutcome> {
        if text.trim().is_empty() {
            debug!("Empty resume text, nothing to parse");
            return None;
        }

        let (contact, mut buckets) = self.collect_heuristic(text);

        let enhancement = match &self.enhancer {
            None => EnhancementStatus::Disabled,
            Some(enhancer) => match enhancer.enhance(text).await {
                Ok(candidates) if candidates.is_empty() => EnhancementStatus::Empty,
                Ok(candidates) => merge_enhanced(&mut buckets, candidates),
                Err(e) => {
                    warn!("Retrieval enhancement failed, keeping heuristic results: {}", e);
                    EnhancementStatus::Failed { reason: e.to_string() }
                }
            },
        };

        Some(ParseOutcome {
            record: build_record(text, contact, buckets),
            enhancement,
        })
    }

    fn collect_heuristic(&self, text: &str) -> (ContactInfo, CandidateBuckets) {
        let patterns = self.patterns.extract(text);
        let spans = self.tagger.tag(text);
        let entities = self.classifier.classify(text, &spans);
        debug!(
            "{} tagger produced {} spans, {} classified candidates",
            self.tagger.name(),
            spans.len(),
            entities.len()
        );
        aggregate(patterns, entities)
    }
}

fn merge_enhanced(buckets: &mut CandidateBuckets, candidates: EnhancedCandidates) -> EnhancementStatus {
    let skills = candidates.skills.iter().filter(|s| buckets.add_skill(s)).count();
    let education = candidates
        .education
        .iter()
        .filter(|e| buckets.add_education(e, e))
        .count();
    let experience = candidates
        .experience
        .iter()
        .filter(|e| buckets.add_experience(e, e))
        .count();

    EnhancementStatus::Applied {
        skills,
        education,
        experience,
    }
}

fn build_record(text: &str, contact: ContactInfo, buckets: CandidateBuckets) -> ResumeRecord {
    ResumeRecord::assemble(
        text,
        contact,
        buckets.skills,
        buckets.education,
        buckets.experience,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResumeScoutError;
    use crate::extraction::enhancement::{Completer, Embedder};
    use crate::extraction::entities::TaggedSpan;
    use async_trait::async_trait;

    const SAMPLE: &str = "Contact: jane@example.com, (415) 555-0100. Worked as Software Engineer at Acme Corp from Jan 2019 to Dec 2021. Skills: Python, AWS, Docker. Bachelor of Science in Computer Science, State University.";

    struct NoEntities;

    impl EntityTagger for NoEntities {
        fn tag(&self, _text: &str) -> Vec<TaggedSpan> {
            Vec::new()
        }

        fn name(&self) -> &str {
            "none"
        }
    }

    struct ConstantEmbedder;

    #[async_trait]
    impl Embedder for ConstantEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.5]).collect())
        }
    }

    struct BrokenEmbedder;

    #[async_trait]
    impl Embedder for BrokenEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(ResumeScoutError::Embedding("connection refused".to_string()))
        }
    }

    struct FixedCompleter(&'static str);

    #[async_trait]
    impl Completer for FixedCompleter {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn tagger() -> Arc<dyn EntityTagger> {
        Arc::new(GazetteerTagger::new())
    }

    fn rag(embedder: Arc<dyn Embedder>, answer: &'static str) -> RagEnhancer {
        RagEnhancer::new(
            embedder,
            Arc::new(FixedCompleter(answer)),
            TextChunker::new(1000, 200).unwrap(),
            4,
        )
    }

    #[tokio::test]
    async fn test_sample_resume_heuristics() {
        let parser = ResumeParser::new(tagger());
        let record = parser.parse(SAMPLE).await.unwrap();

        assert_eq!(record.raw_text, SAMPLE);
        assert_eq!(record.contact_info.email.as_deref(), Some("jane@example.com"));
        assert_eq!(record.contact_info.phone.as_deref(), Some("(415) 555-0100"));

        let lower: Vec<String> = record.skills.iter().map(|s| s.to_lowercase()).collect();
        for skill in ["python", "aws", "docker"] {
            assert!(lower.contains(&skill.to_string()), "missing skill {}", skill);
        }

        assert!(record
            .education
            .iter()
            .any(|e| e.contains("Bachelor of Science in Computer Science")));
        assert!(record.education.iter().any(|e| e.contains("State University")));
        assert!(record.experience.iter().any(|e| e.contains("Acme Corp")));
    }

    #[tokio::test]
    async fn test_empty_input_returns_none() {
        let parser = ResumeParser::new(tagger());
        assert!(parser.parse("").await.is_none());
        assert!(parser.parse("  \n\t ").await.is_none());
        assert!(parser.parse_with_status("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_text_without_findings_yields_empty_record() {
        let parser = ResumeParser::new(Arc::new(NoEntities));
        let record = parser.parse("lorem ipsum dolor").await.unwrap();

        assert_eq!(record.raw_text, "lorem ipsum dolor");
        assert!(record.contact_info.is_empty());
        assert!(record.skills.is_empty());
        assert!(record.education.is_empty());
        assert!(record.experience.is_empty());
    }

    #[test]
    fn test_heuristic_extraction_is_deterministic() {
        let parser = ResumeParser::new(tagger());
        assert_eq!(parser.extract_heuristic(SAMPLE), parser.extract_heuristic(SAMPLE));
    }

    #[tokio::test]
    async fn test_no_case_insensitive_duplicates() {
        let parser = ResumeParser::new(tagger());
        let text = "Skills: Python, python, PYTHON. Our platform used Python and Docker tooling.";
        let record = parser.parse(text).await.unwrap();

        for list in [&record.skills, &record.education, &record.experience] {
            let mut seen = std::collections::HashSet::new();
            for item in list {
                assert!(seen.insert(item.to_lowercase()), "duplicate {}", item);
            }
        }
    }

    #[tokio::test]
    async fn test_disabled_status_without_enhancer() {
        let parser = ResumeParser::new(tagger());
        let outcome = parser.parse_with_status(SAMPLE).await.unwrap();
        assert_eq!(outcome.enhancement, EnhancementStatus::Disabled);
        assert!(!parser.rag_enabled());
    }

    #[tokio::test]
    async fn test_enhancement_failure_keeps_heuristics() {
        let heuristic = ResumeParser::new(tagger()).extract_heuristic(SAMPLE);

        let parser = ResumeParser::with_enhancer(tagger(), rag(Arc::new(BrokenEmbedder), ""));
        let outcome = parser.parse_with_status(SAMPLE).await.unwrap();

        assert!(matches!(outcome.enhancement, EnhancementStatus::Failed { .. }));
        assert_eq!(outcome.record, heuristic);
    }

    #[tokio::test]
    async fn test_enhancement_only_adds() {
        let heuristic = ResumeParser::new(tagger()).extract_heuristic(SAMPLE);

        let parser = ResumeParser::with_enhancer(
            tagger(),
            rag(Arc::new(ConstantEmbedder), "Kubernetes, Terraform\nSoftware Engineer at Acme Corp, 2019 to 2021"),
        );
        let outcome = parser.parse_with_status(SAMPLE).await.unwrap();

        assert!(matches!(outcome.enhancement, EnhancementStatus::Applied { .. }));
        for skill in &heuristic.skills {
            assert!(outcome.record.skills.contains(skill));
        }
        for education in &heuristic.education {
            assert!(outcome.record.education.contains(education));
        }
        for experience in &heuristic.experience {
            assert!(outcome.record.experience.contains(experience));
        }
        assert!(outcome.record.skills.contains(&"Kubernetes".to_string()));
        assert!(outcome.record.skills.contains(&"Terraform".to_string()));
    }

    #[tokio::test]
    async fn test_unhelpful_answer_is_empty_status() {
        let parser = ResumeParser::with_enhancer(tagger(), rag(Arc::new(ConstantEmbedder), "\n\n"));
        let outcome = parser.parse_with_status(SAMPLE).await.unwrap();
        assert_eq!(outcome.enhancement, EnhancementStatus::Empty);
    }
}
