//! Named-entity tagging behind a pluggable trait
//!
//! The bundled [`GazetteerTagger`] combines curated organization and product
//! lists with capitalised-phrase heuristics. Anything implementing
//! [`EntityTagger`] can replace it.

use crate::error::{Result, ResumeScoutError};
use aho_corasick::{AhoCorasick, MatchKind};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::patterns::is_word_bounded;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityLabel {
    Organization,
    Product,
    Other,
}

/// A labelled span with byte offsets into the tagged text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

pub trait EntityTagger: Send + Sync {
    /// Spans in ascending offset order, never overlapping.
    fn tag(&self, text: &str) -> Vec<TaggedSpan>;

    fn name(&self) -> &str;
}

const BUILTIN_ORGANIZATIONS: &[&str] = &[
    "Google", "Microsoft", "Amazon", "Apple", "Meta", "Facebook", "Netflix",
    "IBM", "Oracle", "Intel", "Nvidia", "Adobe", "Cisco", "Accenture",
    "Deloitte", "McKinsey", "Goldman Sachs", "JPMorgan Chase", "Morgan Stanley",
    "Uber", "Airbnb", "Spotify", "Stripe", "Shopify", "LinkedIn", "Twitter",
    "Stanford University", "Harvard University", "MIT", "UC Berkeley",
];

const BUILTIN_PRODUCTS: &[&str] = &[
    "Python", "Java", "JavaScript", "TypeScript", "Rust", "Kotlin", "Scala",
    "TensorFlow", "PyTorch", "Keras", "Kubernetes", "Docker", "Terraform",
    "React", "Angular", "Vue", "Django", "Flask", "Spring Boot", "Node.js",
    "Next.js", "GraphQL", "PostgreSQL", "MySQL", "MongoDB", "Redis",
    "Elasticsearch", "Kafka", "Spark", "Hadoop", "Airflow", "Snowflake",
    "Databricks", "Ansible", "Jenkins", "GitHub", "GitLab", "Jira",
    "Confluence", "Tableau", "Power BI", "Excel", "Salesforce", "AWS", "Azure",
    "GCP", "Google Cloud Platform", "Linux",
];

pub struct GazetteerTagger {
    matcher: AhoCorasick,
    labels: Vec<EntityLabel>,
    organization_regex: Regex,
    phrase_regex: Regex,
}

impl Default for GazetteerTagger {
    fn default() -> Self {
        Self::with_extra_organizations(Vec::new())
    }
}

impl GazetteerTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the built-in organizations with a newline-delimited file.
    ///
    /// Blank lines and `#` comments are skipped. A missing or unreadable file
    /// is reported as [`ResumeScoutError::ModelUnavailable`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ResumeScoutError::ModelUnavailable(format!("{}: {}", path.display(), e))
        })?;

        let extra: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        info!("Loaded {} gazetteer entries from {}", extra.len(), path.display());
        Ok(Self::with_extra_organizations(extra))
    }

    fn with_extra_organizations(extra: Vec<String>) -> Self {
        let mut terms: Vec<String> = Vec::new();
        let mut labels = Vec::new();

        for org in BUILTIN_ORGANIZATIONS.iter().map(|s| s.to_string()).chain(extra) {
            terms.push(org);
            labels.push(EntityLabel::Organization);
        }
        for product in BUILTIN_PRODUCTS {
            terms.push(product.to_string());
            labels.push(EntityLabel::Product);
        }

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&terms)
            .expect("Invalid gazetteer");

        let organization_regex = Regex::new(concat!(
            r"\b(?:[A-Z][A-Za-z0-9&'-]*[ \t]+){1,4}(?:Corp(?:oration)?|Inc|LLC|Ltd|Limited|Company|Group|Technologies|Systems|Solutions|Labs|Bank|Partners|Consulting|University|College|Institute|School|Academy|Agency|Foundation)\b\.?",
            r"|\b(?:University|College|Institute)[ \t]+of[ \t]+[A-Z][A-Za-z]*(?:[ \t]+[A-Z][A-Za-z]*)*",
        ))
        .expect("Invalid organization regex");

        let phrase_regex = Regex::new(r"\b[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+\b")
            .expect("Invalid phrase regex");

        Self {
            matcher,
            labels,
            organization_regex,
            phrase_regex,
        }
    }
}

impl EntityTagger for GazetteerTagger {
    fn tag(&self, text: &str) -> Vec<TaggedSpan> {
        let mut spans: Vec<TaggedSpan> = Vec::new();

        for mat in self.matcher.find_iter(text) {
            if is_word_bounded(text, mat.start(), mat.end()) {
                spans.push(TaggedSpan {
                    text: text[mat.start()..mat.end()].to_string(),
                    label: self.labels[mat.pattern().as_usize()],
                    start: mat.start(),
                    end: mat.end(),
                });
            }
        }

        // Gazetteer hits take precedence over heuristic phrases
        for (regex, label) in [
            (&self.organization_regex, EntityLabel::Organization),
            (&self.phrase_regex, EntityLabel::Other),
        ] {
            for mat in regex.find_iter(text) {
                let overlaps = spans
                    .iter()
                    .any(|s| mat.start() < s.end && s.start < mat.end());
                if !overlaps {
                    spans.push(TaggedSpan {
                        text: mat.as_str().trim_end_matches('.').to_string(),
                        label,
                        start: mat.start(),
                        end: mat.start() + mat.as_str().trim_end_matches('.').len(),
                    });
                }
            }
        }

        spans.sort_by_key(|s| s.start);
        debug!("Tagged {} entity spans", spans.len());
        spans
    }

    fn name(&self) -> &str {
        "gazetteer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn labels_for<'a>(spans: &'a [TaggedSpan], label: EntityLabel) -> Vec<&'a str> {
        spans
            .iter()
            .filter(|s| s.label == label)
            .map(|s| s.text.as_str())
            .collect()
    }

    #[test]
    fn test_tags_organizations_and_products() {
        let tagger = GazetteerTagger::new();
        let text = "Worked as Software Engineer at Acme Corp. Skills: Python, AWS, Docker. State University.";
        let spans = tagger.tag(text);

        let orgs = labels_for(&spans, EntityLabel::Organization);
        assert!(orgs.contains(&"Acme Corp"));
        assert!(orgs.contains(&"State University"));

        let products = labels_for(&spans, EntityLabel::Product);
        assert_eq!(products, vec!["Python", "AWS", "Docker"]);
    }

    #[test]
    fn test_spans_are_ordered_and_disjoint() {
        let tagger = GazetteerTagger::new();
        let text = "Google Cloud Platform at Google, then Senior Data Engineer at Initech Solutions";
        let spans = tagger.tag(text);

        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        for span in &spans {
            assert_eq!(&text[span.start..span.end], span.text);
        }
        assert_eq!(spans[0].text, "Google Cloud Platform");
        assert_eq!(spans[0].label, EntityLabel::Product);
    }

    #[test]
    fn test_no_partial_word_hits() {
        let tagger = GazetteerTagger::new();
        let spans = tagger.tag("Metadata pipelines and Reactive streams");
        assert!(labels_for(&spans, EntityLabel::Organization).is_empty());
        assert!(labels_for(&spans, EntityLabel::Product).is_empty());
    }

    #[test]
    fn test_university_of_phrase() {
        let tagger = GazetteerTagger::new();
        let spans = tagger.tag("Studied at University of Toronto");
        assert_eq!(labels_for(&spans, EntityLabel::Organization), vec!["University of Toronto"]);
    }

    #[test]
    fn test_gazetteer_file_extends_organizations() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# employers").unwrap();
        writeln!(file, "Globex").unwrap();
        writeln!(file).unwrap();

        let tagger = GazetteerTagger::from_file(file.path()).unwrap();
        let spans = tagger.tag("Consultant at Globex since 2020");
        assert_eq!(labels_for(&spans, EntityLabel::Organization), vec!["Globex"]);
    }

    #[test]
    fn test_missing_gazetteer_is_model_unavailable() {
        let result = GazetteerTagger::from_file(Path::new("/definitely/not/here.txt"));
        assert!(matches!(result, Err(ResumeScoutError::ModelUnavailable(_))));
    }
}
