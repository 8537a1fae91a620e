//! Classification of tagged entities into skill, education and experience candidates

use super::entities::{EntityLabel, TaggedSpan};

pub const TECH_INDICATORS: &[&str] = &[
    "framework", "language", "library", "tool", "platform", "software", "system", "technology",
];

pub const EDUCATION_KEYWORDS: &[&str] = &[
    "university", "college", "institute", "school", "academy", "bachelor",
    "master", "phd", "degree", "diploma", "certificate", "certification",
];

pub const JOB_TITLE_KEYWORDS: &[&str] = &[
    "engineer", "developer", "manager", "director", "analyst", "specialist",
    "consultant", "coordinator", "administrator", "architect", "designer",
    "scientist", "head", "lead", "senior", "junior", "intern", "officer",
];

const KEYWORD_RADIUS: usize = 50;
const EDUCATION_FRAGMENT_RADIUS: usize = 100;
const EXPERIENCE_RADIUS: usize = 150;

/// A candidate produced from one entity span.
///
/// `key` is the span text used for containment checks; `fragment` is the
/// surrounding text that is actually stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityCandidate {
    Skill(String),
    Education { key: String, fragment: String },
    Experience { key: String, fragment: String },
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EntityClassifier;

impl EntityClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str, spans: &[TaggedSpan]) -> Vec<EntityCandidate> {
        let mut candidates = Vec::new();

        for span in spans {
            if span.label == EntityLabel::Other {
                continue;
            }

            // The skill rule applies on its own; a span may also be a school or employer
            if self.near_tech_indicator(text, span) {
                candidates.push(EntityCandidate::Skill(span.text.clone()));
            }

            if span.label == EntityLabel::Organization {
                self.classify_organization(text, span, &mut candidates);
            }
        }

        candidates
    }

    /// School or employer, never both.
    fn classify_organization(&self, text: &str, span: &TaggedSpan, out: &mut Vec<EntityCandidate>) {
        let nearby = context_window(text, span.start, span.end, KEYWORD_RADIUS).to_lowercase();

        let is_school = contains_any(&span.text.to_lowercase(), EDUCATION_KEYWORDS)
            || contains_any(&nearby, EDUCATION_KEYWORDS);

        if is_school {
            let fragment = context_window(text, span.start, span.end, EDUCATION_FRAGMENT_RADIUS);
            out.push(EntityCandidate::Education {
                key: span.text.clone(),
                fragment: fragment.trim().to_string(),
            });
            return;
        }

        let wide = context_window(text, span.start, span.end, EXPERIENCE_RADIUS);
        if contains_any(&wide.to_lowercase(), JOB_TITLE_KEYWORDS) {
            out.push(EntityCandidate::Experience {
                key: span.text.clone(),
                fragment: wide.trim().to_string(),
            });
        }
    }

    fn near_tech_indicator(&self, text: &str, span: &TaggedSpan) -> bool {
        let nearby = context_window(text, span.start, span.end, KEYWORD_RADIUS).to_lowercase();
        contains_any(&nearby, TECH_INDICATORS)
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Slice of `text` extending `radius` bytes either side of a span, clamped to
/// the document and widened to the nearest char boundaries.
pub(crate) fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let mut lo = start.saturating_sub(radius);
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (end + radius).min(text.len());
    while hi < text.len() && !text.is_char_boundary(hi) {
        hi += 1;
    }
    &text[lo..hi]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, needle: &str, label: EntityLabel) -> TaggedSpan {
        let start = text.find(needle).unwrap();
        TaggedSpan {
            text: needle.to_string(),
            label,
            start,
            end: start + needle.len(),
        }
    }

    #[test]
    fn test_context_window_clamps_and_respects_chars() {
        let text = "héllo wörld";
        let window = context_window(text, 7, 8, 2);
        assert!(window.contains('w'));
        assert_eq!(context_window(text, 0, 5, 100), text);
    }

    #[test]
    fn test_product_near_indicator_is_skill() {
        let text = "Our data platform ran on Snowflake for analytics.";
        let spans = vec![span(text, "Snowflake", EntityLabel::Product)];

        let candidates = EntityClassifier::new().classify(text, &spans);
        assert_eq!(candidates, vec![EntityCandidate::Skill("Snowflake".to_string())]);
    }

    #[test]
    fn test_product_without_indicator_is_ignored() {
        let text = "Skills: Python, AWS, Docker.";
        let spans = vec![span(text, "Docker", EntityLabel::Product)];
        assert!(EntityClassifier::new().classify(text, &spans).is_empty());
    }

    #[test]
    fn test_school_by_name() {
        let text = "Bachelor of Science in Computer Science, State University.";
        let spans = vec![span(text, "State University", EntityLabel::Organization)];

        let candidates = EntityClassifier::new().classify(text, &spans);
        match &candidates[0] {
            EntityCandidate::Education { key, fragment } => {
                assert_eq!(key, "State University");
                assert_eq!(fragment, text);
            }
            other => panic!("unexpected candidate {:?}", other),
        }
    }

    #[test]
    fn test_employer_near_job_title() {
        let text = "Worked as Sales Engineer at Acme Corp from Jan 2019 to Dec 2021.";
        let spans = vec![span(text, "Acme Corp", EntityLabel::Organization)];

        let candidates = EntityClassifier::new().classify(text, &spans);
        assert_eq!(candidates.len(), 1);
        match &candidates[0] {
            EntityCandidate::Experience { key, fragment } => {
                assert_eq!(key, "Acme Corp");
                assert!(fragment.contains("Acme Corp"));
                assert!(fragment.contains("Sales Engineer"));
            }
            other => panic!("unexpected candidate {:?}", other),
        }
    }

    #[test]
    fn test_organization_can_be_skill_and_employer() {
        let text = "Senior Engineer at Acme Corp, building our internal software platform.";
        let spans = vec![span(text, "Acme Corp", EntityLabel::Organization)];

        let candidates = EntityClassifier::new().classify(text, &spans);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], EntityCandidate::Skill("Acme Corp".to_string()));
        assert!(matches!(
            &candidates[1],
            EntityCandidate::Experience { key, .. } if key == "Acme Corp"
        ));
    }

    #[test]
    fn test_school_by_context_even_near_job_title() {
        let text = "Teaching assistant and lead tutor, Northwind Academy degree program.";
        let spans = vec![span(text, "Northwind", EntityLabel::Organization)];

        let candidates = EntityClassifier::new().classify(text, &spans);
        assert_eq!(candidates.len(), 1);
        assert!(matches!(
            &candidates[0],
            EntityCandidate::Education { key, .. } if key == "Northwind"
        ));
    }

    #[test]
    fn test_school_and_employer_are_exclusive() {
        let text = "Research Engineer, State University robotics lab.";
        let spans = vec![span(text, "State University", EntityLabel::Organization)];

        let candidates = EntityClassifier::new().classify(text, &spans);
        assert!(candidates
            .iter()
            .all(|c| !matches!(c, EntityCandidate::Experience { .. })));
        assert!(candidates
            .iter()
            .any(|c| matches!(c, EntityCandidate::Education { .. })));
    }

    #[test]
    fn test_other_spans_ignored() {
        let text = "Jane Doe lives in San Francisco";
        let spans = vec![span(text, "San Francisco", EntityLabel::Other)];
        assert!(EntityClassifier::new().classify(text, &spans).is_empty());
    }
}
