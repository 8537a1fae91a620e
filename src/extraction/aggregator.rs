//! Candidate buckets with duplicate suppression at insertion time

use super::classifier::EntityCandidate;
use super::patterns::PatternMatches;
use super::record::ContactInfo;
use log::debug;

/// Skill, education and experience candidates gathered from every stage.
///
/// Skills use exact-set semantics so that `java` and `javascript` can both
/// be kept. Education and experience reject a fragment when any stored entry
/// already contains its key text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateBuckets {
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
}

impl CandidateBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s == skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn add_education(&mut self, key: &str, fragment: &str) -> bool {
        insert_unless_contained(&mut self.education, key, fragment)
    }

    pub fn add_experience(&mut self, key: &str, fragment: &str) -> bool {
        insert_unless_contained(&mut self.experience, key, fragment)
    }
}

fn insert_unless_contained(bucket: &mut Vec<String>, key: &str, fragment: &str) -> bool {
    let key = key.trim();
    let fragment = fragment.trim();
    if key.is_empty() || fragment.is_empty() {
        return false;
    }
    if bucket.iter().any(|existing| existing.contains(key)) {
        return false;
    }
    bucket.push(fragment.to_string());
    true
}

/// Merge pattern findings and classified entities into contact info and buckets.
///
/// Entity-derived experience is only consulted when the experience section
/// produced no date-delimited job blocks.
pub fn aggregate(patterns: PatternMatches, entities: Vec<EntityCandidate>) -> (ContactInfo, CandidateBuckets) {
    let contact = ContactInfo {
        email: patterns.email,
        phone: patterns.phone,
    };

    let mut buckets = CandidateBuckets::new();
    for skill in &patterns.skills {
        buckets.add_skill(skill);
    }
    for education in &patterns.education {
        buckets.add_education(education, education);
    }
    for block in &patterns.experience_blocks {
        buckets.add_experience(block, block);
    }

    let use_entity_experience = buckets.experience.is_empty();

    for candidate in entities {
        match candidate {
            EntityCandidate::Skill(skill) => {
                buckets.add_skill(&skill);
            }
            EntityCandidate::Education { key, fragment } => {
                buckets.add_education(&key, &fragment);
            }
            EntityCandidate::Experience { key, fragment } if use_entity_experience => {
                buckets.add_experience(&key, &fragment);
            }
            EntityCandidate::Experience { .. } => {}
        }
    }

    debug!(
        "Aggregated {} skills, {} education, {} experience candidates",
        buckets.skills.len(),
        buckets.education.len(),
        buckets.experience.len()
    );

    (contact, buckets)
}
