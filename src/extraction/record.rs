//! The structured resume record produced by the extraction pipeline

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub raw_text: String,
    pub contact_info: ContactInfo,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
}

impl ResumeRecord {
    /// Assemble the final record, removing case-insensitive duplicates from
    /// every list while keeping the first spelling seen.
    pub fn assemble(
        raw_text: &str,
        contact_info: ContactInfo,
        skills: Vec<String>,
        education: Vec<String>,
        experience: Vec<String>,
    ) -> Self {
        Self {
            raw_text: raw_text.to_string(),
            contact_info,
            skills: dedup_case_insensitive(skills),
            education: dedup_case_insensitive(education),
            experience: dedup_case_insensitive(experience),
        }
    }

    pub fn has_content(&self) -> bool {
        !self.contact_info.is_empty()
            || !self.skills.is_empty()
            || !self.education.is_empty()
            || !self.experience.is_empty()
    }
}

pub fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}
