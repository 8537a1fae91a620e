//! Job listings: search and local saved-job storage

pub mod search;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use search::{SearchQuery, SerpApiSearcher};
pub use storage::JobStore;

/// A job posting, either returned from search or entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_url: Option<String>,
    pub date_posted: String,
    pub platform: String,
    pub job_type: String,
    pub is_real_job: bool,
    /// Extra instructions for interview question generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_customization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_saved: Option<String>,
}

impl JobListing {
    /// A listing built from a description the user supplied directly.
    pub fn from_description(title: &str, company: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            company: company.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }
}
