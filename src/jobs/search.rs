//! Job search through SerpApi's Google Jobs engine

use crate::config::Config;
use crate::error::{Result, ResumeScoutError};
use log::{info, warn};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::JobListing;

const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search";

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keywords: String,
    pub location: String,
    /// Restrict to listings served via this platform. `None` or "all" means any.
    pub platform: Option<String>,
    pub count: usize,
    pub days_ago: u32,
}

impl SearchQuery {
    pub fn new(keywords: &str, location: &str) -> Self {
        Self {
            keywords: keywords.to_string(),
            location: location.to_string(),
            platform: None,
            count: 5,
            days_ago: 7,
        }
    }

    fn platform_filter(&self) -> Option<&str> {
        self.platform
            .as_deref()
            .filter(|p| !p.trim().is_empty() && !p.eq_ignore_ascii_case("all"))
    }

    pub fn query_string(&self) -> String {
        let mut query = format!("{} jobs in {}", self.keywords, self.location);
        if let Some(platform) = self.platform_filter() {
            query.push(' ');
            query.push_str(platform);
        }
        query
    }
}

pub struct SerpApiSearcher {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl SerpApiSearcher {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            api_key,
            endpoint: SERPAPI_ENDPOINT.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.search_api_key())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search for listings. Any failure is logged and yields an empty list.
    pub async fn search(&self, query: &SearchQuery) -> Vec<JobListing> {
        let Some(api_key) = &self.api_key else {
            warn!("SerpApi key not configured, returning no results");
            return Vec::new();
        };

        match self.fetch(api_key, query).await.and_then(|data| parse_results(&data, query)) {
            Ok(jobs) => {
                info!("Found {} jobs for '{}'", jobs.len(), query.query_string());
                jobs
            }
            Err(e) => {
                warn!("Job search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Search each platform in turn and concatenate the results.
    pub async fn search_platforms(&self, base: &SearchQuery, platforms: &[String]) -> Vec<JobListing> {
        if platforms.is_empty() {
            return self.search(base).await;
        }

        let mut all_jobs = Vec::new();
        for platform in platforms {
            let query = SearchQuery {
                platform: Some(platform.clone()),
                ..base.clone()
            };
            all_jobs.extend(self.search(&query).await);
        }
        all_jobs
    }

    async fn fetch(&self, api_key: &str, query: &SearchQuery) -> Result<Value> {
        let chips = format!("date_posted:{}d", query.days_ago);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("engine", "google_jobs"),
                ("q", query.query_string().as_str()),
                ("api_key", api_key),
                ("hl", "en"),
                ("chips", chips.as_str()),
            ])
            .send()
            .await?;

        Ok(response.json().await?)
    }
}

/// Convert a Google Jobs response into listings.
pub fn parse_results(data: &Value, query: &SearchQuery) -> Result<Vec<JobListing>> {
    if let Some(error) = data.get("error") {
        return Err(ResumeScoutError::JobSearch(
            error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string()),
        ));
    }

    let Some(results) = data.get("jobs_results").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let platform_filter = query.platform_filter().map(str::to_lowercase);

    let jobs = results
        .iter()
        .take(query.count)
        .map(|job| listing_from_result(job, data))
        .filter(|listing| {
            platform_filter
                .as_ref()
                .map_or(true, |p| listing.platform.to_lowercase().contains(p))
        })
        .collect();

    Ok(jobs)
}

fn listing_from_result(job: &Value, data: &Value) -> JobListing {
    let text = |key: &str| job.get(key).and_then(Value::as_str);
    let extensions = job.get("detected_extensions");
    let extension = |key: &str| extensions.and_then(|e| e.get(key)).and_then(Value::as_str);

    let description = text("description")
        .or_else(|| text("snippet"))
        .unwrap_or("No description available");

    let job_type = extension("schedule_type")
        .or_else(|| extension("employment_type"))
        .unwrap_or("Not specified");

    let apply_url = apply_url(job, data);

    JobListing {
        title: text("title").unwrap_or("Unknown Title").to_string(),
        company: text("company_name").unwrap_or("Unknown Company").to_string(),
        location: text("location").unwrap_or("Unknown Location").to_string(),
        description: description.to_string(),
        url: apply_url.clone(),
        apply_url,
        date_posted: extension("posted_at").unwrap_or("Recent").to_string(),
        platform: text("via").unwrap_or("Unknown").to_string(),
        job_type: job_type.to_string(),
        is_real_job: true,
        interview_customization: None,
        date_saved: None,
    }
}

fn apply_url(job: &Value, data: &Value) -> Option<String> {
    let link_of = |v: &Value| v.get("link").and_then(Value::as_str).map(str::to_string);

    if let Some(link) = job.get("apply_link").and_then(link_of) {
        return Some(link);
    }
    if let Some(link) = job
        .get("apply_options")
        .and_then(Value::as_array)
        .and_then(|options| options.first())
        .and_then(link_of)
    {
        return Some(link);
    }

    let job_id = job.get("job_id").and_then(Value::as_str)?;

    let related = data
        .get("related_links")
        .and_then(Value::as_array)
        .and_then(|links| {
            links.iter().find(|link| {
                link.get("text")
                    .and_then(Value::as_str)
                    .map_or(false, |t| t.to_lowercase().contains("apply"))
            })
        })
        .and_then(link_of);

    related.or_else(|| Some(format!("https://www.google.com/search?q={}", job_id)))
}
