//! Saved jobs, one JSON file per listing

use crate::error::{Result, ResumeScoutError};
use chrono::Local;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use super::JobListing;

pub struct JobStore {
    dir: PathBuf,
}

impl JobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            ResumeScoutError::Storage(format!("Cannot create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist a listing stamped with the save time. Returns the file written.
    pub fn save(&self, listing: &JobListing) -> Result<PathBuf> {
        let now = Local::now();
        let mut listing = listing.clone();
        listing.date_saved = Some(now.format("%Y-%m-%d %H:%M:%S").to_string());

        let stem = format!(
            "{}_{}_{}",
            file_safe(&listing.title),
            file_safe(&listing.company),
            now.format("%Y%m%d%H%M%S")
        );

        let mut path = self.dir.join(format!("{}.json", stem));
        let mut suffix = 1;
        while path.exists() {
            path = self.dir.join(format!("{}_{}.json", stem, suffix));
            suffix += 1;
        }

        let content = serde_json::to_string_pretty(&listing)?;
        fs::write(&path, content)?;
        debug!("Saved job to {}", path.display());
        Ok(path)
    }

    /// All readable saved listings, ordered by file name. Unreadable files are skipped.
    pub fn load_all(&self) -> Result<Vec<JobListing>> {
        Ok(self
            .json_files()?
            .into_iter()
            .filter_map(|path| match read_listing(&path) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    warn!("Skipping saved job {}: {}", path.display(), e);
                    None
                }
            })
            .collect())
    }

    /// Delete the first saved listing with this exact title and company.
    pub fn remove(&self, title: &str, company: &str) -> Result<bool> {
        for path in self.json_files()? {
            let listing = match read_listing(&path) {
                Ok(listing) => listing,
                Err(e) => {
                    warn!("Skipping saved job {}: {}", path.display(), e);
                    continue;
                }
            };

            if listing.title == title && listing.company == company {
                fs::remove_file(&path)?;
                debug!("Removed saved job {}", path.display());
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn json_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
            .collect();
        files.sort();
        Ok(files)
    }
}

fn read_listing(path: &Path) -> Result<JobListing> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn file_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
