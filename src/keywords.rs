//! Search keywords and job title inference from a parsed resume

use crate::extraction::patterns::is_word_bounded;
use crate::extraction::ResumeRecord;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

const LANGUAGES: &[&str] = &[
    "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "go", "rust",
    "swift", "kotlin", "php", "scala", "perl", "r", "html", "css", "sql",
];

const FRAMEWORKS: &[&str] = &[
    "react", "angular", "vue", "django", "flask", "spring", "express", "rails",
    "laravel", "asp.net", "bootstrap", "jquery", "tensorflow", "pytorch", "keras",
    "scikit-learn", "pandas", "numpy",
];

const PLATFORMS: &[&str] = &[
    "aws", "azure", "gcp", "google cloud", "heroku", "docker", "kubernetes", "jenkins",
    "gitlab", "github", "bitbucket", "linux", "windows", "mac", "ios", "android",
];

const CONCEPTS: &[&str] = &[
    "api", "rest", "graphql", "microservices", "ci/cd", "agile", "scrum", "devops",
    "testing", "unit testing", "integration testing", "git", "version control",
    "database", "nosql", "machine learning", "deep learning", "data science",
    "big data", "blockchain", "cloud", "security", "authentication", "authorization",
];

const JOB_TITLES: &[&str] = &[
    "software engineer", "software developer", "web developer", "frontend developer",
    "backend developer", "full stack developer", "data scientist", "data analyst",
    "machine learning engineer", "devops engineer", "site reliability engineer",
    "cloud engineer", "systems administrator", "database administrator",
    "quality assurance engineer", "qa engineer", "product manager", "project manager",
    "ux designer", "ui designer", "graphic designer", "network engineer",
    "security engineer", "business analyst", "data engineer", "solutions architect",
    "technical lead", "engineering manager", "cto", "cio", "ceo",
];

const RESUME_STOPWORDS: &[&str] = &[
    "resume", "curriculum", "vitae", "cv", "objective", "summary", "experience",
    "education", "skills", "references", "projects", "achievements", "responsibilities",
    "phone", "email", "address", "linkedin", "github", "portfolio", "website",
    "the", "and", "but", "for", "nor", "from", "with", "out", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "not",
    "only", "own", "same", "than", "too", "very", "can", "will", "just", "don",
    "should", "now",
];

/// Skill-based role inference, checked in order.
const ROLE_HINTS: &[(&str, &[&str])] = &[
    (
        "data scientist",
        &["data science", "machine learning", "ai", "artificial intelligence", "deep learning",
          "statistics", "python", "r", "tensorflow", "pytorch"],
    ),
    (
        "frontend developer",
        &["frontend", "front-end", "react", "angular", "vue", "javascript", "html", "css",
          "ui", "ux", "design"],
    ),
    (
        "backend developer",
        &["backend", "back-end", "server", "api", "database", "sql", "nosql", "django",
          "flask", "node", "express", "spring"],
    ),
    (
        "devops engineer",
        &["devops", "aws", "azure", "gcp", "cloud", "docker", "kubernetes", "ci/cd",
          "jenkins", "deployment", "infrastructure"],
    ),
];

const DEFAULT_JOB_TITLE: &str = "software engineer";

pub struct KeywordExtractor {
    stop_words: HashSet<&'static str>,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self {
            stop_words: RESUME_STOPWORDS.iter().copied().collect(),
        }
    }

    /// Up to `max` search keywords: skills first, then technical terms, then
    /// the most frequent remaining words.
    pub fn extract_keywords(&self, record: &ResumeRecord, max: usize) -> Vec<String> {
        let mut all_terms: Vec<String> = record.skills.clone();
        all_terms.extend(self.content_words(&record.experience));
        all_terms.extend(self.content_words(&record.education));

        let combined = all_terms.join(" ").to_lowercase();
        let mut technical_terms: Vec<String> = Vec::new();
        for term in LANGUAGES.iter().chain(FRAMEWORKS).chain(PLATFORMS).chain(CONCEPTS) {
            if contains_term(&combined, term) && !technical_terms.iter().any(|t| t == term) {
                technical_terms.push(term.to_string());
            }
        }
        all_terms.extend(technical_terms.iter().cloned());

        let mut keywords = UniqueKeywords::new(max);
        for candidate in record
            .skills
            .iter()
            .chain(technical_terms.iter())
            .chain(most_common(&all_terms).iter())
        {
            if keywords.push(candidate) {
                break;
            }
        }
        keywords.into_vec()
    }

    /// The longest known job title in the experience text, else a role inferred from skills.
    pub fn extract_job_title(&self, record: &ResumeRecord) -> String {
        let experience = record.experience.join(" ").to_lowercase();

        if let Some(title) = JOB_TITLES
            .iter()
            .filter(|title| contains_term(&experience, title))
            .max_by_key(|title| title.len())
        {
            return title.to_string();
        }

        let skills = record.skills.join(" ").to_lowercase();
        ROLE_HINTS
            .iter()
            .find(|(_, hints)| hints.iter().any(|hint| contains_term(&skills, hint)))
            .map(|(role, _)| role.to_string())
            .unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string())
    }

    fn content_words(&self, fragments: &[String]) -> Vec<String> {
        fragments
            .join(" ")
            .to_lowercase()
            .unicode_words()
            .filter(|word| word.chars().count() > 2 && !self.stop_words.contains(word))
            .map(str::to_string)
            .collect()
    }
}

/// Case-insensitive unique list with a size cap.
struct UniqueKeywords {
    items: Vec<String>,
    seen: HashSet<String>,
    max: usize,
}

impl UniqueKeywords {
    fn new(max: usize) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            max,
        }
    }

    /// Returns true once the cap is reached.
    fn push(&mut self, keyword: &str) -> bool {
        if self.items.len() >= self.max {
            return true;
        }
        if self.seen.insert(keyword.to_lowercase()) {
            self.items.push(keyword.to_string());
        }
        self.items.len() >= self.max
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// Terms by descending frequency; ties keep first-seen order.
fn most_common(terms: &[String]) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for term in terms {
        let count = counts.entry(term.as_str()).or_insert(0);
        if *count == 0 {
            order.push(term.as_str());
        }
        *count += 1;
    }

    order.sort_by_key(|term| std::cmp::Reverse(counts[term]));
    order.into_iter().map(str::to_string).collect()
}

fn contains_term(haystack: &str, term: &str) -> bool {
    haystack
        .match_indices(term)
        .any(|(start, matched)| is_word_bounded(haystack, start, start + matched.len()))
}
