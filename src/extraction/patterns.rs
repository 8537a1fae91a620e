//! Regex and keyword detectors for contact details, education, date ranges and skills

use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;

/// Technology and soft-skill keywords recognised anywhere in a resume.
pub const SKILL_KEYWORDS: &[&str] = &[
    // Technical skills
    "python", "java", "javascript", "react", "angular", "vue", "node.js",
    "sql", "nosql", "mongodb", "mysql", "postgresql", "aws", "azure", "gcp",
    "docker", "kubernetes", "terraform", "ci/cd", "jenkins", "git",
    "machine learning", "deep learning", "nlp", "computer vision", "data science",
    "data analysis", "data visualization", "tableau", "power bi", "excel",
    "tensorflow", "pytorch", "keras", "scikit-learn", "pandas", "numpy",
    "hadoop", "spark", "airflow", "rest api",
    // Cloud and DevOps
    "google cloud", "cloud computing", "serverless", "lambda", "ec2", "s3",
    "dynamodb", "devops", "github actions", "ansible", "puppet", "chef",
    "microservices",
    // Web development
    "html", "css", "typescript", "express", "django", "flask", "spring",
    "asp.net", "php", "laravel", "ruby on rails", "graphql", "responsive design",
    // Databases
    "oracle", "database design", "data modeling", "etl", "data warehousing",
    "redis", "elasticsearch",
    // Soft skills
    "project management", "agile", "scrum", "jira", "confluence",
    "leadership", "team management", "communication", "problem-solving",
    "critical thinking", "teamwork", "time management", "stakeholder management",
];

/// Headings that open the work history section.
pub const EXPERIENCE_HEADINGS: &[&str] = &[
    "work experience",
    "professional experience",
    "employment history",
    "experience",
];

/// Headings that close the work history section.
pub const SECTION_END_HEADINGS: &[&str] = &[
    "education",
    "skills",
    "projects",
    "certifications",
    "references",
];

const MONTH: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

pub struct PatternExtractor {
    email_regex: Regex,
    phone_regex: Regex,
    education_regex: Regex,
    date_range_regex: Regex,
    experience_heading_regex: Regex,
    section_end_regex: Regex,
    skill_matcher: AhoCorasick,
}

/// Everything the fixed patterns found in one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternMatches {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub education: Vec<String>,
    pub experience_blocks: Vec<String>,
    pub skills: Vec<String>,
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternExtractor {
    pub fn new() -> Self {
        let email_regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("Invalid email regex");

        let phone_regex = Regex::new(r"(?:\+\d{1,2}\s?)?(?:\(\d{3}\)|\b\d{3})[\s.-]?\d{3}[\s.-]?\d{4}\b")
            .expect("Invalid phone regex");

        let education_regex = Regex::new(concat!(
            r"(?:Bachelor|Master|PhD|B\.S\.|M\.S\.|M\.B\.A\.|B\.A\.|B\.Sc\.|M\.Sc\.|B\.Tech|M\.Tech)(?:'s)?[ \t]+(?:of|in)[ \t]+[A-Za-z \t]+",
            r"|(?:[A-Z][A-Za-z&'-]*[ \t]+){0,4}(?:University|College|Institute)(?:[ \t]+of[ \t]+[A-Z][A-Za-z]*(?:[ \t]+[A-Z][A-Za-z]*)*)?",
        ))
        .expect("Invalid education regex");

        let point = format!(r"(?:(?:{m})\.?\s+\d{{4}}|\d{{1,2}}/\d{{2,4}}|(?:{m})|\d{{4}})", m = MONTH);
        let date_range_regex = Regex::new(&format!(
            r"(?i)\b{point}(?:\s+to\s+|\s*[-–]\s*)(?:{point}|present|current|now)\b",
            point = point
        ))
        .expect("Invalid date range regex");

        let experience_heading_regex = Regex::new(&format!(
            r"(?im)^[ \t]*(?:{})\b",
            EXPERIENCE_HEADINGS.join("|")
        ))
        .expect("Invalid experience heading regex");

        let section_end_regex = Regex::new(&format!(
            r"(?im)^[ \t]*(?:{})\b",
            SECTION_END_HEADINGS.join("|")
        ))
        .expect("Invalid section heading regex");

        let skill_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(SKILL_KEYWORDS)
            .expect("Invalid skill keyword set");

        Self {
            email_regex,
            phone_regex,
            education_regex,
            date_range_regex,
            experience_heading_regex,
            section_end_regex,
            skill_matcher,
        }
    }

    /// Run every detector over the text
    pub fn extract(&self, text: &str) -> PatternMatches {
        PatternMatches {
            email: self.find_email(text),
            phone: self.find_phone(text),
            education: self.find_education(text),
            experience_blocks: self.find_experience_blocks(text),
            skills: self.find_skills(text),
        }
    }

    pub fn find_email(&self, text: &str) -> Option<String> {
        self.email_regex.find(text).map(|m| m.as_str().to_string())
    }

    pub fn find_phone(&self, text: &str) -> Option<String> {
        self.phone_regex.find(text).map(|m| m.as_str().to_string())
    }

    pub fn find_education(&self, text: &str) -> Vec<String> {
        self.education_regex
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Split the experience section into job blocks delimited by date ranges.
    ///
    /// Each block starts at a date range and runs to the next one, or to the
    /// end of the section for the last range. No section, no blocks.
    pub fn find_experience_blocks(&self, text: &str) -> Vec<String> {
        let Some((start, end)) = self.locate_experience_section(text) else {
            return Vec::new();
        };
        let section = &text[start..end];

        let starts: Vec<usize> = self
            .date_range_regex
            .find_iter(section)
            .map(|m| m.start())
            .collect();

        starts
            .iter()
            .enumerate()
            .map(|(i, &block_start)| {
                let block_end = starts.get(i + 1).copied().unwrap_or(section.len());
                section[block_start..block_end].trim().to_string()
            })
            .filter(|block| !block.is_empty())
            .collect()
    }

    /// Byte range of the experience section, heading included.
    pub fn locate_experience_section(&self, text: &str) -> Option<(usize, usize)> {
        // ASCII lowering keeps byte offsets valid for slicing the original
        let lower = text.to_ascii_lowercase();

        let (start, heading_end) = match self.experience_heading_regex.find(text) {
            Some(m) => (m.start() + (m.as_str().len() - m.as_str().trim_start().len()), m.end()),
            None => earliest_substring(&lower, EXPERIENCE_HEADINGS, 0)?,
        };

        let end = self
            .section_end_regex
            .find_at(text, heading_end)
            .map(|m| m.start())
            .or_else(|| earliest_substring(&lower, SECTION_END_HEADINGS, heading_end).map(|(s, _)| s))
            .unwrap_or(text.len());

        Some((start, end))
    }

    /// Known skill keywords present in the text, in order of first appearance.
    pub fn find_skills(&self, text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();

        for mat in self.skill_matcher.find_overlapping_iter(text) {
            if !is_word_bounded(text, mat.start(), mat.end()) {
                continue;
            }
            let keyword = SKILL_KEYWORDS[mat.pattern().as_usize()];
            if !found.iter().any(|s| s == keyword) {
                found.push(keyword.to_string());
            }
        }

        found
    }
}

/// Earliest occurrence of any needle at or after `from`, as (start, end).
fn earliest_substring(haystack: &str, needles: &[&str], from: usize) -> Option<(usize, usize)> {
    needles
        .iter()
        .filter_map(|needle| {
            haystack
                .get(from..)?
                .find(needle)
                .map(|pos| (from + pos, from + pos + needle.len()))
        })
        .min_by_key(|(start, _)| *start)
}

/// True when the match is not glued to letters or digits on either side.
pub(crate) fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.map_or(false, |c| c.is_alphanumeric()) && !after.map_or(false, |c| c.is_alphanumeric())
}
