//! Interview question generation

use crate::config::Config;
use crate::error::Result;
use crate::extraction::{Completer, ResumeRecord};
use crate::jobs::JobListing;
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::client::{strip_json_fences, OpenAiClient};
use super::prompts;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_answer: Option<String>,
}

impl InterviewQuestion {
    fn with_tips(question: &str, tips: &str) -> Self {
        Self {
            question: question.to_string(),
            tips: Some(tips.to_string()),
            ..Default::default()
        }
    }
}

pub struct InterviewCoach {
    completer: Option<Arc<dyn Completer>>,
    array_regex: Regex,
    block_split_regex: Regex,
    question_regex: Regex,
    context_regex: Regex,
    tips_regex: Regex,
    answer_regex: Regex,
}

impl InterviewCoach {
    pub fn new(completer: Option<Arc<dyn Completer>>) -> Self {
        let field = |name: &str| {
            Regex::new(&format!(r#"(?is)["']?{}["']?\s*:\s*["'](.+?)["']"#, name))
                .expect("Invalid interview field regex")
        };

        Self {
            completer,
            array_regex: Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("Invalid JSON array regex"),
            block_split_regex: Regex::new(r"\n\s*\d+\.").expect("Invalid block split regex"),
            question_regex: field("question"),
            context_regex: field("context"),
            tips_regex: field("tips"),
            answer_regex: field("suggested_answer"),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let completer = OpenAiClient::from_config(config)?.map(|c| Arc::new(c) as Arc<dyn Completer>);
        Ok(Self::new(completer))
    }

    pub async fn generate_questions(
        &self,
        job: &JobListing,
        record: Option<&ResumeRecord>,
        count: usize,
    ) -> Vec<InterviewQuestion> {
        let Some(completer) = &self.completer else {
            return fallback_questions(&job.title, count);
        };

        let skills = record.map(|r| r.skills.as_slice()).unwrap_or(&[]);
        let prompt = prompts::render_interview(job, skills, count, job.interview_customization.as_deref());

        match completer.complete(prompts::INTERVIEW_SYSTEM, &prompt).await {
            Ok(answer) => self.parse_questions(&answer),
            Err(e) => {
                warn!("Interview question generation failed, using defaults: {}", e);
                fallback_questions(&job.title, count)
            }
        }
    }

    /// Best-effort parse of a model answer into questions.
    ///
    /// Tries the whole answer as a JSON array, then the first embedded array,
    /// then numbered blocks with `question: "..."` style fields, and finally
    /// keeps the whole answer as a single question.
    pub fn parse_questions(&self, answer: &str) -> Vec<InterviewQuestion> {
        let answer = strip_json_fences(answer);

        if let Ok(questions) = serde_json::from_str::<Vec<InterviewQuestion>>(answer) {
            return questions;
        }

        if let Some(m) = self.array_regex.find(answer) {
            if let Ok(questions) = serde_json::from_str::<Vec<InterviewQuestion>>(m.as_str()) {
                return questions;
            }
        }

        debug!("Interview answer is not JSON, parsing numbered blocks");
        let questions = self.parse_blocks(answer);
        if questions.is_empty() {
            vec![InterviewQuestion {
                question: answer.trim().to_string(),
                ..Default::default()
            }]
        } else {
            questions
        }
    }

    fn parse_blocks(&self, answer: &str) -> Vec<InterviewQuestion> {
        let mut blocks: Vec<&str> = self.block_split_regex.split(answer).collect();

        // Leading text before "1." is an introduction unless it already holds a question object
        if blocks.len() > 1 && !blocks[0].trim_start().starts_with('{') {
            blocks.remove(0);
        }

        let capture = |regex: &Regex, block: &str| {
            regex
                .captures(block)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
        };

        blocks
            .into_iter()
            .filter(|block| !block.trim().is_empty())
            .map(|block| InterviewQuestion {
                question: capture(&self.question_regex, block).unwrap_or_else(|| block.trim().to_string()),
                context: capture(&self.context_regex, block),
                tips: capture(&self.tips_regex, block),
                suggested_answer: capture(&self.answer_regex, block),
            })
            .collect()
    }
}

/// Five general questions plus five chosen from the job title, truncated to `count`.
pub fn fallback_questions(job_title: &str, count: usize) -> Vec<InterviewQuestion> {
    let title = job_title.to_lowercase();

    let mut questions = vec![
        InterviewQuestion::with_tips(
            "Tell me about yourself and your experience.",
            "Keep it professional and relevant to the role.",
        ),
        InterviewQuestion::with_tips(
            "Why are you interested in this position?",
            "Research the company and connect the role to your career goals.",
        ),
        InterviewQuestion::with_tips(
            "What are your strengths and weaknesses?",
            "Be honest about weaknesses but focus on how you're addressing them.",
        ),
        InterviewQuestion::with_tips(
            "Describe a challenging situation you faced in your previous role and how you handled it.",
            "Use the STAR method: Situation, Task, Action, Result.",
        ),
        InterviewQuestion::with_tips(
            "Where do you see yourself in 5 years?",
            "Show ambition while being realistic about career progression.",
        ),
    ];

    let role_specific: &[(&str, &str)] = if title.contains("developer") || title.contains("engineer") {
        &[
            ("Can you describe your experience with modern development tools and practices?", "Mention version control, CI/CD, code review, and testing practices."),
            ("How do you keep your technical skills current?", "Discuss learning resources, side projects, or communities you're part of."),
            ("Describe a complex technical problem you solved recently.", "Explain your thought process and the steps you took to solve it."),
            ("How do you approach debugging a complex issue?", "Describe your systematic approach to problem solving."),
            ("How do you ensure code quality in your projects?", "Mention testing, code reviews, and adherence to standards."),
        ]
    } else if title.contains("data") || title.contains("analyst") {
        &[
            ("Describe a complex data analysis you performed and the insights you derived.", "Focus on the business impact of your analysis."),
            ("Which data visualization tools are you comfortable using?", "Mention specific tools and how you've used them effectively."),
            ("How do you ensure the accuracy of your data analysis?", "Discuss data validation techniques and quality checks."),
            ("How do you explain complex data insights to non-technical stakeholders?", "Emphasize translating technical concepts for a business audience."),
            ("Describe your experience with SQL and database querying.", "Provide specific examples of complex queries you've written."),
        ]
    } else if title.contains("manager") || title.contains("lead") {
        &[
            ("How do you motivate team members?", "Discuss your leadership style and specific motivation strategies."),
            ("Describe how you handle conflicts within your team.", "Provide a specific example using the STAR method."),
            ("How do you prioritize tasks when managing multiple projects?", "Explain your project management approach and prioritization criteria."),
            ("Tell me about a time when you had to make a difficult decision as a leader.", "Focus on your decision-making process and the outcome."),
            ("How do you provide feedback to team members?", "Discuss both positive feedback and constructive criticism approaches."),
        ]
    } else {
        &[
            ("How do you prioritize your work when dealing with multiple deadlines?", "Explain your time management strategies and how you handle pressure."),
            ("Describe a situation where you had to adapt to a significant change at work.", "Show your flexibility and resilience when facing change."),
            ("How do you approach working in a team versus working independently?", "Demonstrate your ability to collaborate and work autonomously as needed."),
            ("Tell me about a time when you went above and beyond in your role.", "Highlight your work ethic and commitment to excellence."),
            ("How do you handle feedback or criticism?", "Show that you're open to growth and can turn feedback into improvement."),
        ]
    };

    questions.extend(
        role_specific
            .iter()
            .map(|(question, tips)| InterviewQuestion::with_tips(question, tips)),
    );
    questions.truncate(count);
    questions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coach() -> InterviewCoach {
        InterviewCoach::new(None)
    }

    #[test]
    fn test_parse_plain_json_array() {
        let answer = r#"[{"question": "What is ownership?", "tips": "Mention borrowing"}]"#;
        let questions = coach().parse_questions(answer);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "What is ownership?");
        assert_eq!(questions[0].tips.as_deref(), Some("Mention borrowing"));
        assert!(questions[0].context.is_none());
    }

    #[test]
    fn test_parse_embedded_array() {
        let answer = "Here are your questions:\n[\n  {\"question\": \"Q1\"},\n  {\"question\": \"Q2\", \"context\": \"C2\"}\n]\nGood luck!";
        let questions = coach().parse_questions(answer);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].context.as_deref(), Some("C2"));
    }

    #[test]
    fn test_parse_numbered_blocks() {
        let answer = "Sure, here you go:\n1. question: \"How do you test async code?\" tips: \"Use a runtime\"\n2. Describe a production incident.";
        let questions = coach().parse_questions(answer);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "How do you test async code?");
        assert_eq!(questions[0].tips.as_deref(), Some("Use a runtime"));
        assert_eq!(questions[1].question, "Describe a production incident.");
    }

    #[test]
    fn test_unstructured_answer_is_single_question() {
        let questions = coach().parse_questions("Tell me about a time you failed.");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Tell me about a time you failed.");
    }

    #[test]
    fn test_fallback_by_role() {
        let engineer = fallback_questions("Senior Software Engineer", 10);
        assert_eq!(engineer.len(), 10);
        assert!(engineer[9].question.contains("code quality"));

        let analyst = fallback_questions("Data Analyst", 10);
        assert!(analyst[9].question.contains("SQL"));

        let manager = fallback_questions("Product Manager", 10);
        assert!(manager[9].question.contains("feedback to team members"));

        let general = fallback_questions("Barista", 7);
        assert_eq!(general.len(), 7);
        assert!(general[5].question.contains("multiple deadlines"));
    }

    #[tokio::test]
    async fn test_generate_without_model_uses_fallback() {
        let job = JobListing::from_description("Backend Developer", "Initech", "Rust");
        let questions = coach().generate_questions(&job, None, 3).await;
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].question, "Tell me about yourself and your experience.");
    }
}
