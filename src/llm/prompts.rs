//! Prompt templates for retrieval questions, resume feedback, job matching and interview prep

use crate::extraction::ResumeRecord;
use crate::jobs::JobListing;

pub const RETRIEVAL_SYSTEM: &str =
    "You extract facts from resumes. Answer only from the provided context.";

pub const ADVISOR_SYSTEM: &str =
    "You are an experienced career coach and technical recruiter who gives specific, actionable resume advice.";

pub const MATCH_SYSTEM: &str =
    "You compare resumes against job descriptions and respond with valid JSON only.";

pub const INTERVIEW_SYSTEM: &str =
    "You are an interview coach. Respond with a JSON array of question objects.";

pub const SKILLS_QUESTION: &str = "What are all the technical skills, programming languages, and tools mentioned in this resume? List only the names of the skills without explanations.";

pub const EDUCATION_QUESTION: &str = "Extract all education details including institutions, degrees, majors, and graduation dates from this resume.";

pub const EXPERIENCE_QUESTION: &str = "Extract all work experience details including company names, job titles, dates, and key responsibilities from this resume.";

const RETRIEVAL_TEMPLATE: &str = r#"Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.

{context}

Question: {question}
Helpful Answer:"#;

const RESUME_ANALYSIS_TEMPLATE: &str = r#"Analyze this resume information and provide specific, actionable suggestions for improvement to make it more competitive in the job market.

=== RESUME DATA ===

Skills: {skills}

Education:
{education}

Experience:
{experience}

=== ANALYSIS INSTRUCTIONS ===

Provide a comprehensive analysis with the following clearly labeled sections:

1. OVERALL ASSESSMENT
- Strengths: Identify 3-5 strong aspects of the resume
- Weaknesses: Point out 2-4 areas that need improvement
- Industry fit: Suggest 2-3 suitable industry sectors or job roles

2. CONTENT IMPROVEMENTS
- Achievements: Show how to quantify results with 2-3 reworded examples
- Skills presentation: Advise on organizing technical skills
- Missing skills: Identify critical skills missing for the experience described

3. FORMAT SUGGESTIONS
- Structure, length and readability

4. ATS OPTIMIZATION
- Keywords: Suggest 5-7 additional keywords
- Formatting pitfalls that could harm ATS parsing

Be specific and provide concrete examples where possible."#;

const JOB_MATCH_TEMPLATE: &str = r#"Analyze how well this resume matches the job description.

=== RESUME DATA ===
Skills: {skills}

Experience:
{experience}

=== JOB DATA ===
Title: {title}

Description:
{description}

=== ANALYSIS INSTRUCTIONS ===

1. MATCH SCORE: a percentage match (0-100) against the job requirements.
2. KEY MATCHES: 3-5 skills or experiences that align with the job.
3. GAPS: 2-4 requirements not clearly demonstrated in the resume.
4. RECOMMENDATIONS: 3-5 specific actions to better position the candidate.

Respond with JSON in exactly this structure:
{
    "match_score": 85,
    "key_matches": ["match1", "match2"],
    "gaps": ["gap1", "gap2"],
    "recommendations": ["rec1", "rec2"]
}"#;

const INTERVIEW_TEMPLATE: &str = r#"Generate {count} interview questions for the following job:

Job Title: {title}
Company: {company}

Job Description:
{description}

{customization}

Candidate Skills: {skills}

Include a mix of technical, behavioral, problem-solving and job-specific knowledge questions.

Format each question as a JSON object:
{
    "question": "The actual interview question",
    "context": "Why this question is asked and what it's testing",
    "tips": "How to approach answering this question",
    "suggested_answer": "An example or structure for an effective answer"
}

Return the questions as a JSON array of these objects."#;

pub fn render_retrieval_prompt(context: &str, question: &str) -> String {
    RETRIEVAL_TEMPLATE
        .replace("{context}", context)
        .replace("{question}", question)
}

pub fn render_resume_analysis(record: &ResumeRecord) -> String {
    RESUME_ANALYSIS_TEMPLATE
        .replace("{skills}", &record.skills.join(", "))
        .replace("{education}", &bullet_list(&record.education))
        .replace("{experience}", &bullet_list(&record.experience))
}

pub fn render_job_match(record: &ResumeRecord, job: &JobListing) -> String {
    JOB_MATCH_TEMPLATE
        .replace("{skills}", &record.skills.join(", "))
        .replace("{experience}", &bullet_list(&record.experience))
        .replace("{title}", &job.title)
        .replace("{description}", &job.description)
}

pub fn render_interview(job: &JobListing, skills: &[String], count: usize, customization: Option<&str>) -> String {
    let skills = if skills.is_empty() {
        "Not provided".to_string()
    } else {
        skills.join(", ")
    };

    INTERVIEW_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{title}", &job.title)
        .replace("{company}", &job.company)
        .replace("{description}", &job.description)
        .replace("{customization}", customization.unwrap_or(""))
        .replace("{skills}", &skills)
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ResumeRecord {
        ResumeRecord {
            skills: vec!["python".to_string(), "aws".to_string()],
            education: vec!["BSc Physics".to_string()],
            experience: vec!["Engineer at Acme Corp".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_retrieval_prompt_contains_context_and_question() {
        let prompt = render_retrieval_prompt("Skills: Rust", SKILLS_QUESTION);
        assert!(prompt.contains("Skills: Rust"));
        assert!(prompt.ends_with("Helpful Answer:"));
        assert!(prompt.contains(SKILLS_QUESTION));
    }

    #[test]
    fn test_resume_analysis_lists_record() {
        let prompt = render_resume_analysis(&record());
        assert!(prompt.contains("Skills: python, aws"));
        assert!(prompt.contains("- BSc Physics"));
        assert!(prompt.contains("- Engineer at Acme Corp"));
        assert!(!prompt.contains("{skills}"));
    }

    #[test]
    fn test_interview_prompt_defaults() {
        let job = JobListing {
            title: "Data Engineer".to_string(),
            company: "Initech".to_string(),
            ..Default::default()
        };
        let prompt = render_interview(&job, &[], 3, None);
        assert!(prompt.starts_with("Generate 3 interview questions"));
        assert!(prompt.contains("Candidate Skills: Not provided"));
        assert!(prompt.contains("Company: Initech"));
    }

    #[test]
    fn test_job_match_prompt_keeps_json_shape() {
        let job = JobListing {
            title: "Backend Engineer".to_string(),
            description: "Python and AWS required".to_string(),
            ..Default::default()
        };
        let prompt = render_job_match(&record(), &job);
        assert!(prompt.contains("\"match_score\": 85"));
        assert!(prompt.contains("Python and AWS required"));
    }
}
