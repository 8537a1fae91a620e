//! LLM integration module

pub mod advisor;
pub mod client;
pub mod interview;
pub mod prompts;

pub use advisor::{MatchAnalysis, ResumeAdvisor};
pub use client::OpenAiClient;
pub use interview::{InterviewCoach, InterviewQuestion};
