//! Resume scout: resume extraction and AI-assisted job search

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_scout::cli::{self, Cli, Commands, ConfigAction, JobsAction};
use resume_scout::config::{Config, OutputFormat};
use resume_scout::extraction::ParseOutcome;
use resume_scout::input::DocumentLoader;
use resume_scout::jobs::search::{SearchQuery, SerpApiSearcher};
use resume_scout::jobs::storage::JobStore;
use resume_scout::jobs::JobListing;
use resume_scout::keywords::KeywordExtractor;
use resume_scout::llm::{InterviewCoach, ResumeAdvisor};
use resume_scout::output::formatter::{save_output_to_file, OutputRenderer};
use resume_scout::ResumeParser;
use std::path::Path;
use std::process;
use std::time::Duration;

const RESUME_EXTENSIONS: &[&str] = &["pdf", "txt", "text", "md", "markdown"];
const JOB_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown"];
const SEARCH_KEYWORD_COUNT: usize = 10;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration from {}: {}", config_path.display(), e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    let renderer = OutputRenderer::new(config.output.color_output);

    match command {
        Commands::Parse { resume, output, save, no_rag } => {
            let format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(anyhow::Error::msg)?,
                None => config.output.format,
            };

            let mut config = config;
            if no_rag {
                config.extraction.enable_rag = false;
            }

            let outcome = parse_resume(&config, &resume).await?;
            let rendered = renderer.render(&outcome, format)?;

            match save {
                Some(path) => {
                    save_output_to_file(&rendered, &path)
                        .with_context(|| format!("Failed to save output to {}", path.display()))?;
                    println!("✅ Parsed resume saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Keywords { resume, max } => {
            let outcome = parse_resume(&config, &resume).await?;
            let extractor = KeywordExtractor::new();
            let keywords = extractor.extract_keywords(&outcome.record, max);
            let job_title = extractor.extract_job_title(&outcome.record);

            if config.output.format == OutputFormat::Json {
                let value = serde_json::json!({ "job_title": job_title, "keywords": keywords });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", renderer.console().format_keywords(&job_title, &keywords));
            }
        }

        Commands::Feedback { resume, save } => {
            let outcome = parse_resume(&config, &resume).await?;
            let advisor = ResumeAdvisor::from_config(&config)?;
            if !advisor.ai_enabled() {
                warn!("{} not set, showing basic analysis", config.llm.api_key_env);
            }

            let spinner = spinner("Analyzing resume...");
            let feedback = advisor.analyze_resume(&outcome.record).await;
            spinner.finish_and_clear();

            match save {
                Some(path) => {
                    save_output_to_file(&feedback, &path)
                        .with_context(|| format!("Failed to save feedback to {}", path.display()))?;
                    println!("✅ Feedback saved to {}", path.display());
                }
                None => println!("{}", renderer.console().format_feedback(&feedback)),
            }
        }

        Commands::Match { resume, job, title, company, json } => {
            let outcome = parse_resume(&config, &resume).await?;
            let listing = load_job(&job, &title, &company).await?;
            let advisor = ResumeAdvisor::from_config(&config)?;

            let spinner = spinner("Comparing resume with job description...");
            let analysis = advisor.match_job(&outcome.record, &listing).await;
            spinner.finish_and_clear();

            if json || config.output.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                println!("{}", renderer.console().format_match(&listing, &analysis));
            }
        }

        Commands::Interview { job, title, company, resume, focus, count } => {
            let mut listing = load_job(&job, &title, &company).await?;
            listing.interview_customization = focus;

            let record = match resume {
                Some(path) => Some(parse_resume(&config, &path).await?.record),
                None => None,
            };

            let coach = InterviewCoach::from_config(&config)?;
            let spinner = spinner("Generating interview questions...");
            let questions = coach.generate_questions(&listing, record.as_ref(), count).await;
            spinner.finish_and_clear();

            if config.output.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&questions)?);
            } else {
                println!("{}", renderer.console().format_questions(&listing, &questions));
            }
        }

        Commands::Search {
            resume,
            keywords,
            location,
            platform,
            all_platforms,
            count,
            days,
            save,
        } => {
            let keywords = match (keywords, resume) {
                (Some(keywords), _) => keywords,
                (None, Some(path)) => {
                    let outcome = parse_resume(&config, &path).await?;
                    let extractor = KeywordExtractor::new();
                    let keywords = extractor
                        .extract_keywords(&outcome.record, SEARCH_KEYWORD_COUNT)
                        .join(" ");
                    println!(
                        "🔍 Job title: {} | Keywords: {}",
                        extractor.extract_job_title(&outcome.record),
                        keywords
                    );
                    keywords
                }
                (None, None) => bail!("Provide --keywords or --resume to search"),
            };

            let searcher = SerpApiSearcher::from_config(&config)?;
            if !searcher.is_configured() {
                bail!(
                    "Job search needs a SerpApi key in the {} environment variable",
                    config.search.api_key_env
                );
            }

            let query = SearchQuery {
                platform,
                count: count.unwrap_or(config.search.default_count),
                days_ago: days.unwrap_or(config.search.days_ago),
                ..SearchQuery::new(&keywords, &location)
            };

            let spinner = spinner(&format!("Searching for '{}'...", query.query_string()));
            let jobs = if all_platforms {
                searcher.search_platforms(&query, &config.search.platforms).await
            } else {
                searcher.search(&query).await
            };
            spinner.finish_and_clear();

            if config.output.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&jobs)?);
            } else {
                println!("{}", renderer.console().format_jobs("Job Search Results", &jobs));
            }

            if save && !jobs.is_empty() {
                let store = JobStore::new(&config.storage.saved_jobs_dir)?;
                for job in &jobs {
                    store.save(job)?;
                }
                println!("💾 Saved {} jobs to {}", jobs.len(), store.dir().display());
            }
        }

        Commands::Jobs { action } => {
            let store = JobStore::new(&config.storage.saved_jobs_dir)?;
            match action {
                JobsAction::List => {
                    let jobs = store.load_all()?;
                    if config.output.format == OutputFormat::Json {
                        println!("{}", serde_json::to_string_pretty(&jobs)?);
                    } else {
                        println!("{}", renderer.console().format_jobs("Saved Jobs", &jobs));
                    }
                }
                JobsAction::Remove { title, company } => {
                    if store.remove(&title, &company)? {
                        println!("🗑️  Removed '{}' at {}", title, company);
                    } else {
                        println!("⚠️  No saved job '{}' at {}", title, company);
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                println!("LLM API: {} (key from {})", config.llm.api_base, config.llm.api_key_env);
                println!("Chat Model: {}", config.llm.chat_model);
                println!("Embedding Model: {}", config.llm.embedding_model);
                println!(
                    "Retrieval Enhancement: {} (chunks {} / overlap {}, top {})",
                    if config.extraction.enable_rag { "enabled" } else { "disabled" },
                    config.extraction.chunk_size,
                    config.extraction.chunk_overlap,
                    config.extraction.retrieval_top_k
                );
                if let Some(path) = &config.extraction.gazetteer_path {
                    println!("Gazetteer: {}", path.display());
                }
                println!(
                    "Job Search: key from {}, {} results, last {} days",
                    config.search.api_key_env, config.search.default_count, config.search.days_ago
                );
                println!("Platforms: {}", config.search.platforms.join(", "));
                println!("Saved Jobs: {}", config.storage.saved_jobs_dir.display());
                println!("Output Format: {:?}", config.output.format);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => println!("{}", config_path.display()),
        },
    }

    Ok(())
}

async fn parse_resume(config: &Config, path: &Path) -> Result<ParseOutcome> {
    cli::validate_file_extension(path, RESUME_EXTENSIONS)
        .map_err(|e| anyhow::anyhow!("Resume file: {}", e))?;

    let text = DocumentLoader::new()
        .load_text(path)
        .await
        .with_context(|| format!("Failed to read resume {}", path.display()))?;

    let parser = ResumeParser::from_config(config)?;
    let spinner = parser
        .rag_enabled()
        .then(|| spinner("Extracting resume information..."));

    let outcome = parser.parse_with_status(&text).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match outcome {
        Some(outcome) => {
            info!(
                "Extracted {} skills, {} education and {} experience entries",
                outcome.record.skills.len(),
                outcome.record.education.len(),
                outcome.record.experience.len()
            );
            Ok(outcome)
        }
        None => bail!("No text could be extracted from {}", path.display()),
    }
}

async fn load_job(path: &Path, title: &str, company: &str) -> Result<JobListing> {
    cli::validate_file_extension(path, JOB_EXTENSIONS)
        .map_err(|e| anyhow::anyhow!("Job description file: {}", e))?;

    let description = DocumentLoader::new()
        .load_text(path)
        .await
        .with_context(|| format!("Failed to read job description {}", path.display()))?;

    Ok(JobListing::from_description(title, company, &description))
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
