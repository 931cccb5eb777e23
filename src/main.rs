//! Resume matcher: ATS-style resume and job description scoring

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};
use resume_matcher::cli::{self, Cli, Commands, ConfigAction};
use resume_matcher::input::{self, extractor_for};
use resume_matcher::llm::{RemoteAnalysisClient, RetryPolicy};
use resume_matcher::output::formatter::format_for_path;
use resume_matcher::output::{save_report_to_file, ReportGenerator};
use resume_matcher::{AnalysisMode, AnalysisPipeline, Config, MatcherError, Orchestrator};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {:#}", e);
        process::exit(exit_code(&e));
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::load().context("loading default configuration")?,
    };
    config.apply_env_overrides();
    Ok(config)
}

/// 2 for bad input, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<MatcherError>() {
        Some(MatcherError::InvalidInput(_)) => 2,
        _ => 1,
    }
}

async fn run_command(
    command: Commands,
    config: Config,
    config_override: Option<PathBuf>,
) -> anyhow::Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            job_text,
            mode,
            no_fallback,
            retries,
            output,
            save,
        } => {
            let output_format = match output {
                Some(format) => {
                    cli::parse_output_format(&format).map_err(MatcherError::InvalidInput)?
                }
                None => config.output.format,
            };
            let mode = match mode {
                Some(mode) => cli::parse_mode(&mode).map_err(MatcherError::InvalidInput)?,
                None => config.analysis.default_mode,
            };

            cli::validate_file_extension(&resume, &["pdf", "txt", "md", "markdown"])
                .map_err(|e| MatcherError::InvalidInput(format!("Resume file: {}", e)))?;

            let job_description = match (job, job_text) {
                (Some(path), _) => input::read_job_description(&path).await?,
                (None, Some(text)) => text,
                (None, None) => {
                    return Err(MatcherError::InvalidInput(
                        "either --job or --job-text is required".to_string(),
                    )
                    .into())
                }
            };

            info!("Analyzing {} in {} mode", resume.display(), mode);
            let document = input::read_document(&resume).await?;

            let mut pipeline = AnalysisPipeline::new(extractor_for(document.file_type)?)
                .with_max_missing_keywords(config.analysis.max_missing_keywords);

            if config.remote.has_api_key() {
                pipeline = pipeline.with_remote(RemoteAnalysisClient::new(&config.remote)?);
            } else if mode == AnalysisMode::Remote {
                warn!("No API key configured; remote analysis is unavailable");
            }

            let retry = RetryPolicy::new(
                retries.unwrap_or(config.remote.max_retries),
                Duration::from_millis(config.remote.initial_backoff_ms),
            );
            let fallback = config.analysis.fallback_to_local && !no_fallback;
            let orchestrator = Orchestrator::new(pipeline, retry, fallback);

            let outcome = orchestrator
                .analyze(&document.bytes, &job_description, mode)
                .await?;

            let generator = ReportGenerator::new(config.output.color_output);
            println!("{}", generator.generate_report(&outcome, output_format)?);

            if let Some(save_path) = save {
                let save_format = format_for_path(&save_path).unwrap_or(output_format);
                let content = ReportGenerator::new(false).generate_report(&outcome, save_format)?;
                save_report_to_file(&content, &save_path)?;
                info!("Report saved to {}", save_path.display());
            }
        }

        Commands::Config { action } => {
            let path = config_override.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("# {}", path.display());
                    println!("{}", config.to_display_toml()?);
                }

                Some(ConfigAction::Reset) => {
                    Config::default()
                        .save_to(&path)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Configuration reset: {}", path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}
