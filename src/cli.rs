//! CLI interface for the resume matcher

use crate::config::OutputFormat;
use crate::pipeline::AnalysisMode;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-matcher")]
#[command(about = "ATS-style resume and job description matcher")]
#[command(long_about = "Score how well a resume matches a job description, using a remote LLM with a local similarity fallback")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match a resume against a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long, required_unless_present = "job_text", conflicts_with = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Analysis mode: remote, local (defaults to the configured mode)
        #[arg(short, long)]
        mode: Option<String>,

        /// Fail instead of falling back to local scoring when remote analysis fails
        #[arg(long)]
        no_fallback: bool,

        /// Retries for transient remote failures
        #[arg(long)]
        retries: Option<u32>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

pub fn parse_mode(mode: &str) -> Result<AnalysisMode, String> {
    mode.parse()
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_with_job_file() {
        let cli = Cli::try_parse_from([
            "resume-matcher",
            "analyze",
            "--resume",
            "cv.pdf",
            "--job",
            "job.md",
            "--mode",
            "local",
            "--no-fallback",
            "--retries",
            "4",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze {
                resume,
                job,
                job_text,
                mode,
                no_fallback,
                retries,
                ..
            } => {
                assert_eq!(resume, PathBuf::from("cv.pdf"));
                assert_eq!(job, Some(PathBuf::from("job.md")));
                assert!(job_text.is_none());
                assert_eq!(mode.as_deref(), Some("local"));
                assert!(no_fallback);
                assert_eq!(retries, Some(4));
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_job_source_required_and_exclusive() {
        assert!(Cli::try_parse_from(["resume-matcher", "analyze", "--resume", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from([
            "resume-matcher",
            "analyze",
            "--resume",
            "cv.pdf",
            "--job",
            "job.md",
            "--job-text",
            "Rust engineer",
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "resume-matcher",
            "analyze",
            "--resume",
            "cv.pdf",
            "--job-text",
            "Rust engineer",
        ])
        .is_ok());
    }

    #[test]
    fn test_config_subcommand() {
        let cli = Cli::try_parse_from(["resume-matcher", "config", "path"]).unwrap();
        match cli.command {
            Commands::Config { action } => assert_eq!(action, Some(ConfigAction::Path)),
            _ => panic!("expected config command"),
        }
    }

    #[test]
    fn test_value_parsers() {
        assert_eq!(parse_output_format("MD").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("html").is_err());
        assert_eq!(parse_mode("Remote").unwrap(), AnalysisMode::Remote);
        assert!(parse_mode("cloud").is_err());
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}
