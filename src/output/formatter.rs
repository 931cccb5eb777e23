//! Output formatters: console, JSON and Markdown renderings of an analysis

use crate::config::OutputFormat;
use crate::error::{MatcherError, Result};
use crate::orchestrator::AnalysisOutcome;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering an analysis outcome
pub trait OutputFormatter {
    fn format_report(&self, outcome: &AnalysisOutcome) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colored score badge and keyword lists
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter exposing the analysis result surface
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that dispatches to the formatter for each format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn score_badge(score: u8) -> (&'static str, Color) {
    match score {
        75..=100 => ("STRONG", Color::Green),
        50..=74 => ("FAIR", Color::Yellow),
        _ => ("WEAK", Color::Red),
    }
}

fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{}\n", title.color(Color::Blue).bold())
        } else {
            format!("\n{}\n", title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = score_badge(score);
        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_keywords(&self, keywords: &[String], color: Color) -> String {
        if keywords.is_empty() {
            return "  (none)\n".to_string();
        }
        keywords
            .iter()
            .map(|k| format!("  • {}\n", self.colorize(k, color)))
            .collect()
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, outcome: &AnalysisOutcome) -> Result<String> {
        let result = &outcome.result;
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME MATCH ANALYSIS"));
        output.push_str(&format!("Generated: {} | Mode: {}\n", timestamp(), outcome.mode));

        if let Some(reason) = &outcome.fallback_reason {
            output.push_str(&self.colorize(
                &format!("Note: remote analysis unavailable, local score shown ({})\n", reason),
                Color::Yellow,
            ));
        }

        output.push_str(&format!(
            "\nMatch Score: {}% {}\n",
            result.score(),
            self.format_score_badge(result.score())
        ));

        output.push_str(&self.format_header("Matching Keywords"));
        output.push_str(&self.format_keywords(result.matching_keywords(), Color::Green));

        output.push_str(&self.format_header("Missing Keywords"));
        output.push_str(&self.format_keywords(result.missing_keywords(), Color::Red));

        if !result.suggestions().is_empty() {
            output.push_str(&self.format_header("Suggestions"));
            output.push_str(&format!("{}\n", self.colorize(result.suggestions(), Color::Cyan)));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, outcome: &AnalysisOutcome) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(&outcome.result)?)
        } else {
            Ok(serde_json::to_string(&outcome.result)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_list(keywords: &[String]) -> String {
        if keywords.is_empty() {
            return "_None_\n".to_string();
        }
        keywords.iter().map(|k| format!("- `{}`\n", k)).collect()
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, outcome: &AnalysisOutcome) -> Result<String> {
        let result = &outcome.result;
        let mut output = String::new();

        output.push_str("# Resume Match Analysis\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Mode:** {}\n\n",
                timestamp(),
                outcome.mode
            ));
        }
        if let Some(reason) = &outcome.fallback_reason {
            output.push_str(&format!(
                "> Remote analysis unavailable, local score shown: {}\n\n",
                reason
            ));
        }

        let (badge, _) = score_badge(result.score());
        output.push_str(&format!("**Match Score:** {}% ({})\n\n", result.score(), badge));

        output.push_str("## Matching Keywords\n\n");
        output.push_str(&Self::markdown_list(result.matching_keywords()));

        output.push_str("\n## Missing Keywords\n\n");
        output.push_str(&Self::markdown_list(result.missing_keywords()));

        if !result.suggestions().is_empty() {
            output.push_str("\n## Suggestions\n\n");
            output.push_str(result.suggestions());
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new(use_colors: bool) -> Self {
        Self::with_options(use_colors, true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, outcome: &AnalysisOutcome, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(outcome),
            OutputFormat::Json => self.json_formatter.format_report(outcome),
            OutputFormat::Markdown => self.markdown_formatter.format_report(outcome),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content).map_err(|e| {
        MatcherError::OutputFormatting(format!("Cannot write {}: {}", file_path.display(), e))
    })
}

/// The format a saved report should use, judged by its extension.
pub fn format_for_path(path: &Path) -> Option<OutputFormat> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "json" => Some(OutputFormat::Json),
        "md" | "markdown" => Some(OutputFormat::Markdown),
        "txt" => Some(OutputFormat::Console),
        _ => None,
    }
}
