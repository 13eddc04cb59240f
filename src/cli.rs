//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// wordfreq - rank the most frequent words in a block of text
///
/// Runs either as a one-shot analyzer or as a bus listener answering
/// `word.frequency` requests.
///
/// Examples:
///   wordfreq --text "the quick brown fox" --top-n 3
///   wordfreq --file notes.txt --format json
///   cat notes.txt | wordfreq -n 5
///   wordfreq --serve --listen 0.0.0.0:7878
///   wordfreq --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Text to analyze
    #[arg(short, long, value_name = "TEXT", conflicts_with = "file")]
    pub text: Option<String>,

    /// File to analyze
    ///
    /// When neither --text nor --file is given, text is read from stdin.
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Number of ranked words to return
    ///
    /// Must be positive. Default: from config or 10.
    #[arg(short = 'n', long, value_name = "COUNT", allow_negative_numbers = true)]
    pub top_n: Option<i64>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Run as a bus listener instead of analyzing once
    #[arg(long, conflicts_with_all = ["text", "file", "output"])]
    pub serve: bool,

    /// Address for the bus listener
    #[arg(long, value_name = "ADDR", env = "WORDFREQ_LISTEN")]
    pub listen: Option<String>,

    /// Subject the frequency handler subscribes to
    #[arg(long, value_name = "SUBJECT")]
    pub subject: Option<String>,

    /// Largest accepted envelope in bytes
    #[arg(long, value_name = "BYTES")]
    pub max_message_bytes: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .wordfreq.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .wordfreq.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for one-shot results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown table (default)
    #[default]
    Markdown,
    /// JSON, same shape as the bus response payload
    Json,
}

/// Where one-shot text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Text(String),
    File(PathBuf),
    Stdin,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.max_message_bytes == Some(0) {
            return Err("Max message bytes must be at least 1".to_string());
        }

        if let Some(ref subject) = self.subject {
            crate::bus::router::validate_subject(subject).map_err(|e| e.to_string())?;
        }

        // Validate input file if provided
        if let Some(ref path) = self.file {
            if !path.is_file() {
                return Err(format!("Input file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Returns where the text to analyze comes from.
    pub fn input_source(&self) -> InputSource {
        match (&self.text, &self.file) {
            (Some(text), _) => InputSource::Text(text.clone()),
            (None, Some(path)) => InputSource::File(path.clone()),
            (None, None) => InputSource::Stdin,
        }
    }
}
