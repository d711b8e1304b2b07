//! Command-line argument parsing for docqa
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::document::DocumentFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docqa - ask questions about a document
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(version)]
#[command(about = "Ask questions about a txt, pdf or json document", long_about = None)]
pub struct Args {
    /// Document to load
    #[arg(value_name = "DOCUMENT")]
    pub document: Option<PathBuf>,

    /// Document format (detected from the extension by default)
    #[arg(short, long, value_enum)]
    pub format: Option<DocumentFormat>,

    /// Ask one question and exit instead of starting the prompt loop
    #[arg(short = 'Q', long)]
    pub question: Option<String>,

    /// Similarity threshold override
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Encoder model id or local directory override
    #[arg(long)]
    pub model_id: Option<String>,

    /// Chat model override
    #[arg(long)]
    pub llm_model: Option<String>,

    /// Print the retrieved context instead of calling the LLM
    #[arg(long)]
    pub retrieve_only: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except answers)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Check that a document is given exactly when no subcommand is
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_none() && self.document.is_none() {
            return Err("Document required. Use 'docqa <DOCUMENT>' or run a subcommand.".to_string());
        }

        if self.command.is_some() && self.document.is_some() {
            return Err("Cannot specify a document with a subcommand.".to_string());
        }

        if let Some(question) = &self.question {
            if question.trim().is_empty() {
                return Err("--question must not be empty.".to_string());
            }
        }

        Ok(())
    }

    /// Explicit format, or the one implied by the file extension
    pub fn document_format(&self) -> crate::errors::Result<Option<DocumentFormat>> {
        match (self.format, &self.document) {
            (Some(format), _) => Ok(Some(format)),
            (None, Some(path)) => DocumentFormat::from_path(path).map(Some),
            (None, None) => Ok(None),
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Parse the names used in the config file
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "very_verbose" => Some(Verbosity::VeryVerbose),
            _ => None,
        }
    }

    /// Check if should show spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show retrieval details and the session summary
    pub fn show_details(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }

    /// Default tracing filter directive
    pub fn log_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }
}
