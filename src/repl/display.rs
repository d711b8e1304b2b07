//! Terminal output for the question prompt

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::document::Document;
use crate::retrieval::ScoredDocument;

/// Color-coded terminal output
pub struct DisplayManager {
    show_progress: bool,
}

impl DisplayManager {
    pub fn new(show_progress: bool) -> Self {
        DisplayManager { show_progress }
    }

    /// Show welcome banner
    pub fn show_banner(&self, document: &str, model: &str) {
        let width = 64;
        println!("\n{}", "=".repeat(width).cyan());
        println!("{}", format!("  docqa {}", env!("CARGO_PKG_VERSION")).bold().cyan());
        println!("{}", format!("  Document: {} | Encoder: {}", document, model).dimmed());
        println!("{}\n", "=".repeat(width).cyan());
        println!(
            "Ask a question about the document (or {} for commands, {} to quit)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    pub fn show_help(&self) {
        println!("{}", "Commands:".bold());
        println!("  {}  show the context retrieved for the last question", "/context".green());
        println!("  {}     show this help", "/help".green());
        println!("  {}     quit", "/exit".green());
    }

    /// Spinner for slow steps; hidden when progress is disabled
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn show_answer(&self, answer: &str) {
        println!("{} {}\n", "Answer:".bold().green(), answer);
    }

    /// Print retrieved documents, or note that there were none
    pub fn show_context(&self, context: &[Document]) {
        if context.is_empty() {
            println!("{}", "No document passed the similarity threshold.".yellow());
            return;
        }
        for (i, doc) in context.iter().enumerate() {
            println!("{} {}", format!("[{}]", i + 1).cyan(), preview(doc.text(), 400));
        }
        println!();
    }

    /// Per-document similarity report
    pub fn show_scores(&self, scored: &[ScoredDocument], threshold: f32) {
        for doc in scored {
            let score = match doc.similarity {
                Some(s) => format!("{:.4}", s),
                None => "undefined".to_string(),
            };
            let marker = if doc.passes(threshold) {
                "kept".green()
            } else {
                "dropped".red()
            };
            println!(
                "  #{} similarity {} ({}) {}",
                doc.index,
                score,
                marker,
                preview(doc.document.text(), 60).dimmed()
            );
        }
    }

    pub fn show_error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }
}

/// First `max_chars` characters on one line
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}
