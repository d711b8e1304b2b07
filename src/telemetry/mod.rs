//! Telemetry for docqa
//!
//! Structured logging through `tracing`, plus a small event collector that
//! feeds the end-of-session summary.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use crate::cli::Verbosity;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins over the verbosity-derived level. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbosity: Verbosity) -> String {
    // Tokenizer and HTTP internals stay quiet below very-verbose.
    match verbosity {
        Verbosity::VeryVerbose => "debug".to_string(),
        other => format!(
            "{},tokenizers=error,hyper=error,reqwest=warn",
            other.log_directive()
        ),
    }
}

/// Telemetry event types
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    DocumentLoaded {
        chars: usize,
        timestamp: Instant,
    },
    ModelLoaded {
        duration_ms: u64,
        timestamp: Instant,
    },
    RetrievalCompleted {
        candidates: usize,
        retrieved: usize,
        duration_ms: u64,
        timestamp: Instant,
    },
    AnswerReceived {
        duration_ms: u64,
        success: bool,
        timestamp: Instant,
    },
}

/// Telemetry statistics
#[derive(Debug, Clone, Default)]
pub struct TelemetryStats {
    pub documents_loaded: usize,
    pub questions_asked: usize,
    pub documents_retrieved: usize,
    pub empty_retrievals: usize,
    pub answers_succeeded: usize,
    pub answers_failed: usize,
    pub retrieval_ms: u64,
    pub model_load_ms: u64,
}

/// Telemetry collector
#[derive(Clone)]
pub struct TelemetryCollector {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
    stats: Arc<Mutex<TelemetryStats>>,
    start_time: Instant,
}

impl TelemetryCollector {
    /// Create a new telemetry collector
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            stats: Arc::new(Mutex::new(TelemetryStats::default())),
            start_time: Instant::now(),
        }
    }

    /// Record an event
    pub fn record(&self, event: TelemetryEvent) {
        if let Ok(mut stats) = self.stats.lock() {
            match &event {
                TelemetryEvent::DocumentLoaded { .. } => {
                    stats.documents_loaded += 1;
                }
                TelemetryEvent::ModelLoaded { duration_ms, .. } => {
                    stats.model_load_ms += duration_ms;
                }
                TelemetryEvent::RetrievalCompleted {
                    retrieved,
                    duration_ms,
                    ..
                } => {
                    stats.questions_asked += 1;
                    stats.documents_retrieved += retrieved;
                    stats.retrieval_ms += duration_ms;
                    if *retrieved == 0 {
                        stats.empty_retrievals += 1;
                    }
                }
                TelemetryEvent::AnswerReceived { success, .. } => {
                    if *success {
                        stats.answers_succeeded += 1;
                    } else {
                        stats.answers_failed += 1;
                    }
                }
            }
        }

        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Get current statistics
    pub fn get_stats(&self) -> TelemetryStats {
        self.stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get event count
    pub fn event_count(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    /// Fraction of questions that got at least one document
    pub fn hit_rate(&self) -> f64 {
        let stats = self.get_stats();
        if stats.questions_asked == 0 {
            0.0
        } else {
            (stats.questions_asked - stats.empty_retrievals) as f64 / stats.questions_asked as f64
        }
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple telemetry display
pub struct TelemetryDisplay {
    collector: TelemetryCollector,
    verbosity: Verbosity,
}

impl TelemetryDisplay {
    /// Create a new display
    pub fn new(collector: TelemetryCollector, verbosity: Verbosity) -> Self {
        Self {
            collector,
            verbosity,
        }
    }

    /// Display summary statistics
    pub fn display_summary(&self) {
        if !self.should_show_details() {
            return;
        }

        let stats = self.collector.get_stats();
        let elapsed = self.collector.elapsed();

        eprintln!("\nSession Summary");
        eprintln!("─────────────────────────────────────");
        eprintln!("Duration:          {:?}", elapsed);
        eprintln!("Model load:        {}ms", stats.model_load_ms);
        eprintln!("Questions:         {}", stats.questions_asked);
        eprintln!("Context hit rate:  {:.1}%", self.collector.hit_rate() * 100.0);
        eprintln!("Retrieval time:    {}ms", stats.retrieval_ms);
        eprintln!("Answers:           {} ok, {} failed", stats.answers_succeeded, stats.answers_failed);
        eprintln!();
    }

    /// Check if should show detailed output
    pub fn should_show_details(&self) -> bool {
        self.verbosity.show_details()
    }
}
