//! docqa - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use docqa::{
    cli::{Args, Commands, Config, Verbosity},
    document::{load_document, Document},
    embedding::{self, BertEmbedder},
    errors::QaError,
    llm::GroqClient,
    rag::{build_context, QaPipeline},
    repl::{DisplayManager, InputHandler, ReplInput},
    retrieval::Retriever,
    telemetry::{self, TelemetryCollector, TelemetryDisplay, TelemetryEvent},
};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Everything one loaded document needs to answer questions
struct Session {
    retriever: Arc<Retriever<BertEmbedder>>,
    pipeline: Option<QaPipeline<BertEmbedder, GroqClient>>,
    documents: Vec<Document>,
    last_context: Vec<Document>,
    display: DisplayManager,
    telemetry: TelemetryCollector,
    verbosity: Verbosity,
}

impl Session {
    /// Retrieve context for one question and, unless retrieve-only, answer it
    async fn ask(&mut self, question: &str) -> docqa::Result<()> {
        let started = Instant::now();
        let retriever = Arc::clone(&self.retriever);
        let documents = self.documents.clone();
        let owned_question = question.to_string();

        let pb = self.display.spinner("Retrieving context");
        let scored = tokio::task::spawn_blocking(move || retriever.score(&owned_question, &documents))
            .await
            .map_err(|e| QaError::Generic(format!("retrieval task failed: {}", e)))?;
        pb.finish_and_clear();
        let scored = scored?;

        let threshold = self.retriever.threshold();
        if self.verbosity.show_details() {
            self.display.show_scores(&scored, threshold);
        }

        let context: Vec<Document> = scored
            .into_iter()
            .filter(|doc| doc.passes(threshold))
            .map(|doc| doc.document)
            .collect();

        self.telemetry.record(TelemetryEvent::RetrievalCompleted {
            candidates: self.documents.len(),
            retrieved: context.len(),
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: Instant::now(),
        });
        self.last_context = context.clone();

        let Some(pipeline) = &self.pipeline else {
            println!("{}", build_context(&context));
            return Ok(());
        };

        let started = Instant::now();
        let pb = self.display.spinner("Asking the model");
        let result = pipeline.answer_with_context(question, context).await;
        pb.finish_and_clear();

        self.telemetry.record(TelemetryEvent::AnswerReceived {
            duration_ms: started.elapsed().as_millis() as u64,
            success: result.is_ok(),
            timestamp: Instant::now(),
        });

        let answer = result?;
        if answer.used_placeholder {
            tracing::info!("no document passed the threshold; answering without context");
        }
        self.display.show_answer(&answer.text);
        Ok(())
    }

    async fn run_repl(&mut self) -> Result<()> {
        let mut input = match Config::default_path().and_then(|p| p.parent().map(|d| d.join("history"))) {
            Some(path) => InputHandler::with_history(path)?,
            None => InputHandler::new()?,
        };

        loop {
            match input.read()? {
                ReplInput::Exit => break,
                ReplInput::Empty => continue,
                ReplInput::Help => self.display.show_help(),
                ReplInput::Context => self.display.show_context(&self.last_context),
                ReplInput::Question(question) => {
                    if let Err(err) = self.ask(&question).await {
                        self.display.show_error(&format!("Error getting answer: {}", err));
                        if err.is_fatal() {
                            break;
                        }
                    }
                }
            }
        }

        if let Some(parent) = Config::default_path().as_deref().and_then(Path::parent) {
            if let Err(err) = std::fs::create_dir_all(parent) {
                tracing::warn!(error = %err, dir = %parent.display(), "could not create history directory");
            }
        }
        if let Err(err) = input.save_history() {
            tracing::warn!(error = %err, "could not save history");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if let Err(msg) = args.validate() {
        eprintln!("Error: {}", msg);
        std::process::exit(2);
    }

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    config
        .apply_overrides(&args)
        .context("Invalid configuration override")?;

    let verbosity = if args.quiet || args.verbose > 0 {
        args.verbosity()
    } else {
        Verbosity::from_name(&config.telemetry.default_verbosity).unwrap_or(Verbosity::Normal)
    };
    telemetry::init_tracing(verbosity);

    if !config.telemetry.color_output {
        colored::control::set_override(false);
    }

    if let Some(Commands::Config) = args.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let path = args
        .document
        .clone()
        .context("Document required")?;
    let format = args
        .document_format()?
        .context("Could not determine document format")?;

    let display = DisplayManager::new(verbosity.show_progress());
    let telemetry = TelemetryCollector::new();

    let pb = display.spinner(&format!("Loading {}", path.display()));
    let document = load_document(&path, format);
    pb.finish_and_clear();
    let document = document?;
    if document.is_blank() {
        display.show_error("Document has no text; nothing will be retrieved from it.");
    }
    telemetry.record(TelemetryEvent::DocumentLoaded {
        chars: document.text().chars().count(),
        timestamp: Instant::now(),
    });

    // Fail on a missing API key before the slow model load.
    let chat = if args.retrieve_only {
        None
    } else {
        Some(GroqClient::from_env(&config.llm)?)
    };

    let started = Instant::now();
    let pb = display.spinner(&format!("Loading encoder {}", config.embedding.model_id));
    let embedding_config = config.embedding.clone();
    let embedder = tokio::task::spawn_blocking(move || embedding::shared(&embedding_config))
        .await
        .context("Encoder loading task failed")?;
    pb.finish_and_clear();
    let embedder = embedder?;
    telemetry.record(TelemetryEvent::ModelLoaded {
        duration_ms: started.elapsed().as_millis() as u64,
        timestamp: Instant::now(),
    });

    let retriever = Arc::new(Retriever::with_config(embedder, config.retrieval.clone()));
    let pipeline = chat.map(|chat| QaPipeline::new(Arc::clone(&retriever), chat));

    let mut session = Session {
        retriever,
        pipeline,
        documents: vec![document],
        last_context: Vec::new(),
        display,
        telemetry: telemetry.clone(),
        verbosity,
    };

    match &args.question {
        Some(question) => session.ask(question).await?,
        None => {
            if verbosity.show_progress() {
                session
                    .display
                    .show_banner(&path.display().to_string(), &config.embedding.model_id);
            }
            session.run_repl().await?;
        }
    }

    TelemetryDisplay::new(telemetry, verbosity).display_summary();
    Ok(())
}
