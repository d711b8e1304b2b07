//! Input handler for the question prompt using rustyline
//!
//! Provides readline editing, optional persistent history and parsing of
//! the few slash commands the prompt understands.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// One line of user input, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Question(String),
    /// Show the documents retrieved for the last question
    Context,
    Help,
    Exit,
    Empty,
}

impl ReplInput {
    /// Classify a raw input line
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "" => ReplInput::Empty,
            "/exit" | "/quit" | "/q" => ReplInput::Exit,
            "/help" | "/?" => ReplInput::Help,
            "/context" => ReplInput::Context,
            question => ReplInput::Question(question.to_string()),
        }
    }
}

/// Input handler managing the readline interface and history
pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
    prompt: String,
}

impl InputHandler {
    /// Create new input handler
    pub fn new() -> Result<Self> {
        Ok(InputHandler {
            editor: DefaultEditor::new()?,
            history_path: None,
            prompt: "question> ".to_string(),
        })
    }

    /// Create input handler with persistent history
    pub fn with_history(history_file: PathBuf) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;

        if history_file.exists() {
            let _ = editor.load_history(&history_file);
        }

        Ok(InputHandler {
            editor,
            history_path: Some(history_file),
            prompt: "question> ".to_string(),
        })
    }

    /// Read and classify one line; Ctrl-C and Ctrl-D both end the session
    pub fn read(&mut self) -> Result<ReplInput> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                let input = ReplInput::parse(&line);
                if let ReplInput::Question(question) = &input {
                    let _ = self.editor.add_history_entry(question.as_str());
                }
                Ok(input)
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(ReplInput::Exit),
            Err(err) => Err(anyhow::anyhow!("Readline error: {}", err)),
        }
    }

    /// Save history to disk
    pub fn save_history(&mut self) -> Result<()> {
        if let Some(ref path) = self.history_path {
            self.editor.save_history(path)?;
        }
        Ok(())
    }

    /// Get history size
    pub fn history_len(&self) -> usize {
        self.editor.history().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplInput::parse("  "), ReplInput::Empty);
        assert_eq!(ReplInput::parse("/exit"), ReplInput::Exit);
        assert_eq!(ReplInput::parse("/quit "), ReplInput::Exit);
        assert_eq!(ReplInput::parse("/help"), ReplInput::Help);
        assert_eq!(ReplInput::parse("/context"), ReplInput::Context);
    }

    #[test]
    fn test_parse_question_trims() {
        assert_eq!(
            ReplInput::parse("  What is the capital of France?\n"),
            ReplInput::Question("What is the capital of France?".to_string())
        );
    }

    #[test]
    fn test_history_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let history_path = temp_dir.path().join("history");

        {
            let mut handler = InputHandler::with_history(history_path.clone()).unwrap();
            let _ = handler.editor.add_history_entry("first question");
            let _ = handler.editor.add_history_entry("second question");
            handler.save_history().unwrap();
        }

        assert!(history_path.exists());

        let handler = InputHandler::with_history(history_path).unwrap();
        assert_eq!(handler.history_len(), 2);
    }

    #[test]
    fn test_default_prompt() {
        let handler = InputHandler::new().unwrap();
        assert_eq!(handler.prompt, "question> ");
    }
}
