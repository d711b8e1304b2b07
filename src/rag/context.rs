// Prompt assembly from retrieved documents
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::errors::{QaError, Result};

/// Context used when no document passed the threshold
pub const NO_CONTEXT_PLACEHOLDER: &str = "No relevant context found.";

const CONTEXT_SLOT: &str = "{context}";
const QUESTION_SLOT: &str = "{question}";

const DEFAULT_TEMPLATE: &str = "You are an expert assistant. Answer the question based on the provided context.

Context: {context}
Question: {question}

Answer:";

/// Join retrieved documents into one context string
pub fn build_context(documents: &[Document]) -> String {
    if documents.is_empty() {
        return NO_CONTEXT_PLACEHOLDER.to_string();
    }
    documents
        .iter()
        .map(Document::text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prompt with `{context}` and `{question}` slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template; both slots must be present
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        for slot in [CONTEXT_SLOT, QUESTION_SLOT] {
            if !template.contains(slot) {
                return Err(QaError::Config(format!(
                    "prompt template is missing the {} placeholder",
                    slot
                )));
            }
        }
        Ok(Self { template })
    }

    /// Fill both slots in a single pass, so braces inside the question or
    /// the retrieved context are never expanded again.
    pub fn render(&self, question: &str, context: &str) -> String {
        let mut out = String::with_capacity(self.template.len() + question.len() + context.len());
        let mut rest = self.template.as_str();

        loop {
            let next = [(CONTEXT_SLOT, context), (QUESTION_SLOT, question)]
                .into_iter()
                .filter_map(|(slot, value)| rest.find(slot).map(|pos| (pos, slot, value)))
                .min_by_key(|(pos, _, _)| *pos);

            match next {
                Some((pos, slot, value)) => {
                    out.push_str(&rest[..pos]);
                    out.push_str(value);
                    rest = &rest[pos + slot.len()..];
                }
                None => {
                    out.push_str(rest);
                    break;
                }
            }
        }
        out
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_context_empty_uses_placeholder() {
        assert_eq!(build_context(&[]), NO_CONTEXT_PLACEHOLDER);
    }

    #[test]
    fn test_build_context_joins_with_space() {
        let docs = vec![Document::from("Paris is in France."), Document::from("It is large.")];
        assert_eq!(build_context(&docs), "Paris is in France. It is large.");
    }

    #[test]
    fn test_default_template_renders() {
        let prompt = PromptTemplate::default().render("What is the capital?", "Paris.");
        assert!(prompt.starts_with("You are an expert assistant."));
        assert!(prompt.contains("Context: Paris.\n"));
        assert!(prompt.contains("Question: What is the capital?\n"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn test_context_braces_not_expanded() {
        let template = PromptTemplate::new("C={context} Q={question}").unwrap();
        let prompt = template.render("why?", r#"{"question": 1}"#);
        assert_eq!(prompt, r#"C={"question": 1} Q=why?"#);
    }

    #[test]
    fn test_question_braces_not_expanded() {
        let template = PromptTemplate::new("Q={question} C={context}").unwrap();
        assert_eq!(template.render("{context}?", "ctx"), "Q={context}? C=ctx");
    }

    #[test]
    fn test_question_before_context() {
        let template = PromptTemplate::new("Q={question}\nC={context}").unwrap();
        assert_eq!(template.render("q1", "ctx"), "Q=q1\nC=ctx");
    }

    #[test]
    fn test_template_requires_both_slots() {
        assert!(PromptTemplate::new("Only {question}").is_err());
        assert!(PromptTemplate::new("Only {context}").is_err());
        assert!(PromptTemplate::new("{context} {question}").is_ok());
    }
}
