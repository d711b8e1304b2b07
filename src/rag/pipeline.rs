// End-to-end answer pipeline: retrieve -> build context -> ask the LLM
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::document::Document;
use crate::embedding::Embedder;
use crate::errors::{QaError, Result};
use crate::llm::ChatModel;
use crate::rag::context::{build_context, PromptTemplate};
use crate::retrieval::Retriever;

/// Answer to one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Model output
    pub text: String,
    /// Documents that passed the threshold, in input order
    pub context: Vec<Document>,
    /// True when no document passed and the placeholder was sent instead
    pub used_placeholder: bool,
}

/// Retrieval plus a chat model
pub struct QaPipeline<E: Embedder + 'static, C: ChatModel> {
    retriever: Arc<Retriever<E>>,
    chat: C,
    template: PromptTemplate,
}

impl<E: Embedder + 'static, C: ChatModel> QaPipeline<E, C> {
    /// Create pipeline with the default prompt
    pub fn new(retriever: Arc<Retriever<E>>, chat: C) -> Self {
        Self::with_template(retriever, chat, PromptTemplate::default())
    }

    /// Create with a custom prompt template
    pub fn with_template(retriever: Arc<Retriever<E>>, chat: C, template: PromptTemplate) -> Self {
        Self {
            retriever,
            chat,
            template,
        }
    }

    pub fn retriever(&self) -> &Arc<Retriever<E>> {
        &self.retriever
    }

    /// Run retrieval on the blocking pool; embedding is CPU-bound
    pub async fn retrieve(&self, question: &str, documents: &[Document]) -> Result<Vec<Document>> {
        let retriever = Arc::clone(&self.retriever);
        let question = question.to_string();
        let documents = documents.to_vec();

        tokio::task::spawn_blocking(move || retriever.retrieve(&question, &documents))
            .await
            .map_err(|e| QaError::Generic(format!("retrieval task failed: {}", e)))?
    }

    /// Render the prompt for a question and its retrieved documents
    pub fn prompt(&self, question: &str, retrieved: &[Document]) -> String {
        self.template.render(question, &build_context(retrieved))
    }

    /// Retrieve context and ask the chat model
    pub async fn answer(&self, question: &str, documents: &[Document]) -> Result<Answer> {
        let context = self.retrieve(question, documents).await?;
        self.answer_with_context(question, context).await
    }

    /// Ask the chat model using documents that were already retrieved
    pub async fn answer_with_context(&self, question: &str, context: Vec<Document>) -> Result<Answer> {
        let prompt = self.prompt(question, &context);

        info!(
            retrieved = context.len(),
            prompt_len = prompt.len(),
            "asking chat model"
        );
        let text = self.chat.complete(&prompt).await?;

        Ok(Answer {
            text,
            used_placeholder: context.is_empty(),
            context,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedding;
    use crate::rag::context::NO_CONTEXT_PLACEHOLDER;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Two-dimensional embedder: mentions of "paris" vs everything else
    struct ParisEmbedder;

    impl Embedder for ParisEmbedder {
        fn embed(&self, text: &str) -> Result<Embedding> {
            let lower = text.to_lowercase();
            let paris = lower.matches("paris").count() + lower.matches("france").count();
            let other = lower.split_whitespace().count().saturating_sub(paris);
            Ok(Embedding::from(vec![paris as f32, other as f32 * 0.1]))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    /// Records prompts and answers with a canned reply
    struct EchoChat {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatModel for EchoChat {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("Paris".to_string())
        }
    }

    struct FailingChat;

    #[async_trait]
    impl ChatModel for FailingChat {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(QaError::LlmApi("HTTP 503".to_string()))
        }
    }

    fn pipeline() -> QaPipeline<ParisEmbedder, EchoChat> {
        let retriever = Arc::new(Retriever::new(Arc::new(ParisEmbedder)));
        QaPipeline::new(
            retriever,
            EchoChat {
                prompts: Mutex::new(Vec::new()),
            },
        )
    }

    #[tokio::test]
    async fn test_answer_with_context() {
        let pipeline = pipeline();
        let docs = vec![
            Document::from("Paris is the capital of France."),
            Document::from("Bananas are yellow."),
        ];

        let answer = pipeline.answer("Where is France?", &docs).await.unwrap();
        assert_eq!(answer.text, "Paris");
        assert_eq!(answer.context, vec![docs[0].clone()]);
        assert!(!answer.used_placeholder);

        let prompts = pipeline.chat.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Context: Paris is the capital of France."));
        assert!(!prompts[0].contains("Bananas"));
    }

    #[tokio::test]
    async fn test_answer_without_context_uses_placeholder() {
        let pipeline = pipeline();
        let docs = vec![Document::from("Bananas are yellow.")];

        let answer = pipeline.answer("Where is France?", &docs).await.unwrap();
        assert!(answer.used_placeholder);
        assert!(answer.context.is_empty());

        let prompts = pipeline.chat.prompts.lock().unwrap();
        assert!(prompts[0].contains(NO_CONTEXT_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_empty_question_never_reaches_model() {
        let pipeline = pipeline();
        let result = pipeline.answer("   ", &[Document::from("Paris")]).await;
        assert!(matches!(result, Err(QaError::EmptyQuestion)));
        assert!(pipeline.chat.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_error_propagates() {
        let retriever = Arc::new(Retriever::new(Arc::new(ParisEmbedder)));
        let pipeline = QaPipeline::new(retriever, FailingChat);
        let result = pipeline.answer("France?", &[Document::from("Paris")]).await;
        assert!(matches!(result, Err(QaError::LlmApi(_))));
    }
}
