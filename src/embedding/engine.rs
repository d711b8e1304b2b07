// Embedding engine - local BERT encoder via Candle
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::{Embedder, Embedding, EmbeddingConfig};
use crate::errors::{QaError, Result};

/// Files that make up a BERT checkpoint
struct ModelFiles {
    config: PathBuf,
    tokenizer: PathBuf,
    weights: PathBuf,
}

impl ModelFiles {
    /// Use a local directory when one exists at `model_id`, else fetch from the Hub
    fn resolve(config: &EmbeddingConfig) -> Result<Self> {
        let local = Path::new(&config.model_id);
        if local.is_dir() {
            debug!(dir = %local.display(), "loading encoder from local directory");
            return Ok(Self {
                config: local.join("config.json"),
                tokenizer: local.join("tokenizer.json"),
                weights: local.join("model.safetensors"),
            });
        }

        let load_err = |e: hf_hub::api::sync::ApiError| QaError::model_load(&config.model_id, e);

        let api = Api::new().map_err(load_err)?;
        let repo = api.repo(Repo::with_revision(
            config.model_id.clone(),
            RepoType::Model,
            config.revision.clone(),
        ));

        Ok(Self {
            config: repo.get("config.json").map_err(load_err)?,
            tokenizer: repo.get("tokenizer.json").map_err(load_err)?,
            weights: repo.get("model.safetensors").map_err(load_err)?,
        })
    }
}

/// BERT encoder producing mean-pooled sentence embeddings
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    model_id: String,
    hidden_size: usize,
    max_length: usize,
}

impl BertEmbedder {
    /// Load weights and tokenizer (downloads from the Hub on first use)
    pub fn load(config: &EmbeddingConfig) -> Result<Self> {
        let model_id = config.model_id.as_str();
        let device = Device::Cpu;
        let files = ModelFiles::resolve(config)?;

        let config_contents = std::fs::read_to_string(&files.config)
            .map_err(|e| QaError::model_load(model_id, format!("reading config: {e}")))?;
        let bert_config: Config = serde_json::from_str(&config_contents)
            .map_err(|e| QaError::model_load(model_id, format!("parsing config: {e}")))?;

        let max_length = config.max_length.min(bert_config.max_position_embeddings);

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| QaError::model_load(model_id, format!("loading tokenizer: {e}")))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| QaError::model_load(model_id, format!("configuring truncation: {e}")))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&files.weights], DType::F32, &device)
                .map_err(|e| QaError::model_load(model_id, format!("loading weights: {e}")))?
        };
        let model = BertModel::load(vb, &bert_config)
            .map_err(|e| QaError::model_load(model_id, format!("building model: {e}")))?;

        info!(
            model = model_id,
            hidden_size = bert_config.hidden_size,
            max_length,
            "encoder loaded"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            model_id: model_id.to_string(),
            hidden_size: bert_config.hidden_size,
            max_length,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Token budget after which input is truncated
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Run the encoder and average the last hidden state over tokens
    fn forward_mean(&self, ids: &[u32]) -> Result<Vec<f32>> {
        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let attention_mask = input_ids.ones_like()?;

        // (1, tokens, hidden)
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        let pooled = hidden.mean(1)?.squeeze(0)?;
        Ok(pooled.to_dtype(DType::F32)?.to_vec1::<f32>()?)
    }
}

impl Embedder for BertEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding> {
        if text.trim().is_empty() {
            return Ok(Embedding::zeros(self.hidden_size));
        }

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| QaError::Encoding(e.to_string()))?;
        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Ok(Embedding::zeros(self.hidden_size));
        }
        if encoding.get_overflowing().first().is_some() {
            debug!(max_length = self.max_length, "input truncated");
        }

        let values = self.forward_mean(ids)?;
        Ok(Embedding::from(values))
    }

    fn dimension(&self) -> usize {
        self.hidden_size
    }
}
