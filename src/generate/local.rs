//! In-process sequence-to-sequence generation behind the `onnx-generator`
//! feature. No Ollama daemon needed: a single `model.onnx` plus
//! `tokenizer.json` in the configured model directory.
//!
//! Decoding is greedy and re-runs the full model per emitted token (no KV
//! cache). Fine for the short JSON documents this service asks for.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use async_trait::async_trait;
use ort::session::Session;

use crate::describe::types::{GeneratorInfo, TextGenerator};
use crate::describe::DescribeError;

/// Hard cap on emitted tokens per request.
const MAX_DECODE_STEPS: usize = 256;

/// T5-family defaults: decoder starts from the pad token, stops at </s>.
const DECODER_START_TOKEN_ID: i64 = 0;
const FALLBACK_EOS_TOKEN_ID: u32 = 1;

/// Lazily-initialized local generation model.
///
/// The session loads on the first `generate` call, not at startup, so the
/// service comes up (and reports health) even while model files are still
/// being provisioned.
pub struct LocalGenerator {
    model_dir: PathBuf,
    loaded: OnceLock<LoadedModel>,
}

impl LocalGenerator {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            loaded: OnceLock::new(),
        }
    }

    fn model(&self) -> Result<&LoadedModel, DescribeError> {
        if let Some(m) = self.loaded.get() {
            return Ok(m);
        }
        // A concurrent first call may load twice; the loser is dropped.
        let m = LoadedModel::load(&self.model_dir)?;
        Ok(self.loaded.get_or_init(|| m))
    }

    fn model_files_present(&self) -> bool {
        self.model_dir.join("model.onnx").exists() && self.model_dir.join("tokenizer.json").exists()
    }
}

struct LoadedModel {
    // ort::Session::run needs `&mut self`; the generator is shared behind Arc.
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    eos_token_id: u32,
}

impl LoadedModel {
    fn load(model_dir: &Path) -> Result<Self, DescribeError> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            return Err(DescribeError::ModelNotFound(model_path.display().to_string()));
        }
        if !tokenizer_path.exists() {
            return Err(DescribeError::ModelNotFound(
                tokenizer_path.display().to_string(),
            ));
        }

        let session = Session::builder()
            .map_err(|e: ort::Error| DescribeError::ModelInit(e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e: ort::Error| DescribeError::ModelInit(e.to_string()))?
            .commit_from_file(&model_path)
            .map_err(|e: ort::Error| DescribeError::ModelInit(format!("ONNX load failed: {e}")))?;

        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| DescribeError::ModelInit(format!("Tokenizer load failed: {e}")))?;

        let eos_token_id = tokenizer
            .token_to_id("</s>")
            .unwrap_or(FALLBACK_EOS_TOKEN_ID);

        tracing::info!("Local seq2seq model loaded from {}", model_dir.display());

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            eos_token_id,
        })
    }

    /// Greedy decode: encode the prompt once, then repeatedly run the model
    /// with the growing decoder sequence and take the argmax token.
    fn infer(&self, text: &str) -> Result<String, DescribeError> {
        use ort::value::TensorRef;

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| DescribeError::Inference(e.to_string()))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let seq_len = input_ids.len();

        let ids_array = ndarray::Array2::from_shape_vec((1, seq_len), input_ids)
            .map_err(|e| DescribeError::Inference(e.to_string()))?;
        let mask_array = ndarray::Array2::from_shape_vec((1, seq_len), attention_mask)
            .map_err(|e| DescribeError::Inference(e.to_string()))?;

        let mut decoder_ids: Vec<i64> = vec![DECODER_START_TOKEN_ID];
        let mut generated: Vec<u32> = Vec::new();

        let mut session = self
            .session
            .lock()
            .map_err(|_| DescribeError::Inference("Session lock poisoned".to_string()))?;

        for _ in 0..MAX_DECODE_STEPS {
            let dec_array =
                ndarray::Array2::from_shape_vec((1, decoder_ids.len()), decoder_ids.clone())
                    .map_err(|e| DescribeError::Inference(e.to_string()))?;

            let ids_tensor = TensorRef::from_array_view(&ids_array)
                .map_err(|e| DescribeError::Inference(e.to_string()))?;
            let mask_tensor = TensorRef::from_array_view(&mask_array)
                .map_err(|e| DescribeError::Inference(e.to_string()))?;
            let dec_tensor = TensorRef::from_array_view(&dec_array)
                .map_err(|e| DescribeError::Inference(e.to_string()))?;

            let outputs = session
                .run(ort::inputs![ids_tensor, mask_tensor, dec_tensor])
                .map_err(|e| DescribeError::Inference(format!("ONNX inference failed: {e}")))?;

            // Logits shape is [1, decoder_len, vocab]; argmax over the last step.
            let (shape, logits) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| DescribeError::Inference(format!("Output extraction: {e}")))?;

            if shape.len() != 3 {
                return Err(DescribeError::Inference(format!(
                    "unexpected logits shape: {shape:?}"
                )));
            }
            let vocab = shape[2] as usize;
            let last = &logits[logits.len() - vocab..];
            let next = last
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i as u32)
                .ok_or_else(|| DescribeError::Inference("empty logits".to_string()))?;

            if next == self.eos_token_id {
                break;
            }
            generated.push(next);
            decoder_ids.push(next as i64);
        }

        self.tokenizer
            .decode(&generated, true)
            .map_err(|e| DescribeError::Inference(e.to_string()))
    }
}

#[async_trait]
impl TextGenerator for LocalGenerator {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, DescribeError> {
        let text = format!("{system}\n\n{prompt}");
        let model = self.model()?;
        // Inference is CPU-bound; keep it off the async worker threads.
        tokio::task::block_in_place(|| model.infer(&text))
    }

    async fn is_reachable(&self) -> bool {
        self.loaded.get().is_some() || self.model_files_present()
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            backend: "local",
            model: self.model_dir.display().to_string(),
            base_url: None,
        }
    }
}
