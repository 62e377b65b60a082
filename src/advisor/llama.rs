//! llama.cpp backed advisor
//!
//! Backend, weights and context are acquired inside a single blocking call
//! and dropped when it returns, on success and on every error path.

use super::prompt::ChatPrompt;
use super::stream::{FragmentStreamExt, collect_suggestion};
use super::ClothingAdvisor;
use crate::config::ModelConfig;
use crate::models::WeatherSummary;
use crate::{Result, WearError};
use async_trait::async_trait;
use encoding_rs::CoderResult;
use llama_cpp_2::context::LlamaContext;
use llama_cpp_2::context::params::LlamaContextParams;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::llama_batch::LlamaBatch;
use llama_cpp_2::model::params::LlamaModelParams;
use llama_cpp_2::model::{AddBos, LlamaModel, Special};
use llama_cpp_2::sampling::LlamaSampler;
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Once;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

// default stochastic sampling
const TOP_K: i32 = 40;
const TOP_P: f32 = 0.95;
const TEMPERATURE: f32 = 0.8;

/// Text returned in place of a suggestion when no model file is present
#[must_use]
pub fn model_missing_message(path: &Path) -> String {
    format!(
        "Model file not found at {}. Please download a GGUF model and place it in the models directory.",
        path.display()
    )
}

/// Advisor running a GGUF model through llama.cpp on the CPU
#[derive(Debug, Clone)]
pub struct LlamaAdvisor {
    config: ModelConfig,
}

impl LlamaAdvisor {
    #[must_use]
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ClothingAdvisor for LlamaAdvisor {
    async fn suggest(&self, summary: &WeatherSummary) -> Result<String> {
        if !self.config.path.is_file() {
            warn!("Model file not found at {}", self.config.path.display());
            return Ok(model_missing_message(&self.config.path));
        }

        let config = self.config.clone();
        let prompt = ChatPrompt::clothing(summary).render();

        tokio::task::spawn_blocking(move || generate(&config, &prompt))
            .await
            .map_err(|e| WearError::inference(format!("Generation task failed: {e}")))?
    }
}

fn inference_error(what: &str, e: impl std::fmt::Display) -> WearError {
    WearError::inference(format!("{what}: {e}"))
}

/// Route llama.cpp's own log lines through `tracing` so the configured
/// filter applies to them
fn forward_native_logs() {
    static FORWARD: Once = Once::new();
    FORWARD.call_once(|| llama_cpp_2::send_logs_to_tracing(llama_cpp_2::LogOptions::default()));
}

/// Decode the bytes of one token. An incomplete UTF-8 sequence at the end is
/// kept in `decoder` and completed by the next call.
fn decode_piece(decoder: &mut encoding_rs::Decoder, bytes: &[u8]) -> Result<String> {
    let capacity = decoder
        .max_utf8_buffer_length(bytes.len())
        .unwrap_or(bytes.len() * 3 + 4);
    let mut piece = String::with_capacity(capacity);

    let (result, read, _) = decoder.decode_to_string(bytes, &mut piece, false);
    match result {
        CoderResult::InputEmpty if read == bytes.len() => Ok(piece),
        _ => Err(WearError::inference(format!(
            "Token text truncated: decoded {read} of {} bytes",
            bytes.len()
        ))),
    }
}

#[instrument(skip_all, fields(model = %config.path.display()))]
fn generate(config: &ModelConfig, prompt: &str) -> Result<String> {
    let start_time = Instant::now();

    let backend = LlamaBackend::init()
        .map_err(|e| inference_error("Unable to initialize llama backend", e))?;
    forward_native_logs();

    let model_params = LlamaModelParams::default().with_n_gpu_layers(config.gpu_layers);
    let model = LlamaModel::load_from_file(&backend, &config.path, &model_params)
        .map_err(|e| inference_error("Unable to load model", e))?;
    info!("Loaded model in {:.2}s", start_time.elapsed().as_secs_f64());

    let generation = Generation::start(&backend, &model, config, prompt)?;
    let suggestion = collect_suggestion(generation.stop_at(config.stop_sequence.as_str()))?;

    info!(
        "Generated suggestion ({} chars) in {:.2}s",
        suggestion.len(),
        start_time.elapsed().as_secs_f64()
    );
    Ok(suggestion)
}

/// Lazy token-by-token generation over a prepared context.
///
/// Each call to `next` samples one token, decodes it into text and feeds it
/// back. The stream ends at an end-of-generation token or after
/// `max_tokens` fragments; a failure is yielded once and ends the stream.
pub struct Generation<'m> {
    model: &'m LlamaModel,
    ctx: LlamaContext<'m>,
    batch: LlamaBatch,
    sampler: LlamaSampler,
    decoder: encoding_rs::Decoder,
    n_cur: i32,
    remaining: u32,
    finished: bool,
}

impl<'m> Generation<'m> {
    /// Create a context for `model` and evaluate `prompt` in it
    pub fn start(
        backend: &LlamaBackend,
        model: &'m LlamaModel,
        config: &ModelConfig,
        prompt: &str,
    ) -> Result<Self> {
        let ctx_params =
            LlamaContextParams::default().with_n_ctx(NonZeroU32::new(config.context_size));
        let mut ctx = model
            .new_context(backend, ctx_params)
            .map_err(|e| inference_error("Unable to create context", e))?;

        let tokens = model
            .str_to_token(prompt, AddBos::Always)
            .map_err(|e| inference_error("Unable to tokenize prompt", e))?;

        let n_ctx = ctx.n_ctx() as usize;
        if tokens.len() + config.max_tokens as usize > n_ctx {
            return Err(WearError::inference(format!(
                "Prompt uses {} tokens; with up to {} generated tokens it does not fit the {}-token context window",
                tokens.len(),
                config.max_tokens,
                n_ctx
            )));
        }
        debug!("Prompt is {} tokens", tokens.len());

        let mut batch = LlamaBatch::new(n_ctx, 1);
        let last_index = tokens.len() as i32 - 1;
        for (i, token) in (0_i32..).zip(tokens) {
            // logits only for the last prompt token
            batch
                .add(token, i, &[0], i == last_index)
                .map_err(|e| inference_error("Unable to batch prompt", e))?;
        }

        ctx.decode(&mut batch)
            .map_err(|e| inference_error("Prompt evaluation failed", e))?;

        let sampler = LlamaSampler::chain_simple([
            LlamaSampler::top_k(TOP_K),
            LlamaSampler::top_p(TOP_P, 1),
            LlamaSampler::temp(TEMPERATURE),
            LlamaSampler::dist(rand::random::<u32>()),
        ]);

        let n_cur = batch.n_tokens();
        Ok(Self {
            model,
            ctx,
            batch,
            sampler,
            decoder: encoding_rs::UTF_8.new_decoder(),
            n_cur,
            remaining: config.max_tokens,
            finished: false,
        })
    }

    fn fail(&mut self, what: &str, e: impl std::fmt::Display) -> Option<Result<String>> {
        self.finished = true;
        Some(Err(inference_error(what, e)))
    }
}

impl Iterator for Generation<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.remaining == 0 {
            return None;
        }

        let token = self.sampler.sample(&self.ctx, self.batch.n_tokens() - 1);
        if self.model.is_eog_token(token) {
            self.finished = true;
            return None;
        }

        #[allow(deprecated)]
        let bytes = match self.model.token_to_bytes(token, Special::Tokenize) {
            Ok(bytes) => bytes,
            Err(e) => return self.fail("Unable to decode token", e),
        };
        let piece = match decode_piece(&mut self.decoder, &bytes) {
            Ok(piece) => piece,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        self.remaining -= 1;
        if self.remaining == 0 {
            return Some(Ok(piece));
        }

        self.batch.clear();
        if let Err(e) = self.batch.add(token, self.n_cur, &[0], true) {
            return self.fail("Unable to batch token", e);
        }
        self.n_cur += 1;

        if let Err(e) = self.ctx.decode(&mut self.batch) {
            return self.fail("Token evaluation failed", e);
        }

        Some(Ok(piece))
    }
}
