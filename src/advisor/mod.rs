//! Clothing advice from a locally hosted language model

use crate::Result;
use crate::models::WeatherSummary;
use async_trait::async_trait;

pub mod llama;
pub mod prompt;
pub mod stream;

pub use llama::LlamaAdvisor;
pub use prompt::{ChatPrompt, SYSTEM_PROMPT};
pub use stream::{FragmentStreamExt, StopAt, collect_suggestion};

/// Turns a weather summary into a clothing suggestion
#[async_trait]
pub trait ClothingAdvisor: Send + Sync {
    /// Produce a suggestion for `summary`.
    ///
    /// Expected conditions such as a missing model file come back as `Ok`
    /// with an explanatory text; `Err` is reserved for inference failures.
    async fn suggest(&self, summary: &WeatherSummary) -> Result<String>;
}
