//! Chat prompt for the clothing advisor

use crate::models::WeatherSummary;

/// Persona given to the model as the system-role message
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that suggests what to wear based on the weather. Be specific and practical.";

/// A system instruction plus exactly one user message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    system: String,
    user: String,
}

impl ChatPrompt {
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Prompt asking what to wear for the given weather
    #[must_use]
    pub fn clothing(summary: &WeatherSummary) -> Self {
        Self::new(SYSTEM_PROMPT, summary.prompt())
    }

    #[must_use]
    pub fn system(&self) -> &str {
        &self.system
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Render in the Llama-2 chat layout. The BOS token is added by the
    /// tokenizer, not included here.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "[INST] <<SYS>>\n{}\n<</SYS>>\n\n{} [/INST]",
            self.system, self.user
        )
    }
}
