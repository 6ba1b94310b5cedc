use crate::core::prompt::{meal_pairing_prompt, question_prompt};
use crate::core::{TextGenerator, UserPreferences};
use crate::utils::error::Result;
use std::sync::Arc;

/// Sends recommendation and Q&A prompts to the generation service.
///
/// Each call is a single request with no retry; the caller decides how a
/// failure is shown.
pub struct Sommelier {
    generator: Arc<dyn TextGenerator>,
}

impl Sommelier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn ask(&self, prompt: &str) -> Result<String> {
        tracing::debug!("Sending prompt ({} chars) to generation service", prompt.len());
        let text = self.generator.generate(prompt).await?;
        tracing::debug!("Received {} chars of generated text", text.len());
        Ok(text)
    }

    pub async fn recommend(&self, prefs: &UserPreferences) -> Result<String> {
        let prompt = meal_pairing_prompt(prefs);
        self.ask(&prompt).await
    }

    pub async fn answer(&self, question: &str) -> Result<String> {
        let prompt = question_prompt(question)?;
        self.ask(&prompt).await
    }
}
