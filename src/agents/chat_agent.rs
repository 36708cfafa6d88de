//! Tool-less assistant delegate for open-ended questions.
//!
//! One statically configured Gemini binding; there is deliberately no
//! runtime probing for a "better" chat capability with a fallback agent.

use async_trait::async_trait;
use rig::completion::Prompt;
use rig::prelude::CompletionClient;
use rig::providers::gemini;

use crate::agents::{Delegate, DelegateError};
use crate::error::{AppError, Result};
use crate::prompts;

pub struct ChatAgent {
    client: gemini::Client,
    model: String,
}

impl ChatAgent {
    pub fn new(google_api_key: &str, model: impl Into<String>) -> Result<Self> {
        let client = gemini::Client::new(google_api_key)
            .map_err(|e| AppError::configuration(format!("Gemini client: {}", e)))?;
        Ok(Self {
            client,
            model: model.into(),
        })
    }
}

#[async_trait]
impl Delegate for ChatAgent {
    async fn run(&self, prompt: &str) -> std::result::Result<String, DelegateError> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(&prompts::preamble(prompts::CHAT_INSTRUCTIONS))
            .build();

        agent
            .prompt(prompt)
            .await
            .map_err(|e| DelegateError::Provider(e.to_string()))
    }
}
