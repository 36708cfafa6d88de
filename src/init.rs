use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::agents::{AnalysisTeam, ChatAgent, Delegate};
use crate::error::{AppError, Result};

// ============================================================================
// Configuration
// ============================================================================

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GROQ_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";
pub const DEFAULT_DELEGATE_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CHAT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub google_api_key: String,
    pub host: String,
    pub port: u16,
    pub gemini_model: String,
    pub groq_model: String,
    pub delegate_timeout: Duration,
    pub chat_history_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let groq_api_key = std::env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty());
        let google_api_key = std::env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty());
        let (Some(groq_api_key), Some(google_api_key)) = (groq_api_key, google_api_key) else {
            return Err(AppError::configuration(
                "API keys (GROQ_API_KEY, GOOGLE_API_KEY) not found in .env file or environment variables.",
            ));
        };

        Self::with_keys(groq_api_key, google_api_key)
    }

    /// Like `from_env`, but missing provider keys are tolerated: the
    /// dashboard does not pre-validate credentials, so delegate calls fail
    /// lazily at the provider instead of blocking startup.
    pub fn from_env_lenient() -> Result<Self> {
        Self::with_keys(
            std::env::var("GROQ_API_KEY").unwrap_or_default(),
            std::env::var("GOOGLE_API_KEY").unwrap_or_default(),
        )
    }

    fn with_keys(groq_api_key: String, google_api_key: String) -> Result<Self> {
        Ok(Self {
            groq_api_key,
            google_api_key,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or(std::env::var("PORT").ok(), "PORT", DEFAULT_PORT)?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            groq_model: std::env::var("GROQ_MODEL")
                .unwrap_or_else(|_| DEFAULT_GROQ_MODEL.to_string()),
            delegate_timeout: Duration::from_secs(parse_or(
                std::env::var("DELEGATE_TIMEOUT_SECS").ok(),
                "DELEGATE_TIMEOUT_SECS",
                DEFAULT_DELEGATE_TIMEOUT_SECS,
            )?),
            chat_history_limit: parse_or(
                std::env::var("CHAT_HISTORY_LIMIT").ok(),
                "CHAT_HISTORY_LIMIT",
                DEFAULT_CHAT_HISTORY_LIMIT,
            )?,
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, name: &str, default: T) -> Result<T> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::configuration(format!("Invalid value for {}: {}", name, raw))),
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Shared state for both surfaces. Built once at startup and never mutated;
/// concurrent handlers only ever read it through the `Arc`.
pub struct AppState {
    pub analysis: Arc<dyn Delegate>,
    pub chat: Arc<dyn Delegate>,
    pub delegate_timeout: Duration,
}

pub fn app_init() -> Result<(Config, Arc<AppState>)> {
    let config = Config::from_env()?;
    log::info!("✅ Configuration loaded");

    let state = build_state(&config)?;
    Ok((config, state))
}

/// Build the two delegate descriptors from an already-validated config.
/// Both surfaces share this, so the agent definitions cannot drift apart.
pub fn build_state(config: &Config) -> Result<Arc<AppState>> {
    let analysis = AnalysisTeam::new(
        &config.google_api_key,
        &config.groq_api_key,
        &config.gemini_model,
        &config.groq_model,
    )?;
    log::info!(
        "✅ Analysis team ready (sub-agents: {}, lead: {})",
        config.gemini_model,
        config.groq_model
    );

    let chat = ChatAgent::new(&config.google_api_key, &config.gemini_model)?;
    log::info!("✅ Chat agent ready ({})", config.gemini_model);

    Ok(Arc::new(AppState {
        analysis: Arc::new(analysis),
        chat: Arc::new(chat),
        delegate_timeout: config.delegate_timeout,
    }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default() {
        let port: u16 = parse_or(None, "PORT", DEFAULT_PORT).unwrap();
        assert_eq!(port, 5001);
    }

    #[test]
    fn test_parse_or_value() {
        let port: u16 = parse_or(Some("8080".to_string()), "PORT", DEFAULT_PORT).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_or_rejects_garbage() {
        let err = parse_or::<u16>(Some("later".to_string()), "PORT", DEFAULT_PORT).unwrap_err();
        assert!(err.message.contains("PORT"));
        assert!(err.message.contains("later"));
    }
}
