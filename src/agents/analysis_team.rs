//! The multi-agent stock-analysis delegate.
//!
//! Two specialist sub-agents produce reports which a team lead on a separate
//! backend synthesizes into the final markdown answer:
//!   - finance sub-agent (Gemini): market-data tools, tabular output rules
//!   - web-search sub-agent (Gemini): web-search tool, news categorization
//!   - team lead (Groq): merges both reports under the team instruction set
//!
//! The ordering is fixed and sequential; the caller only ever sees the lead's
//! synthesized markdown or a single delegate error.

use async_trait::async_trait;
use rig::completion::Prompt;
use rig::prelude::CompletionClient;
use rig::providers::{gemini, groq};

use crate::agents::{Delegate, DelegateError};
use crate::error::{AppError, Result};
use crate::prompts;
use crate::tools::{AnalystRatings, CompanyNews, Fundamentals, MarketDataClient, StockQuote, WebSearch};

/// Tool-call round trips allowed per sub-agent before it must answer.
const MAX_TOOL_TURNS: usize = 6;

pub struct AnalysisTeam {
    gemini: gemini::Client,
    groq: groq::Client,
    gemini_model: String,
    groq_model: String,
    market: MarketDataClient,
}

impl AnalysisTeam {
    pub fn new(
        google_api_key: &str,
        groq_api_key: &str,
        gemini_model: impl Into<String>,
        groq_model: impl Into<String>,
    ) -> Result<Self> {
        let gemini = gemini::Client::new(google_api_key)
            .map_err(|e| AppError::configuration(format!("Gemini client: {}", e)))?;
        let groq = groq::Client::new(groq_api_key)
            .map_err(|e| AppError::configuration(format!("Groq client: {}", e)))?;
        Ok(Self {
            gemini,
            groq,
            gemini_model: gemini_model.into(),
            groq_model: groq_model.into(),
            market: MarketDataClient::new(),
        })
    }

    async fn finance_report(&self, prompt: &str) -> std::result::Result<String, DelegateError> {
        let agent = self
            .gemini
            .agent(&self.gemini_model)
            .preamble(&prompts::preamble(prompts::FINANCE_INSTRUCTIONS))
            .tool(StockQuote(self.market.clone()))
            .tool(AnalystRatings(self.market.clone()))
            .tool(Fundamentals(self.market.clone()))
            .tool(CompanyNews(self.market.clone()))
            .build();

        agent
            .prompt(prompt)
            .multi_turn(MAX_TOOL_TURNS)
            .await
            .map_err(|e| DelegateError::Provider(e.to_string()))
    }

    async fn web_report(&self, prompt: &str) -> std::result::Result<String, DelegateError> {
        let agent = self
            .gemini
            .agent(&self.gemini_model)
            .preamble(&prompts::preamble(prompts::WEB_SEARCH_INSTRUCTIONS))
            .tool(WebSearch::new())
            .build();

        agent
            .prompt(prompt)
            .multi_turn(MAX_TOOL_TURNS)
            .await
            .map_err(|e| DelegateError::Provider(e.to_string()))
    }

    async fn synthesize(
        &self,
        prompt: &str,
        finance_report: &str,
        web_report: &str,
    ) -> std::result::Result<String, DelegateError> {
        let agent = self
            .groq
            .agent(&self.groq_model)
            .preamble(&prompts::preamble(prompts::TEAM_INSTRUCTIONS))
            .build();

        let lead_prompt = format!(
            "Request: {}\n\n## Finance Agent report\n{}\n\n## Web Search Agent report\n{}",
            prompt, finance_report, web_report
        );

        agent
            .prompt(&lead_prompt)
            .await
            .map_err(|e| DelegateError::Provider(e.to_string()))
    }
}

#[async_trait]
impl Delegate for AnalysisTeam {
    async fn run(&self, prompt: &str) -> std::result::Result<String, DelegateError> {
        log::info!("Running analysis team");
        let finance = self.finance_report(prompt).await?;
        log::debug!("Finance report: {} chars", finance.len());
        let web = self.web_report(prompt).await?;
        log::debug!("Web report: {} chars", web.len());
        self.synthesize(prompt, &finance, &web).await
    }
}
