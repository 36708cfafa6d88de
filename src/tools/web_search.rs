//! Web-search tool for the web-search sub-agent, backed by the DuckDuckGo
//! instant-answer API.

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

const SEARCH_BASE: &str = "https://api.duckduckgo.com/";

#[derive(Debug, Error)]
pub enum WebSearchError {
    #[error("web search request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchArgs {
    /// Search query, e.g. "AAPL earnings guidance"
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct WebSearch {
    http: reqwest::Client,
}

impl Default for WebSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl WebSearch {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    async fn search(&self, query: &str) -> Result<Value, WebSearchError> {
        let body: Value = self
            .http
            .get(SEARCH_BASE)
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .header("User-Agent", "finsight-agent/0.1")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let related: Vec<Value> = body
            .get("RelatedTopics")
            .and_then(Value::as_array)
            .map(|topics| {
                topics
                    .iter()
                    .filter(|t| t.get("Text").is_some())
                    .take(8)
                    .map(|t| {
                        json!({
                            "text": t.get("Text"),
                            "url": t.get("FirstURL"),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(json!({
            "query": query,
            "abstract": body.get("AbstractText"),
            "abstract_source": body.get("AbstractSource"),
            "abstract_url": body.get("AbstractURL"),
            "results": related,
        }))
    }
}

impl Tool for WebSearch {
    const NAME: &'static str = "web_search";
    type Error = WebSearchError;
    type Args = WebSearchArgs;
    type Output = Value;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Search the web for the latest information and news on a topic"
                .to_string(),
            parameters: serde_json::to_value(schemars::schema_for!(WebSearchArgs))
                .unwrap_or_else(|_| json!({})),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        self.search(&args.query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_definition_schema() {
        let def = WebSearch::new().definition(String::new()).await;
        assert_eq!(def.name, "web_search");
        let properties = def.parameters.get("properties").expect("schema properties");
        assert!(properties.get("query").is_some());
    }
}
