//! Market-data tools exposed to the finance sub-agent.
//!
//! The original system leaned on a pre-built finance tool bundle; rig has no
//! equivalent, so the four capabilities (quote, analyst ratings, fundamentals,
//! company news) are thin Yahoo Finance fetchers sharing one HTTP client.
//! Tool failures go back to the model through rig's error channel and are
//! never surfaced to the API caller directly.

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

const QUOTE_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SUMMARY_BASE: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const SEARCH_BASE: &str = "https://query1.finance.yahoo.com/v1/finance/search";

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("market data request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected market data payload: {0}")]
    Payload(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SymbolArgs {
    /// Ticker symbol, e.g. AAPL
    pub symbol: String,
}

fn symbol_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(SymbolArgs)).unwrap_or_else(|_| json!({}))
}

// ============================================================================
// Shared Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct MarketDataClient {
    http: reqwest::Client,
}

impl Default for MarketDataClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketDataClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, MarketDataError> {
        let response = self
            .http
            .get(url)
            .header("User-Agent", "finsight-agent/0.1")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Latest price, currency and previous close from the chart endpoint.
    pub async fn quote(&self, symbol: &str) -> Result<Value, MarketDataError> {
        let url = format!("{}/{}?interval=1d&range=5d", QUOTE_BASE, symbol);
        let body = self.get_json(&url).await?;
        let meta = body
            .pointer("/chart/result/0/meta")
            .cloned()
            .ok_or_else(|| MarketDataError::Payload(format!("no chart data for {}", symbol)))?;
        Ok(json!({
            "symbol": symbol,
            "price": meta.get("regularMarketPrice"),
            "previous_close": meta.get("chartPreviousClose"),
            "currency": meta.get("currency"),
            "exchange": meta.get("exchangeName"),
        }))
    }

    async fn quote_summary(&self, symbol: &str, modules: &str) -> Result<Value, MarketDataError> {
        let url = format!("{}/{}?modules={}", SUMMARY_BASE, symbol, modules);
        let body = self.get_json(&url).await?;
        body.pointer("/quoteSummary/result/0")
            .cloned()
            .ok_or_else(|| MarketDataError::Payload(format!("no summary data for {}", symbol)))
    }

    /// Recommendation trend plus mean target price.
    pub async fn analyst_ratings(&self, symbol: &str) -> Result<Value, MarketDataError> {
        let result = self
            .quote_summary(symbol, "recommendationTrend,financialData")
            .await?;
        Ok(json!({
            "symbol": symbol,
            "recommendation_trend": result.pointer("/recommendationTrend/trend"),
            "recommendation_key": result.pointer("/financialData/recommendationKey"),
            "target_mean_price": result.pointer("/financialData/targetMeanPrice/raw"),
            "target_high_price": result.pointer("/financialData/targetHighPrice/raw"),
            "target_low_price": result.pointer("/financialData/targetLowPrice/raw"),
        }))
    }

    /// Valuation and balance-sheet basics.
    pub async fn fundamentals(&self, symbol: &str) -> Result<Value, MarketDataError> {
        let result = self
            .quote_summary(symbol, "defaultKeyStatistics,summaryDetail")
            .await?;
        Ok(json!({
            "symbol": symbol,
            "market_cap": result.pointer("/summaryDetail/marketCap/raw"),
            "trailing_pe": result.pointer("/summaryDetail/trailingPE/raw"),
            "forward_pe": result.pointer("/defaultKeyStatistics/forwardPE/raw"),
            "dividend_yield": result.pointer("/summaryDetail/dividendYield/raw"),
            "fifty_two_week_high": result.pointer("/summaryDetail/fiftyTwoWeekHigh/raw"),
            "fifty_two_week_low": result.pointer("/summaryDetail/fiftyTwoWeekLow/raw"),
            "beta": result.pointer("/summaryDetail/beta/raw"),
        }))
    }

    /// Recent headlines from the search endpoint.
    pub async fn company_news(&self, symbol: &str) -> Result<Value, MarketDataError> {
        let url = format!("{}?q={}&newsCount=8&quotesCount=0", SEARCH_BASE, symbol);
        let body = self.get_json(&url).await?;
        let items = body
            .get("news")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let headlines: Vec<Value> = items
            .iter()
            .map(|item| {
                json!({
                    "title": item.get("title"),
                    "publisher": item.get("publisher"),
                    "link": item.get("link"),
                    "published_at": item.get("providerPublishTime"),
                })
            })
            .collect();
        Ok(json!({ "symbol": symbol, "news": headlines }))
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[derive(Debug, Clone)]
pub struct StockQuote(pub MarketDataClient);

impl Tool for StockQuote {
    const NAME: &'static str = "stock_quote";
    type Error = MarketDataError;
    type Args = SymbolArgs;
    type Output = Value;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Get the current price, previous close and currency for a ticker symbol"
                .to_string(),
            parameters: symbol_schema(),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        self.0.quote(&args.symbol).await
    }
}

#[derive(Debug, Clone)]
pub struct AnalystRatings(pub MarketDataClient);

impl Tool for AnalystRatings {
    const NAME: &'static str = "analyst_ratings";
    type Error = MarketDataError;
    type Args = SymbolArgs;
    type Output = Value;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description:
                "Get analyst recommendation trend and target price range for a ticker symbol"
                    .to_string(),
            parameters: symbol_schema(),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        self.0.analyst_ratings(&args.symbol).await
    }
}

#[derive(Debug, Clone)]
pub struct Fundamentals(pub MarketDataClient);

impl Tool for Fundamentals {
    const NAME: &'static str = "stock_fundamentals";
    type Error = MarketDataError;
    type Args = SymbolArgs;
    type Output = Value;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Get valuation fundamentals (market cap, P/E, dividend yield, 52-week range) for a ticker symbol"
                .to_string(),
            parameters: symbol_schema(),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        self.0.fundamentals(&args.symbol).await
    }
}

#[derive(Debug, Clone)]
pub struct CompanyNews(pub MarketDataClient);

impl Tool for CompanyNews {
    const NAME: &'static str = "company_news";
    type Error = MarketDataError;
    type Args = SymbolArgs;
    type Output = Value;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Get recent news headlines with publishers and links for a ticker symbol"
                .to_string(),
            parameters: symbol_schema(),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        self.0.company_news(&args.symbol).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_schema_exposes_field() {
        let schema = symbol_schema();
        let properties = schema.get("properties").expect("schema has properties");
        assert!(properties.get("symbol").is_some());
    }

    #[tokio::test]
    async fn test_tool_definitions_are_distinct() {
        let client = MarketDataClient::new();
        let names = [
            StockQuote(client.clone()).definition(String::new()).await.name,
            AnalystRatings(client.clone()).definition(String::new()).await.name,
            Fundamentals(client.clone()).definition(String::new()).await.name,
            CompanyNews(client).definition(String::new()).await.name,
        ];
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }
}
