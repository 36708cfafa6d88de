//! Prompt construction for both surfaces.
//!
//! The analysis templates are the contract: callers depend on the exact
//! wording, so they are built here and nowhere else. Free-text questions
//! pass through to the chat delegate unmodified.

use crate::models::AnalysisKind;

// ============================================================================
// User Prompt Templates
// ============================================================================

pub fn analysis_prompt(symbol: &str, kind: AnalysisKind) -> String {
    match kind {
        AnalysisKind::FullAnalysis => format!(
            "Provide comprehensive analysis for {} including current price, analyst recommendations, technical indicators, and investment outlook.",
            symbol
        ),
        AnalysisKind::NewsImpact => format!(
            "Find and summarize the latest news for {} with market impact assessment.",
            symbol
        ),
    }
}

// ============================================================================
// Agent Instruction Sets
// ============================================================================

/// Web-search sub-agent.
pub const WEB_SEARCH_INSTRUCTIONS: &[&str] = &[
    "ALWAYS present information in tabular format where possible",
    "Always include sources with dates of publication",
    "Structure your output with clear headings and bullet points",
    "For financial news, categorize information by market impact (Positive/Neutral/Negative) in a table format",
    "Include a summary of key takeaways at the end in a table format",
];

/// Market-data sub-agent.
pub const FINANCE_INSTRUCTIONS: &[&str] = &[
    "ALWAYS present ALL data in tabular format - no exceptions",
    "Present analyst recommendations with consensus ratings in a table (Strong Buy/Buy/Hold/Sell/Strong Sell)",
    "Include target price ranges and average price targets in a dedicated table",
    "Provide technical indicators with clear buy/sell signals in a table format",
    "Format all price data with appropriate currency symbols",
    "Present 'Timing Guidance' section with short-term, medium-term, and long-term outlooks in a table",
    "Add a 'Risk Assessment' section in tabular format highlighting potential downsides",
    "Structure output with clear headings: Summary, Price Data, Fundamentals, Analyst Views, Technical Analysis, Timing Guidance, Risk Assessment",
    "Even summary information must be presented in a table format",
];

/// Team lead that synthesizes the sub-agent reports into the final answer.
pub const TEAM_INSTRUCTIONS: &[&str] = &[
    "ALWAYS present ALL information in table format - this is mandatory",
    "Structure output with clear sections using markdown headings, with each section containing at least one table",
    "First use the Finance Agent report for detailed stock data",
    "Then use the Web Search Agent report for recent news and market sentiment",
    "Present ALL data in tables - never use paragraphs where tables can be used instead",
    "Include a 'Stock Fundamentals' table with key metrics and comparisons to industry averages",
    "Provide 'Analyst Consensus' table with specific ratings, target prices and timeframes",
    "Add 'Technical Analysis' table with key indicators and clear buy/sell signals",
    "Include 'Entry Points' table suggesting optimal buying opportunities based on technical patterns",
    "Add 'Investment Timeframe' table (Short-term trader vs. Long-term investor recommendations)",
    "Include 'Risk Assessment' table highlighting potential downside scenarios",
    "End with 'Action Plan' table summarizing recommendations with clear timing guidance",
    "Always cite sources for all external information in a dedicated sources table",
];

/// Tool-less assistant on the chat endpoint and dashboard.
pub const CHAT_INSTRUCTIONS: &[&str] = &[
    "You are a helpful financial assistant. Answer the user's question directly and concisely.",
    "Present information clearly. Use tables if appropriate for complex data.",
];

/// Join an instruction list into a single preamble string for a rig agent.
pub fn preamble(instructions: &[&str]) -> String {
    instructions.join("\n")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_analysis_prompt_exact() {
        assert_eq!(
            analysis_prompt("AAPL", AnalysisKind::FullAnalysis),
            "Provide comprehensive analysis for AAPL including current price, analyst recommendations, technical indicators, and investment outlook."
        );
    }

    #[test]
    fn test_news_impact_prompt_exact() {
        assert_eq!(
            analysis_prompt("TSLA", AnalysisKind::NewsImpact),
            "Find and summarize the latest news for TSLA with market impact assessment."
        );
    }

    #[test]
    fn test_prompt_accepts_punctuated_symbols() {
        // Symbols are not validated; class-share and index tickers go through as-is.
        assert_eq!(
            analysis_prompt("BRK.B", AnalysisKind::FullAnalysis),
            "Provide comprehensive analysis for BRK.B including current price, analyst recommendations, technical indicators, and investment outlook."
        );
        assert_eq!(
            analysis_prompt("^GSPC", AnalysisKind::NewsImpact),
            "Find and summarize the latest news for ^GSPC with market impact assessment."
        );
    }

    #[test]
    fn test_preamble_joins_lines() {
        let p = preamble(CHAT_INSTRUCTIONS);
        assert!(p.starts_with("You are a helpful financial assistant."));
        assert_eq!(p.lines().count(), CHAT_INSTRUCTIONS.len());
    }
}
