use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum_macros::{Display, EnumString};

// ============================================================================
// Analysis Kind
// ============================================================================

/// The two analysis flavours the dashboard and `/analyze` expose. Wire names
/// match the selector labels the original UI used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum AnalysisKind {
    #[strum(serialize = "Complete Analysis")]
    FullAnalysis,
    #[strum(serialize = "News Impact")]
    NewsImpact,
}

impl Default for AnalysisKind {
    fn default() -> Self {
        Self::FullAnalysis
    }
}

// ============================================================================
// HTTP Request Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub stock_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_question: Option<String>,
}

// ============================================================================
// HTTP Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub stock_symbol: String,
    pub analysis_type: String,
    pub data: String,
}

impl AnalyzeResponse {
    pub fn success(symbol: String, kind: AnalysisKind, data: String) -> Self {
        Self {
            status: "success".to_string(),
            stock_symbol: symbol,
            analysis_type: kind.to_string(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub status: String,
    pub user_question: String,
    pub data: String,
}

impl ChatResponse {
    pub fn success(question: String, data: String) -> Self {
        Self {
            status: "success".to_string(),
            user_question: question,
            data,
        }
    }
}

// ============================================================================
// Chat Transcript
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Session-scoped, append-only conversation log for the dashboard.
///
/// Insertion order is preserved and never rewritten; the only mutation
/// besides `push` is eviction of the oldest turns once `limit` is exceeded,
/// so memory stays bounded for long-running sessions. Eviction removes two
/// turns at a time, so an alternating conversation never ends up starting
/// with an orphaned assistant turn.
#[derive(Debug, Clone)]
pub struct Transcript {
    turns: VecDeque<ChatTurn>,
    limit: usize,
}

impl Transcript {
    pub fn new(limit: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            limit: limit.max(2),
        }
    }

    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) {
        if self.turns.len() >= self.limit {
            self.turns.pop_front();
            self.turns.pop_front();
        }
        self.turns.push_back(ChatTurn {
            role,
            content: content.into(),
        });
    }

    pub fn turns(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(AnalysisKind::FullAnalysis.to_string(), "Complete Analysis");
        assert_eq!(AnalysisKind::NewsImpact.to_string(), "News Impact");
        assert_eq!(
            AnalysisKind::from_str("Complete Analysis").unwrap(),
            AnalysisKind::FullAnalysis
        );
        assert_eq!(
            AnalysisKind::from_str("News Impact").unwrap(),
            AnalysisKind::NewsImpact
        );
    }

    #[test]
    fn test_kind_rejects_unknown() {
        assert!(AnalysisKind::from_str("Bogus").is_err());
        assert!(AnalysisKind::from_str("complete analysis").is_err());
        assert!(AnalysisKind::from_str("").is_err());
    }

    #[test]
    fn test_kind_default() {
        assert_eq!(AnalysisKind::default(), AnalysisKind::FullAnalysis);
    }

    #[test]
    fn test_analyze_response_envelope() {
        let resp = AnalyzeResponse::success(
            "AAPL".to_string(),
            AnalysisKind::FullAnalysis,
            "| table |".to_string(),
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["stock_symbol"], "AAPL");
        assert_eq!(json["analysis_type"], "Complete Analysis");
        assert_eq!(json["data"], "| table |");
    }

    #[test]
    fn test_chat_response_envelope() {
        let resp = ChatResponse::success(
            "How do interest rates affect stocks?".to_string(),
            "X".to_string(),
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["user_question"], "How do interest rates affect stocks?");
        assert_eq!(json["data"], "X");
    }

    #[test]
    fn test_transcript_order_preserved() {
        let mut transcript = Transcript::new(100);
        transcript.push(ChatRole::User, "a");
        transcript.push(ChatRole::Assistant, "b");
        transcript.push(ChatRole::User, "c");

        let turns: Vec<_> = transcript.turns().collect();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, ChatRole::User);
        assert_eq!(turns[0].content, "a");
        assert_eq!(turns[1].role, ChatRole::Assistant);
        assert_eq!(turns[1].content, "b");
        assert_eq!(turns[2].role, ChatRole::User);
        assert_eq!(turns[2].content, "c");
    }

    #[test]
    fn test_transcript_evicts_oldest() {
        let mut transcript = Transcript::new(4);
        for i in 0..6 {
            transcript.push(ChatRole::User, format!("turn-{}", i));
        }
        assert_eq!(transcript.len(), 4);

        let contents: Vec<_> = transcript.turns().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["turn-2", "turn-3", "turn-4", "turn-5"]);
    }

    #[test]
    fn test_transcript_eviction_keeps_pairs_aligned() {
        // A capped alternating conversation must still start with a user
        // turn after eviction, never an orphaned assistant reply.
        let mut transcript = Transcript::new(4);
        transcript.push(ChatRole::User, "q1");
        transcript.push(ChatRole::Assistant, "a1");
        transcript.push(ChatRole::User, "q2");
        transcript.push(ChatRole::Assistant, "a2");
        transcript.push(ChatRole::User, "q3");

        let turns: Vec<_> = transcript.turns().collect();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, ChatRole::User);
        assert_eq!(turns[0].content, "q2");
        assert_eq!(turns[1].content, "a2");
        assert_eq!(turns[2].content, "q3");
    }

    #[test]
    fn test_transcript_minimum_capacity() {
        // A degenerate limit still keeps one user/assistant pair.
        let mut transcript = Transcript::new(0);
        transcript.push(ChatRole::User, "q");
        transcript.push(ChatRole::Assistant, "a");
        assert_eq!(transcript.len(), 2);
    }
}
