// Public module exports
pub mod analysis_team;
pub mod chat_agent;
pub mod delegate;

// Re-export main types for convenience
pub use analysis_team::AnalysisTeam;
pub use chat_agent::ChatAgent;
pub use delegate::{run_bounded, CancellationToken, Delegate, DelegateError};
