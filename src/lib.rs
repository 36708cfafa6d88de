pub mod agents;
pub mod error;

pub mod handlers;
pub mod init;
pub mod models;
pub mod prompts;
pub mod tools;

pub use crate::agents::{CancellationToken, Delegate, DelegateError};
pub use crate::init::{AppState, Config};
