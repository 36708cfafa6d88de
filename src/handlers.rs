use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::agents::{run_bounded, CancellationToken};
use crate::error::{log_error, AppError, Result};
use crate::init::AppState;
use crate::models::{AnalysisKind, AnalyzeRequest, AnalyzeResponse, ChatRequest, ChatResponse};
use crate::prompts::analysis_prompt;

// ============================================================================
// Request Validation
// ============================================================================

/// Pull a validated (symbol, kind) pair out of the request, without touching
/// the delegate. Defaulting and rejection both happen here.
fn validate_analyze(request: &AnalyzeRequest) -> Result<(String, AnalysisKind)> {
    let symbol = request
        .stock_symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::validation("Missing 'stock_symbol' in request"))?;

    let kind = match request.analysis_type.as_deref() {
        None => AnalysisKind::default(),
        Some(raw) => AnalysisKind::from_str(raw).map_err(|_| {
            AppError::validation(
                "Invalid 'analysis_type'. Must be 'Complete Analysis' or 'News Impact'.",
            )
        })?,
    };

    Ok((symbol.to_string(), kind))
}

fn validate_chat(request: &ChatRequest) -> Result<String> {
    request
        .user_question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::validation("Missing 'user_question' in request"))
}

fn unwrap_body<T>(
    body: std::result::Result<Json<T>, JsonRejection>,
) -> Result<T> {
    body.map(|Json(inner)| inner)
        .map_err(|_| AppError::bad_request("Invalid JSON payload"))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /analyze
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>> {
    let request = unwrap_body(body).inspect_err(log_error)?;
    let (symbol, kind) = validate_analyze(&request).inspect_err(log_error)?;

    let request_id = Uuid::now_v7();
    log::info!("[{}] Running analysis team for: {} ({})", request_id, symbol, kind);

    let prompt = analysis_prompt(&symbol, kind);
    let token = CancellationToken::new();
    let data = run_bounded(
        state.analysis.as_ref(),
        &prompt,
        state.delegate_timeout,
        &token,
    )
    .await
    .map_err(AppError::from)
    .inspect_err(log_error)?;

    log::info!("[{}] Analysis completed for {}", request_id, symbol);
    Ok(Json(AnalyzeResponse::success(symbol, kind, data)))
}

/// POST /chat
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let request = unwrap_body(body).inspect_err(log_error)?;
    let question = validate_chat(&request).inspect_err(log_error)?;

    let request_id = Uuid::now_v7();
    log::info!("[{}] Processing chat question", request_id);

    let token = CancellationToken::new();
    let data = run_bounded(
        state.chat.as_ref(),
        &question,
        state.delegate_timeout,
        &token,
    )
    .await
    .map_err(AppError::from)
    .inspect_err(log_error)?;

    log::info!("[{}] Chat completed", request_id);
    Ok(Json(ChatResponse::success(question, data)))
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ============================================================================
// Tests
// ============================================================================
