//! Interactive console surface.
//!
//! Console rendition of the two-view dashboard: a market-analysis view
//! (ticker + analysis kind + shortcut tickers) and an assistant view with a
//! session transcript. Markdown from the delegate is printed verbatim.

use std::io::Write;
use std::str::FromStr;

use tokio::io::{AsyncBufReadExt, BufReader};

use finsight_agent::agents::{run_bounded, CancellationToken, Delegate};
use finsight_agent::error::AppError;
use finsight_agent::init::{build_state, Config};
use finsight_agent::models::{AnalysisKind, ChatRole, Transcript};
use finsight_agent::prompts::analysis_prompt;

const SHORTCUT_TICKERS: [&str; 4] = ["AAPL", "MSFT", "GOOGL", "TSLA"];

struct Dashboard {
    symbol: String,
    kind: AnalysisKind,
    transcript: Transcript,
}

impl Dashboard {
    fn new(history_limit: usize) -> Self {
        Self {
            symbol: "AAPL".to_string(),
            kind: AnalysisKind::default(),
            transcript: Transcript::new(history_limit),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  analyze [SYMBOL] [complete|news]  run the selected analysis");
    println!("  symbol <SYMBOL>      set the ticker without analyzing");
    println!("  kind <complete|news> choose the analysis kind");
    println!("  AAPL|MSFT|GOOGL|TSLA shortcut: pre-fill a popular ticker");
    println!("  history              show the assistant transcript");
    println!("  status               show current ticker and kind");
    println!("  quit                 exit");
    println!("Anything else is sent to the assistant as a question.");
}

/// Run a delegate call with a spinner line; Ctrl-C cancels the pending call
/// instead of killing the session.
async fn call_delegate(
    delegate: &dyn Delegate,
    prompt: &str,
    timeout: std::time::Duration,
    activity: &str,
) -> Result<String, AppError> {
    println!("{}", activity);

    let token = CancellationToken::new();
    let call = run_bounded(delegate, prompt, timeout, &token);
    tokio::pin!(call);

    let result = tokio::select! {
        result = &mut call => result,
        _ = tokio::signal::ctrl_c() => {
            token.cancel();
            call.await
        }
    };

    result.map_err(AppError::from)
}

fn parse_kind(raw: &str) -> Option<AnalysisKind> {
    match raw.to_ascii_lowercase().as_str() {
        "complete" | "full" => Some(AnalysisKind::FullAnalysis),
        "news" => Some(AnalysisKind::NewsImpact),
        other => AnalysisKind::from_str(other).ok(),
    }
}

/// Arguments of `analyze [SYMBOL] [kind]`. Both tokens are optional; an
/// unrecognized kind token is an error rather than a silent default.
fn parse_analyze_args<'a>(
    mut words: impl Iterator<Item = &'a str>,
) -> Result<(Option<String>, Option<AnalysisKind>), String> {
    let symbol = words.next().map(str::to_uppercase);
    let kind = match words.next() {
        None => None,
        Some(raw) => Some(
            parse_kind(raw)
                .ok_or_else(|| format!("Unknown analysis kind '{}'; expected complete or news", raw))?,
        ),
    };
    Ok((symbol, kind))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    dotenv::dotenv().ok();

    // Credentials are not validated here; a missing key surfaces as a
    // delegate error on first use, same as the original dashboard.
    let config = Config::from_env_lenient()?;
    let state = build_state(&config)?;

    let mut dashboard = Dashboard::new(config.chat_history_limit);

    println!("Stock Analysis Dashboard");
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();

        match command {
            "quit" | "exit" => break,
            "help" => print_help(),
            "status" => {
                println!("Ticker: {}  Kind: {}", dashboard.symbol, dashboard.kind);
            }
            "symbol" => match words.next() {
                Some(symbol) => {
                    dashboard.symbol = symbol.to_uppercase();
                    println!("Ticker set to {}", dashboard.symbol);
                }
                None => println!("Usage: symbol <SYMBOL>"),
            },
            "kind" => match words.next().and_then(parse_kind) {
                Some(kind) => {
                    dashboard.kind = kind;
                    println!("Analysis kind set to {}", kind);
                }
                None => println!("Usage: kind <complete|news>"),
            },
            // Shortcut tickers pre-fill the symbol but do not analyze.
            _ if SHORTCUT_TICKERS.contains(&line) => {
                dashboard.symbol = line.to_string();
                println!("Ticker set to {}", dashboard.symbol);
            }
            "history" => {
                if dashboard.transcript.is_empty() {
                    println!("No conversation yet.");
                }
                for turn in dashboard.transcript.turns() {
                    let label = match turn.role {
                        ChatRole::User => "You",
                        ChatRole::Assistant => "Assistant",
                    };
                    println!("{}: {}", label, turn.content);
                }
            }
            "analyze" => {
                match parse_analyze_args(words) {
                    Ok((symbol, kind)) => {
                        if let Some(symbol) = symbol {
                            dashboard.symbol = symbol;
                        }
                        if let Some(kind) = kind {
                            dashboard.kind = kind;
                        }
                    }
                    Err(message) => {
                        println!("{}", message);
                        continue;
                    }
                }
                let prompt = analysis_prompt(&dashboard.symbol, dashboard.kind);
                let result = call_delegate(
                    state.analysis.as_ref(),
                    &prompt,
                    config.delegate_timeout,
                    "Analyzing market data...",
                )
                .await;

                match result {
                    Ok(markdown) => {
                        println!("\n{} - {}\n", dashboard.symbol, dashboard.kind);
                        println!("{}", markdown);
                    }
                    Err(err) => println!("Error: {}", err.message),
                }
            }
            _ => {
                // Assistant view: the raw line is the prompt.
                dashboard.transcript.push(ChatRole::User, line);
                let result = call_delegate(
                    state.chat.as_ref(),
                    line,
                    config.delegate_timeout,
                    "Thinking...",
                )
                .await;

                match result {
                    Ok(markdown) => {
                        println!("{}", markdown);
                        dashboard.transcript.push(ChatRole::Assistant, markdown);
                    }
                    Err(err) => println!("Error: {}", err.message),
                }
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_args_symbol_only() {
        let (symbol, kind) = parse_analyze_args("aapl".split_whitespace()).unwrap();
        assert_eq!(symbol.as_deref(), Some("AAPL"));
        assert_eq!(kind, None);
    }

    #[test]
    fn test_analyze_args_with_kind() {
        let (symbol, kind) = parse_analyze_args("AAPL news".split_whitespace()).unwrap();
        assert_eq!(symbol.as_deref(), Some("AAPL"));
        assert_eq!(kind, Some(AnalysisKind::NewsImpact));

        let (_, kind) = parse_analyze_args("MSFT complete".split_whitespace()).unwrap();
        assert_eq!(kind, Some(AnalysisKind::FullAnalysis));
    }

    #[test]
    fn test_analyze_args_rejects_unknown_kind() {
        let err = parse_analyze_args("AAPL bogus".split_whitespace()).unwrap_err();
        assert!(err.contains("bogus"));
    }

    #[test]
    fn test_analyze_args_empty() {
        let (symbol, kind) = parse_analyze_args("".split_whitespace()).unwrap();
        assert_eq!(symbol, None);
        assert_eq!(kind, None);
    }
}
