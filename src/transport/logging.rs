use crate::util::parse_bool_str;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_PATH: &str = "/tmp/mailcards.log";
const DEFAULT_FILTER: &str = "mailcards=info";
const DEBUG_PAYLOAD_ENV: &str = "MAILCARDS_DEBUG_PAYLOAD";
const LOG_PATH_ENV: &str = "MAILCARDS_LOG_PATH";

pub fn debug_payload_enabled() -> bool {
    std::env::var(DEBUG_PAYLOAD_ENV)
        .ok()
        .and_then(|v| parse_bool_str(&v))
        .unwrap_or(false)
}

/// Install the global subscriber. The TUI owns the terminal, so logs go to a
/// file whenever stderr is interactive.
pub fn init_tracing() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false);

    let installed = match resolve_log_path() {
        Some(path) => {
            let file = open_log_file(&path)?;
            builder.with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    if let Err(error) = installed {
        anyhow::bail!("failed to install tracing subscriber: {error}");
    }
    Ok(())
}

pub fn emit_debug_payload(request_url: &str, payload: &Value) {
    let formatted_payload = serde_json::to_string_pretty(payload)
        .unwrap_or_else(|_| "<payload serialization error>".to_string());
    tracing::debug!(url = request_url, "resume payload\n{formatted_payload}");
}

pub fn emit_sse_parse_error(
    event_type: Option<&str>,
    json_data: &str,
    parse_error: &serde_json::Error,
) {
    tracing::error!(
        event_type = event_type.unwrap_or("<none>"),
        error = %parse_error,
        "sse event skipped\ndata:\n{json_data}"
    );
}

fn open_log_file(path: &str) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn resolve_log_path() -> Option<String> {
    std::env::var(LOG_PATH_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            if std::io::stderr().is_terminal() {
                Some(DEFAULT_LOG_PATH.to_string())
            } else {
                None
            }
        })
}
