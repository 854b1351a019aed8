use serde_json::Value;

/// Normalise a recipient-like argument into an ordered address list.
///
/// Never fails: anything unrecognised becomes a single best-effort entry.
pub fn parse_recipients(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(text) => parse_recipient_text(text),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text.trim().to_string()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .filter(|entry| !entry.is_empty())
            .collect(),
        other => vec![other.to_string()],
    }
}

/// Parse free text as a JSON list first, then as a comma-delimited list.
pub fn parse_recipient_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('[') || trimmed.starts_with('"') {
        if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
            if matches!(parsed, Value::Array(_) | Value::String(_)) {
                return parse_recipients(&parsed);
            }
        }
    }

    trimmed
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_recipients(recipients: &[String]) -> String {
    recipients.join(", ")
}
