use serde_json::Value as JsonValue;

/// Maximum plausible length for a device token. Anything longer is treated
/// as corrupt data rather than a deliverable target.
const MAX_TOKEN_LEN: usize = 4096;

/// A usable device token is a non-empty string of token-safe characters.
/// Filtering is a normal skip, not an error: malformed tokens never reach
/// the provider and are not counted in any failure metric.
pub fn is_valid_token(token: &str) -> bool {
    if token.is_empty() || token.len() > MAX_TOKEN_LEN {
        return false;
    }

    token
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == ':' || c == '.')
}

/// Extracts usable device tokens from raw snapshot fields. Documents may
/// carry absent, null, or non-string token values; only non-empty strings
/// survive.
pub fn collect_valid_tokens(raw: &[JsonValue]) -> Vec<String> {
    raw.iter()
        .filter_map(|value| value.as_str())
        .filter(|token| is_valid_token(token))
        .map(str::to_string)
        .collect()
}
