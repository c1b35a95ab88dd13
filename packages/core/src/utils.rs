// ABOUTME: Shared string helpers for Agentdesk
// ABOUTME: Truncation for sanitized messages and masking for stored credentials

/// Truncate a string to at most `max_chars` characters, appending "..." when cut
pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Last four characters of a credential, for display in masked listings
pub fn key_hint(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    chars[chars.len() - 4..].iter().collect()
}

/// Credential prefix safe for log lines (at most the first 4 characters)
pub fn redact_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "<none>".to_string();
    }
    let prefix: String = secret.chars().take(4).collect();
    format!("{}***", prefix)
}
