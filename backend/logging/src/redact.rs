//! Log Redaction
//!
//! Scrubs API keys and bearer tokens from provider error text before it is
//! logged. Upstream services sometimes echo the request headers back.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9_\-]{20,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});

static KEY_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([?&](?:key|api_key|apikey)=)[^&\s]+").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    KEY_PARAM_RE
        .replace_all(&redacted, "${1}[REDACTED_TOKEN]")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "401 from upstream: Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9 rejected";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
        assert!(clean.contains("[REDACTED_TOKEN]"));
    }

    #[test]
    fn test_openai_style_key() {
        let raw = "Incorrect API key provided: sk-proj-abcdefghijklmnopqrstuvwxyz012345";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("abcdefghijklmnop"));
    }

    #[test]
    fn test_query_param_key() {
        let clean = redact_sensitive_data("GET https://classify.local/v1?key=hunter2&x=1");
        assert_eq!(clean, "GET https://classify.local/v1?key=[REDACTED_TOKEN]&x=1");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(redact_sensitive_data("Max is hungry"), "Max is hungry");
    }
}
