use std::error::Error as StdError;

/// Failure of a single scoring attempt.
///
/// Callers treat every variant the same way; the variant only records where
/// the call broke down.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("scoring request failed: {0}")]
    Transport(String),
    #[error("scoring service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("scoring response could not be decoded: {0}")]
    Decode(String),
}

impl ScoringError {
    pub(crate) fn transport(err: &reqwest::Error) -> Self {
        Self::Transport(format_reqwest_error(err))
    }
}

fn format_reqwest_error(err: &reqwest::Error) -> String {
    // Keep chained causes so DNS/TLS/socket failures stay visible.
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !cause_msg.is_empty() && !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }

    message
}

pub(crate) fn summarize_response_body(raw: &str) -> String {
    const MAX_CHARS: usize = 800;
    let compact = raw.replace(['\n', '\r'], " ");
    if compact.chars().count() > MAX_CHARS {
        let truncated: String = compact.chars().take(MAX_CHARS).collect();
        format!("{}…", truncated)
    } else {
        compact
    }
}
