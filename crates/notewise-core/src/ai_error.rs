//! AI error taxonomy and classification.
//!
//! Every failure on the way to a summary or tag set is normalized into exactly
//! one [`AiErrorInfo`] before it reaches the status tracker. The tracker never
//! interprets error text; it only stores and displays `user_message`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::Error;

/// Closed set of AI failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiErrorKind {
    /// Caller is not signed in, or the provider rejected our credentials.
    Authentication,
    /// Caller is signed in but may not touch the resource.
    Authorization,
    /// Prompt or response did not fit the model's context window.
    TokenLimitExceeded,
    /// Transport failure: connect, reset, timeout.
    Network,
    /// Provider answered with an error.
    Api,
    /// Provider answered, but the response could not be understood.
    Parsing,
    /// Reading or writing the note failed.
    Database,
    /// The input was rejected before any AI call.
    Validation,
    Unknown,
}

impl AiErrorKind {
    pub const ALL: [AiErrorKind; 9] = [
        Self::Authentication,
        Self::Authorization,
        Self::TokenLimitExceeded,
        Self::Network,
        Self::Api,
        Self::Parsing,
        Self::Database,
        Self::Validation,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::TokenLimitExceeded => "token-limit-exceeded",
            Self::Network => "network",
            Self::Api => "api",
            Self::Parsing => "parsing",
            Self::Database => "database",
            Self::Validation => "validation",
            Self::Unknown => "unknown",
        }
    }

    /// Whether re-running the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network | Self::Api | Self::Parsing | Self::Database | Self::Unknown => true,
            Self::Authentication
            | Self::Authorization
            | Self::TokenLimitExceeded
            | Self::Validation => false,
        }
    }

    /// Text safe to show to an end user.
    pub fn default_user_message(&self) -> &'static str {
        match self {
            Self::Authentication => "로그인이 필요합니다. 다시 로그인해 주세요.",
            Self::Authorization => "이 노트에 대한 권한이 없습니다.",
            Self::TokenLimitExceeded => "노트가 너무 길어 AI가 처리할 수 없습니다. 내용을 줄여 주세요.",
            Self::Network => "네트워크 연결을 확인한 후 다시 시도해 주세요.",
            Self::Api => "AI 서비스에서 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.",
            Self::Parsing => "AI 응답을 해석하지 못했습니다. 다시 시도해 주세요.",
            Self::Database => "노트를 저장하는 중 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.",
            Self::Validation => "입력 내용을 확인해 주세요.",
            Self::Unknown => "알 수 없는 오류가 발생했습니다. 다시 시도해 주세요.",
        }
    }
}

impl fmt::Display for AiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiErrorInfo {
    #[serde(rename = "type")]
    pub kind: AiErrorKind,
    /// Diagnostic text; not for display.
    pub message: String,
    /// Non-empty text safe for direct display.
    pub user_message: String,
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AiErrorInfo {
    /// Build with the kind's default user message and retry policy.
    pub fn new(kind: AiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            user_message: kind.default_user_message().to_string(),
            retryable: kind.is_retryable(),
            details: None,
        }
    }

    /// Override the user message. Blank text keeps the default.
    pub fn with_user_message(mut self, user_message: impl Into<String>) -> Self {
        let user_message = user_message.into();
        if !user_message.trim().is_empty() {
            self.user_message = user_message;
        }
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for AiErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AiErrorInfo {}

impl From<&Error> for AiErrorInfo {
    fn from(err: &Error) -> Self {
        classify(err)
    }
}

impl From<Error> for AiErrorInfo {
    fn from(err: Error) -> Self {
        classify(&err)
    }
}

/// Map a provider HTTP status (and response body) to an error kind.
pub fn classify_http_status(status: u16, body: &str) -> AiErrorKind {
    match status {
        401 => AiErrorKind::Authentication,
        403 => AiErrorKind::Authorization,
        413 => AiErrorKind::TokenLimitExceeded,
        _ if mentions_token_limit(body) => AiErrorKind::TokenLimitExceeded,
        400 | 422 => AiErrorKind::Validation,
        429 | 500..=599 => AiErrorKind::Api,
        _ => AiErrorKind::Unknown,
    }
}

/// Normalize a core [`Error`] into exactly one [`AiErrorInfo`].
pub fn classify(err: &Error) -> AiErrorInfo {
    let message = err.to_string();
    match err {
        Error::Unauthorized(_) => AiErrorInfo::new(AiErrorKind::Authentication, message),
        Error::Forbidden(_) => AiErrorInfo::new(AiErrorKind::Authorization, message),
        Error::TokenLimit(_) => AiErrorInfo::new(AiErrorKind::TokenLimitExceeded, message),
        Error::Request(_) | Error::Timeout(_) => AiErrorInfo::new(AiErrorKind::Network, message),
        Error::Api { status, message: body } => {
            AiErrorInfo::new(classify_http_status(*status, body), message)
                .with_details(serde_json::json!({ "status": status }))
        }
        Error::Inference(text) => classify_message(text),
        Error::Serialization(_) => AiErrorInfo::new(AiErrorKind::Parsing, message),
        Error::Database(_) => AiErrorInfo::new(AiErrorKind::Database, message),
        Error::InvalidInput(_) | Error::NotFound(_) | Error::NoteNotFound(_) => {
            AiErrorInfo::new(AiErrorKind::Validation, message)
        }
        Error::Config(_) | Error::Internal(_) | Error::Io(_) => {
            AiErrorInfo::new(AiErrorKind::Unknown, message)
        }
    }
}

/// Keyword rules for [`classify_message`], checked in order.
///
/// Keywords match whole words only. Credential phrases come before the
/// generic "invalid" validation rule.
fn message_rules() -> &'static [(AiErrorKind, Regex)] {
    static RULES: OnceLock<Vec<(AiErrorKind, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (
                AiErrorKind::Authentication,
                r"unauthori[sz]ed|unauthenticated|invalid api key|(?:invalid|expired) token|token (?:is )?expired|jwt|not signed in",
            ),
            (AiErrorKind::Authorization, r"forbidden|permission denied|not allowed"),
            (
                AiErrorKind::Network,
                r"timeout|timed out|connection|network|dns|econnreset|econnrefused",
            ),
            (
                AiErrorKind::Parsing,
                r"json|pars(?:e|er|ing)|unexpected token|deserializ(?:e|ation)",
            ),
            (
                AiErrorKind::Database,
                r"database|postgres(?:ql)?|sql|constraint|deadlock",
            ),
            (
                AiErrorKind::Api,
                r"rate limit(?:ed)?|too many requests|server error|overloaded|api",
            ),
            (AiErrorKind::Validation, r"invalid|required|too short|empty"),
        ]
        .into_iter()
        .map(|(kind, words)| {
            let pattern = format!(r"(?i)\b(?:{})\b", words);
            let re = Regex::new(&pattern).expect("message rule regex is valid");
            (kind, re)
        })
        .collect()
    })
}

/// Best-effort classification of a raw failure message.
///
/// Falls back to [`AiErrorKind::Unknown`] when nothing matches.
pub fn classify_message(text: &str) -> AiErrorInfo {
    let kind = if mentions_token_limit(text) {
        AiErrorKind::TokenLimitExceeded
    } else {
        message_rules()
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(kind, _)| *kind)
            .unwrap_or(AiErrorKind::Unknown)
    };

    AiErrorInfo::new(kind, text)
}

fn mentions_token_limit(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("context length")
        || lower.contains("context_length")
        || lower.contains("token limit")
        || lower.contains("maximum context")
        || lower.contains("too many tokens")
}
