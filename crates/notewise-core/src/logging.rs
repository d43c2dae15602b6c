//! Structured logging field name constants for notewise.
//!
//! Both crates use these constants for consistent structured logging fields,
//! so log queries can filter on the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Non-retryable AI failure, requires user or operator action |
//! | WARN  | Retryable failure, slow generation |
//! | INFO  | Lifecycle events (startup), operation completions |
//! | DEBUG | Status transitions, decision points, config choices |
//! | TRACE | Raw prompts and responses |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "core", "inference", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "ollama", "processor", "status"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "generate", "summarize", "tag"
pub const OPERATION: &str = "op";

/// Token of an in-flight AI operation (UUIDv7).
pub const OPERATION_ID: &str = "operation_id";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note UUID being operated on.
pub const NOTE_ID: &str = "note_id";

/// Authenticated user UUID.
pub const USER_ID: &str = "user_id";

/// AI process type ("summary", "tags").
pub const PROCESS_TYPE: &str = "process_type";

/// AI status after a transition ("idle", "loading", "success", "error").
pub const AI_STATUS: &str = "ai_status";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Number of tags produced.
pub const TAG_COUNT: &str = "tag_count";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

/// HTTP status returned by the AI provider.
pub const HTTP_STATUS: &str = "http_status";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Classified AI error kind.
pub const ERROR_KIND: &str = "error_kind";

/// Whether the classified failure may be retried.
pub const RETRYABLE: &str = "retryable";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
