//! Centralized default constants for notewise.
//!
//! **This module is the single source of truth** for shared default values.
//! Both crates and the CLI reference these constants instead of defining
//! their own magic numbers.

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Ollama base URL.
pub const OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default generation model name (Ollama).
pub const GEN_MODEL: &str = "gpt-oss:20b";

/// Timeout for generation requests in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Generations slower than this are logged with `slow = true`.
pub const SLOW_GENERATION_MS: u64 = 30_000;

// =============================================================================
// NOTE CONTENT
// =============================================================================

/// Notes shorter than this (in characters, trimmed) are not worth summarizing.
pub const MIN_CONTENT_CHARS: usize = 20;

/// Upper bound on note content sent to the model, in characters.
///
/// Roughly 8k tokens for mixed Korean/English text.
pub const MAX_CONTENT_CHARS: usize = 16_000;

// =============================================================================
// SUMMARY & TAGS
// =============================================================================

/// Target summary length handed to the prompt, in sentences.
pub const SUMMARY_SENTENCES: usize = 3;

/// Maximum number of tags kept from a tag generation.
pub const MAX_TAGS: usize = 5;

/// Tags longer than this (in characters) are discarded.
pub const MAX_TAG_CHARS: usize = 32;
