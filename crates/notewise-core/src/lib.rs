//! # notewise-core
//!
//! Core types, traits, and abstractions for the notewise note-taking service.
//!
//! This crate provides the AI processing status model (a four-state tracker
//! that drives loading/success/error feedback while a summary or tag set is
//! generated), the closed AI error taxonomy with its classifier, and the note
//! models and trait seams the inference crate builds on.

pub mod ai_error;
pub mod ai_status;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use ai_error::{classify, classify_http_status, classify_message, AiErrorInfo, AiErrorKind};
pub use ai_status::{default_message, AiAction, AiStatus, AiStatusState, AiStatusTracker, OperationId};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
