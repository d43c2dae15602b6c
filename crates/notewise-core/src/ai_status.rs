//! AI processing status tracker.
//!
//! Holds a single snapshot `{status, process_type, message, error, timestamp}`
//! describing where a summary or tag generation currently stands. Callers
//! drive it through four unconditional setters (`set_loading`, `set_success`,
//! `set_error`, `reset`) and one guarded transition (`clear_error`):
//!
//! ```text
//!            set_loading        set_success / set_error
//!   Idle ─────────────────▶ Loading ─────────────────▶ Success | Error
//!    ▲                                                        │
//!    └──────────── reset (any state) / clear_error (Error) ───┘
//! ```
//!
//! Every setter replaces the whole snapshot; only `clear_error` carries prior
//! fields forward. A tracker is meant to be owned by exactly one logical
//! operation. When two operations share one, the last writer wins; the
//! [`AiStatusTracker::begin`] / [`AiStatusTracker::succeed_if_current`] pair
//! lets a caller drop completions that belong to a superseded operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

use crate::ai_error::AiErrorInfo;
use crate::models::ProcessType;

/// Phase of an AI operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl AiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for AiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Setter that produced a message; selects the default phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiAction {
    Loading,
    Success,
    Error,
}

/// Default user-facing message for a `(process type, action)` pair.
pub fn default_message(process_type: ProcessType, action: AiAction) -> &'static str {
    match (process_type, action) {
        (ProcessType::Summary, AiAction::Loading) => "요약 생성 중...",
        (ProcessType::Summary, AiAction::Success) => "요약 생성 완료",
        (ProcessType::Summary, AiAction::Error) => "요약 생성 실패",
        (ProcessType::Tags, AiAction::Loading) => "태그 생성 중...",
        (ProcessType::Tags, AiAction::Success) => "태그 생성 완료",
        (ProcessType::Tags, AiAction::Error) => "태그 생성 실패",
    }
}

/// Snapshot read by rendering code.
///
/// `error` is only meaningful while `status` is [`AiStatus::Error`]; it is
/// omitted from the serialized form otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiStatusState {
    pub status: AiStatus,
    pub process_type: Option<ProcessType>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl AiStatusState {
    pub fn is_idle(&self) -> bool {
        self.status == AiStatus::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status == AiStatus::Loading
    }

    pub fn is_error(&self) -> bool {
        self.status == AiStatus::Error
    }
}

/// Token identifying one begun operation on a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(Uuid);

impl OperationId {
    fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Mutable holder of the current [`AiStatusState`].
#[derive(Debug, Clone, Default)]
pub struct AiStatusTracker {
    state: AiStatusState,
    current_operation: Option<OperationId>,
    // Survives reset so timestamps never move backwards within a sequence.
    last_timestamp: Option<DateTime<Utc>>,
}

impl AiStatusTracker {
    /// Create an idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn state(&self) -> &AiStatusState {
        &self.state
    }

    pub fn status(&self) -> AiStatus {
        self.state.status
    }

    /// Operation started by the latest [`begin`](Self::begin), if still current.
    pub fn current_operation(&self) -> Option<OperationId> {
        self.current_operation
    }

    pub fn set_loading(&mut self, process_type: ProcessType, message: Option<&str>) {
        self.current_operation = None;
        self.replace(AiStatus::Loading, process_type, AiAction::Loading, message, None);
    }

    pub fn set_success(&mut self, process_type: ProcessType, message: Option<&str>) {
        self.current_operation = None;
        self.replace(AiStatus::Success, process_type, AiAction::Success, message, None);
    }

    /// Enter the error state. `error` is stored verbatim.
    pub fn set_error(
        &mut self,
        process_type: ProcessType,
        error: impl Into<String>,
        message: Option<&str>,
    ) {
        self.current_operation = None;
        self.replace(
            AiStatus::Error,
            process_type,
            AiAction::Error,
            message,
            Some(error.into()),
        );
    }

    /// Enter the error state with a classified failure's user-safe text.
    pub fn set_error_info(&mut self, process_type: ProcessType, info: &AiErrorInfo) {
        self.set_error(process_type, info.user_message.clone(), None);
    }

    /// Back to `{idle, None, ""}` regardless of the current state.
    pub fn reset(&mut self) {
        self.current_operation = None;
        self.state = AiStatusState::default();
        debug!(ai_status = %self.state.status, "AI status reset");
    }

    /// Leave the error state, keeping the process type and message on screen.
    ///
    /// No-op unless the status is [`AiStatus::Error`].
    pub fn clear_error(&mut self) {
        if !self.state.is_error() {
            return;
        }
        self.state.status = AiStatus::Idle;
        self.state.error = None;
        debug!(
            process_type = ?self.state.process_type,
            ai_status = %self.state.status,
            "AI error cleared"
        );
    }

    /// Start an operation: same as [`set_loading`](Self::set_loading), and
    /// returns a token that later completions must present.
    pub fn begin(&mut self, process_type: ProcessType, message: Option<&str>) -> OperationId {
        self.set_loading(process_type, message);
        let id = OperationId::new();
        self.current_operation = Some(id);
        debug!(operation_id = %id, process_type = %process_type, "AI operation begun");
        id
    }

    /// Apply [`set_success`](Self::set_success) only if `id` is still current.
    pub fn succeed_if_current(&mut self, id: OperationId, message: Option<&str>) -> bool {
        let Some(process_type) = self.current_process_type(id) else {
            return false;
        };
        self.set_success(process_type, message);
        true
    }

    /// Apply [`set_error`](Self::set_error) only if `id` is still current.
    pub fn fail_if_current(
        &mut self,
        id: OperationId,
        error: impl Into<String>,
        message: Option<&str>,
    ) -> bool {
        let Some(process_type) = self.current_process_type(id) else {
            return false;
        };
        self.set_error(process_type, error, message);
        true
    }

    fn current_process_type(&self, id: OperationId) -> Option<ProcessType> {
        if self.current_operation != Some(id) {
            debug!(operation_id = %id, "Ignoring completion of superseded AI operation");
            return None;
        }
        self.state.process_type
    }

    fn replace(
        &mut self,
        status: AiStatus,
        process_type: ProcessType,
        action: AiAction,
        message: Option<&str>,
        error: Option<String>,
    ) {
        let timestamp = self.next_timestamp();
        self.state = AiStatusState {
            status,
            process_type: Some(process_type),
            message: message
                .unwrap_or_else(|| default_message(process_type, action))
                .to_string(),
            error,
            timestamp: Some(timestamp),
        };
        debug!(
            process_type = %process_type,
            ai_status = %status,
            "AI status transition"
        );
    }

    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let timestamp = match self.last_timestamp {
            Some(previous) if previous > now => previous,
            _ => now,
        };
        self.last_timestamp = Some(timestamp);
        timestamp
    }
}
