//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notewise_inference::mock::MockGenerationBackend;
//!
//! let backend = MockGenerationBackend::new()
//!     .with_fixed_response("요약입니다.")
//!     .with_failure(Error::Timeout("120s".into()));
//!
//! // First call fails, every later call answers "요약입니다."
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use notewise_core::{Error, GenerationBackend, Result};

/// Mock generation backend.
///
/// Scripted replies are consumed in order; once they run out every call gets
/// the default response.
#[derive(Clone)]
pub struct MockGenerationBackend {
    model: String,
    default_response: String,
    healthy: bool,
    script: Arc<Mutex<VecDeque<Result<String>>>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

/// One recorded generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
    pub json: bool,
}

impl MockGenerationBackend {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            default_response: "Mock response".to_string(),
            healthy: true,
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Response returned once scripted replies run out.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// Queue a successful reply.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        lock(&self.script).push_back(Ok(response.into()));
        self
    }

    /// Queue a failing reply.
    pub fn with_failure(self, error: Error) -> Self {
        lock(&self.script).push_back(Err(error));
        self
    }

    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.call_log).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.call_log).len()
    }

    fn reply(&self, system: &str, prompt: &str, json: bool) -> Result<String> {
        lock(&self.call_log).push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            json,
        });
        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_response.clone()))
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

// A panicking test thread must not hide the log from the others.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.reply(system, prompt, false)
    }

    async fn generate_json_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.reply(system, prompt, true)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_response() {
        let backend = MockGenerationBackend::new().with_fixed_response("hello");
        assert_eq!(backend.generate("p").await.unwrap(), "hello");
        assert_eq!(backend.generate("p").await.unwrap(), "hello");
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_script_consumed_in_order() {
        let backend = MockGenerationBackend::new()
            .with_failure(Error::Timeout("slow".into()))
            .with_response("second")
            .with_fixed_response("rest");

        assert!(matches!(backend.generate("a").await, Err(Error::Timeout(_))));
        assert_eq!(backend.generate("b").await.unwrap(), "second");
        assert_eq!(backend.generate("c").await.unwrap(), "rest");
    }

    #[tokio::test]
    async fn test_call_log_records_mode() {
        let backend = MockGenerationBackend::new();
        backend.generate_with_system("sys", "plain").await.unwrap();
        backend.generate_json_with_system("sys", "json").await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert!(!calls[0].json);
        assert!(calls[1].json);
        assert_eq!(calls[1].system, "sys");
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let backend = MockGenerationBackend::new();
        let clone = backend.clone();
        clone.generate("x").await.unwrap();
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_health() {
        let backend = MockGenerationBackend::new().with_health(false);
        assert!(!backend.health_check().await.unwrap());
    }
}
