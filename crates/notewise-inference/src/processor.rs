//! Summary and tag generation driving an [`AiStatusTracker`].
//!
//! Each operation moves the caller's tracker to loading, runs the model, and
//! leaves the tracker in success or error. Failures are classified once into
//! an [`AiErrorInfo`]; the tracker receives its user-safe message and the
//! caller receives the full info (including `retryable`).

use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use notewise_core::{
    classify, AiErrorInfo, AiStatusTracker, Error, GenerationBackend, ProcessType, Result,
};

use crate::config::ProcessingConfig;
use crate::prompts;

/// Text-level AI operations over a generation backend.
pub struct AiProcessor<B> {
    backend: B,
    config: ProcessingConfig,
}

impl<B: GenerationBackend> AiProcessor<B> {
    pub fn new(backend: B, config: ProcessingConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Summarize `content`, reporting progress through `tracker`.
    #[instrument(skip(self, title, content, tracker), fields(subsystem = "inference", component = "processor", op = "summarize", process_type = "summary", model = %self.backend.model_name()))]
    pub async fn summarize_text(
        &self,
        title: &str,
        content: &str,
        tracker: &mut AiStatusTracker,
    ) -> std::result::Result<String, AiErrorInfo> {
        tracker.set_loading(ProcessType::Summary, None);
        match self.summarize_inner(title, content).await {
            Ok(summary) => {
                tracker.set_success(ProcessType::Summary, None);
                Ok(summary)
            }
            Err(err) => Err(record_failure(tracker, ProcessType::Summary, &err)),
        }
    }

    /// Generate tags for `content`, reporting progress through `tracker`.
    #[instrument(skip(self, title, content, tracker), fields(subsystem = "inference", component = "processor", op = "tag", process_type = "tags", model = %self.backend.model_name()))]
    pub async fn tag_text(
        &self,
        title: &str,
        content: &str,
        tracker: &mut AiStatusTracker,
    ) -> std::result::Result<Vec<String>, AiErrorInfo> {
        tracker.set_loading(ProcessType::Tags, None);
        match self.tag_inner(title, content).await {
            Ok(tags) => {
                tracker.set_success(ProcessType::Tags, None);
                Ok(tags)
            }
            Err(err) => Err(record_failure(tracker, ProcessType::Tags, &err)),
        }
    }

    pub(crate) async fn summarize_inner(&self, title: &str, content: &str) -> Result<String> {
        self.validate_content(content)?;
        let start = Instant::now();

        let prompt = prompts::summary_prompt(title, content, self.config.summary_sentences);
        let raw = self
            .backend
            .generate_with_system(prompts::SUMMARY_SYSTEM_PROMPT, &prompt)
            .await?;
        let summary = prompts::parse_summary(&raw)?;

        info!(
            success = true,
            response_len = summary.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Summary generated"
        );
        Ok(summary)
    }

    pub(crate) async fn tag_inner(&self, title: &str, content: &str) -> Result<Vec<String>> {
        self.validate_content(content)?;
        let start = Instant::now();

        let prompt = prompts::tags_prompt(title, content, self.config.max_tags);
        let raw = self
            .backend
            .generate_json_with_system(prompts::TAGS_SYSTEM_PROMPT, &prompt)
            .await?;
        let tags = prompts::parse_tags(&raw, self.config.max_tags)?;

        info!(
            success = true,
            tag_count = tags.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Tags generated"
        );
        Ok(tags)
    }

    fn validate_content(&self, content: &str) -> Result<()> {
        let chars = content.trim().chars().count();
        if chars == 0 {
            return Err(Error::InvalidInput("Note content is empty".to_string()));
        }
        if chars < self.config.min_content_chars {
            return Err(Error::InvalidInput(format!(
                "Note content is too short to process ({} < {} characters)",
                chars, self.config.min_content_chars
            )));
        }
        if chars > self.config.max_content_chars {
            return Err(Error::TokenLimit(format!(
                "Note content is too long to process ({} > {} characters)",
                chars, self.config.max_content_chars
            )));
        }
        debug!(content_chars = chars, "Content accepted");
        Ok(())
    }
}

/// Classify `err`, log it, and put the tracker into the error state.
pub(crate) fn record_failure(
    tracker: &mut AiStatusTracker,
    process_type: ProcessType,
    err: &Error,
) -> AiErrorInfo {
    let info = classify(err);
    if info.retryable {
        warn!(
            process_type = %process_type,
            error_kind = %info.kind,
            retryable = true,
            success = false,
            error = %info.message,
            "AI operation failed"
        );
    } else {
        error!(
            process_type = %process_type,
            error_kind = %info.kind,
            retryable = false,
            success = false,
            error = %info.message,
            "AI operation failed"
        );
    }
    tracker.set_error_info(process_type, &info);
    info
}
