//! Core traits for notewise abstractions.
//!
//! These traits define the seams between the AI processor and the concrete
//! backends (LLM provider, note storage) it talks to.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Note;

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

/// Storage for notes and their AI-generated fields.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Fetch a note by ID. Missing notes yield [`Error::NoteNotFound`](crate::Error::NoteNotFound).
    async fn fetch(&self, id: Uuid) -> Result<Note>;

    /// Store a generated summary.
    async fn update_summary(&self, id: Uuid, summary: &str) -> Result<()>;

    /// Replace the note's tags.
    async fn set_tags(&self, id: Uuid, tags: &[String]) -> Result<()>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate text constrained to a JSON object, where the backend supports it.
    async fn generate_json_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.generate_with_system(system, prompt).await
    }

    /// Get the model name being used.
    fn model_name(&self) -> &str;

    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool>;
}
