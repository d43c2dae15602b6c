//! # notewise-inference
//!
//! LLM summary and tag generation for notewise.
//!
//! This crate provides:
//! - Ollama generation backend over `/api/chat`
//! - Inference configuration from TOML or environment
//! - Prompt construction and tolerant response parsing
//! - [`AiProcessor`] and [`NoteActions`], which run generation while keeping
//!   an [`AiStatusTracker`](notewise_core::AiStatusTracker) and the error
//!   classifier in step
//!
//! # Feature Flags
//!
//! - `mock`: expose [`mock::MockGenerationBackend`] to other crates
//!
//! # Example
//!
//! ```rust,no_run
//! use notewise_core::AiStatusTracker;
//! use notewise_inference::{AiProcessor, InferenceConfig, OllamaBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = InferenceConfig::load()?;
//!     let backend = OllamaBackend::from_config(&config.ollama)?;
//!     let processor = AiProcessor::new(backend, config.processing);
//!
//!     let mut tracker = AiStatusTracker::new();
//!     match processor.summarize_text("회의록", "오늘 회의에서 ...", &mut tracker).await {
//!         Ok(summary) => println!("{}", summary),
//!         Err(info) => eprintln!("{} (retry: {})", info.user_message, info.retryable),
//!     }
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod config;
pub mod ollama;
pub mod processor;
pub mod prompts;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use notewise_core::*;

pub use actions::NoteActions;
pub use config::{ConfigError, InferenceConfig, OllamaConfig, ProcessingConfig};
pub use ollama::OllamaBackend;
pub use processor::AiProcessor;
