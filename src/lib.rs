//! speechgen - deduplicated long-form script generation for speech synthesis
//!
//! Generates audiobook-style scripts through a cloud generation service and
//! guarantees that no sentence is ever emitted twice within a session:
//!
//! - Prompt construction with an advisory exclusion list of prior titles
//! - Structured-output client for the Gemini `generateContent` API
//! - Sentence-level dedup against a session-lifetime fingerprint index
//! - Bounded newest-first result history
//! - Cooperative per-request cancellation with a re-entrancy guard
//! - Word-processor document export
//!
//! # Architecture
//!
//! The [`session::SessionEngine`] is the single entry point: it builds the
//! prompt from the topic and history ([`prompt`]), calls the service through
//! the [`client::GenerationClient`] seam, runs the response through the
//! [`processor::ResponseProcessor`] against the session's seen-sentence
//! index, and records survivors in the [`history::History`]. Cancellation
//! and failures never mutate session state.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod language;
pub mod processor;
pub mod prompt;
pub mod session;

pub use client::{GeminiClient, GenerationClient};
pub use config::Config;
pub use error::GenerationError;
pub use export::{ExportDocument, export_document};
pub use history::HISTORY_LIMIT;
pub use language::Language;
pub use processor::{GenerationResult, ResponseProcessor, SEGMENT_DELIMITER, SeenSentences};
pub use prompt::{GenerationRequest, PromptPayload, build_prompt};
pub use session::{GenerationOutcome, SessionEngine, SubmitOutcome};
