//! Collaborator interfaces for audio transcription and topic expansion.
//!
//! Both engines live outside this system and are injected at the pipeline
//! boundary. Their failures are non-fatal whenever any other usable input
//! exists: the pipeline records a warning and continues degraded.

use std::path::Path;
use thiserror::Error;

/// Failures reported by injected collaborators. Never fatal on their own.
#[derive(Error, Debug)]
pub enum CollabError {
    /// No transcription engine is available, or transcription failed.
    #[error("Transcription unavailable for {path}: {reason}")]
    TranscriptionUnavailable { path: String, reason: String },

    /// No expansion engine is available, or expansion failed.
    #[error("Expansion unavailable: {0}")]
    ExpansionUnavailable(String),
}

/// Converts an audio file into text.
///
/// Implementations own their latency: a call must return within a bounded
/// time (internal timeout) rather than block the pipeline indefinitely.
pub trait Transcriber {
    fn transcribe(&self, audio_path: &Path) -> Result<String, CollabError>;
}

/// Expands a short topic description toward a target word count.
///
/// Same bounded-wait contract as [`Transcriber`].
pub trait Expander {
    fn expand(&self, topic: &str, target_words: usize) -> Result<String, CollabError>;
}

/// Collaborator stub that always reports itself unavailable.
///
/// The default wiring in the CLI: real engines (Whisper, an LLM API) are out
/// of scope, so runs referencing audio or research degrade with warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl Transcriber for Unavailable {
    fn transcribe(&self, audio_path: &Path) -> Result<String, CollabError> {
        Err(CollabError::TranscriptionUnavailable {
            path: audio_path.display().to_string(),
            reason: "no transcription engine configured".to_string(),
        })
    }
}

impl Expander for Unavailable {
    fn expand(&self, _topic: &str, _target_words: usize) -> Result<String, CollabError> {
        Err(CollabError::ExpansionUnavailable(
            "no expansion engine configured".to_string(),
        ))
    }
}
