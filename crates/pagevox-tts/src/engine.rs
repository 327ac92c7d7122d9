//! Speech engine abstraction and engine events

use crate::error::TtsResult;
use async_trait::async_trait;

/// Events a speech engine delivers asynchronously over its event channel.
///
/// These stand in for the platform callback interfaces: readiness after
/// `initialize`, and per-utterance completion correlated by tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Engine initialization completed; the engine accepts utterances now
    Ready,
    /// The utterance tagged `tag` finished playing.
    ///
    /// Not emitted for utterances cancelled through `stop` or superseded by
    /// a later `speak`.
    UtteranceFinished { tag: String },
}

/// What to do with an utterance already in flight when `speak` is called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Cancel the in-flight utterance and start the new one immediately
    ReplaceCurrent,
    /// Keep the in-flight utterance; backends that cannot queue reject the
    /// request with `TtsError::EngineBusy`
    Append,
}

/// Core speech engine interface
///
/// Implementations synthesize one utterance at a time and report completion
/// through the event channel handed to them at construction.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Initialize the engine. Emits `EngineEvent::Ready` on the event
    /// channel once the engine can accept utterances.
    async fn initialize(&mut self) -> TtsResult<()>;

    /// Signed availability score for a language tag; negative means
    /// unsupported, higher is a better match.
    async fn language_score(&self, language: &str) -> i32;

    /// Select the voice language used for subsequent utterances.
    async fn set_language(&mut self, language: &str) -> TtsResult<()>;

    /// Submit one utterance. Completion arrives as
    /// `EngineEvent::UtteranceFinished` carrying the same `tag`.
    async fn speak(&mut self, text: &str, flush: FlushPolicy, tag: &str) -> TtsResult<()>;

    /// Whether an utterance is currently in flight.
    fn is_speaking(&self) -> bool;

    /// Cancel the in-flight utterance, if any. Idempotent.
    async fn stop(&mut self) -> TtsResult<()>;

    /// Shutdown the engine and release resources.
    async fn shutdown(&mut self) -> TtsResult<()>;
}
