//! Error types for speech synthesis

use thiserror::Error;

/// Speech engine error types
#[derive(Error, Debug)]
pub enum TtsError {
    /// Engine binary or voice data is not installed on this system
    #[error("speech engine not available: {0}")]
    EngineNotAvailable(String),

    /// Engine initialization failed
    #[error("engine initialization failed: {0}")]
    InitializationError(String),

    /// Requested language has no installed voice
    #[error("language not available: {0}")]
    LanguageUnavailable(String),

    /// Synthesis failed
    #[error("synthesis failed: {0}")]
    SynthesisError(String),

    /// Engine is busy (another utterance in flight and no supersede requested)
    #[error("engine is busy")]
    EngineBusy,

    /// Invalid text input
    #[error("invalid text input: {0}")]
    InvalidInput(String),

    /// IO error (process spawning, pipes)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for speech engine operations
pub type TtsResult<T> = Result<T, TtsError>;
