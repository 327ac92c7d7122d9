//! Speech engine abstraction layer for PageVox
//!
//! This crate defines the contract a speech backend must honor so the
//! playback controller can drive it: one utterance in flight at a time,
//! asynchronous readiness and completion reported over an event channel,
//! and a signed language-availability score.

pub mod engine;
pub mod error;

pub use engine::{EngineEvent, FlushPolicy, SpeechEngine};
pub use error::{TtsError, TtsResult};
