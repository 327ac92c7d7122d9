//! Playback controller: the reading state machine
//!
//! Owns the paragraph cursor and the active/inactive flag, and mediates
//! between transport events, engine completion callbacks, and the content
//! source. All mutation happens on the single task draining the event
//! queue in [`PlaybackController::run`].

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use pagevox_content::{ContentSource, TextPosition};
use pagevox_tts::{FlushPolicy, SpeechEngine};

/// Correlation tag attached to every paragraph utterance.
pub const PARAGRAPH_UTTERANCE_TAG: &str = "paragraph-utterance";

/// Cursor movement while searching for the next readable paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Probe the current paragraph first, then move forward
    CurrentOrForward,
    Forward,
    Backward,
}

/// Everything that can happen to the controller, serialized onto one queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Pause/resume transport control
    TogglePlayback,
    /// Forward transport control (moves the cursor without speaking)
    SkipForward,
    /// Backward transport control (moves the cursor without speaking)
    SkipBackward,
    /// Stop transport control; ends the session
    Stop,
    /// Speech engine finished initializing
    EngineReady,
    /// An utterance completed, correlated by tag
    UtteranceFinished { tag: String },
    /// External interruption (incoming-call equivalent); ends the session
    Interrupted,
}

/// Pause-button rendering state, a pure function of `is_active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Playing,
    Paused,
}

/// Session counters, logged once when the controller terminates.
#[derive(Debug, Clone, Default)]
pub struct SessionMetrics {
    /// Paragraph utterances submitted to the engine
    pub paragraphs_spoken: u64,
    /// Empty or unavailable paragraphs stepped over during search
    pub paragraphs_skipped: u64,
    /// Best-effort position syncs that failed
    pub sync_failures: u64,
}

pub struct PlaybackController {
    content: Arc<dyn ContentSource>,
    engine: Box<dyn SpeechEngine>,
    events_rx: mpsc::Receiver<ControllerEvent>,
    control_tx: watch::Sender<ControlState>,
    fallback_language: String,
    /// Paragraph being read or about to be read; `None` is the unset sentinel.
    cursor: Option<usize>,
    paragraph_count: usize,
    is_active: bool,
    metrics: SessionMetrics,
}

impl PlaybackController {
    pub fn new(
        content: Arc<dyn ContentSource>,
        engine: Box<dyn SpeechEngine>,
        events_rx: mpsc::Receiver<ControllerEvent>,
        control_tx: watch::Sender<ControlState>,
        fallback_language: impl Into<String>,
    ) -> Self {
        Self {
            content,
            engine,
            events_rx,
            control_tx,
            fallback_language: fallback_language.into(),
            cursor: None,
            paragraph_count: 0,
            is_active: false,
            metrics: SessionMetrics::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    /// Drain the event queue until the session ends.
    ///
    /// Returns when a stop or interruption event arrives, or when every
    /// event sender is gone. Dropping the receiver is the disposed state:
    /// later sends fail and are ignored by their senders.
    pub async fn run(mut self) {
        info!(target: "playback", "Playback controller started");
        while let Some(event) = self.events_rx.recv().await {
            match event {
                ControllerEvent::TogglePlayback => self.on_toggle().await,
                ControllerEvent::SkipForward => self.on_skip(Direction::Forward).await,
                ControllerEvent::SkipBackward => self.on_skip(Direction::Backward).await,
                ControllerEvent::EngineReady => self.on_engine_ready().await,
                ControllerEvent::UtteranceFinished { tag } => {
                    self.on_utterance_finished(&tag).await
                }
                ControllerEvent::Stop => {
                    self.stop().await;
                    break;
                }
                ControllerEvent::Interrupted => {
                    info!(target: "playback", "Interrupted, ending session");
                    self.stop().await;
                    break;
                }
            }
        }

        self.stop().await;
        if let Err(e) = self.engine.shutdown().await {
            warn!(target: "playback", "Engine shutdown failed: {}", e);
        }
        info!(
            target: "playback",
            "Session finished - spoken: {}, skipped: {}, sync failures: {}",
            self.metrics.paragraphs_spoken,
            self.metrics.paragraphs_skipped,
            self.metrics.sync_failures
        );
    }

    /// Pause/resume. Resuming re-reads from the current cursor.
    pub async fn on_toggle(&mut self) {
        if self.is_active {
            self.stop().await;
        } else if self.activate().await {
            self.advance(true, Direction::CurrentOrForward).await;
        }
    }

    /// Forward/backward transport: silence the engine, move the cursor.
    pub async fn on_skip(&mut self, direction: Direction) {
        self.stop().await;
        self.advance(false, direction).await;
    }

    /// Engine finished initializing: pick a voice language and start reading.
    pub async fn on_engine_ready(&mut self) {
        let language = self.resolve_language().await;
        if let Err(e) = self.engine.set_language(&language).await {
            warn!(
                target: "playback",
                "Could not set language '{}': {}", language, e
            );
        }
        if self.activate().await {
            self.advance(true, Direction::CurrentOrForward).await;
        }
    }

    /// Continuous-reading loop: our paragraph utterance finishing while
    /// active moves to the next paragraph; anything else ends playback.
    pub async fn on_utterance_finished(&mut self, tag: &str) {
        if self.is_active && tag == PARAGRAPH_UTTERANCE_TAG {
            self.advance(true, Direction::Forward).await;
        } else {
            debug!(target: "playback", "Unrecognized utterance '{}', deactivating", tag);
            self.deactivate().await;
        }
    }

    pub async fn activate(&mut self) -> bool {
        self.set_active(true).await
    }

    pub async fn deactivate(&mut self) {
        self.set_active(false).await;
    }

    /// Deactivate and cancel the outstanding utterance, if any. Idempotent.
    pub async fn stop(&mut self) {
        self.deactivate().await;
        if self.engine.is_speaking() {
            if let Err(e) = self.engine.stop().await {
                warn!(target: "playback", "Failed to stop utterance: {}", e);
            }
        }
    }

    /// Move the cursor to the next readable paragraph and optionally speak it.
    pub async fn advance(&mut self, speak_after: bool, direction: Direction) {
        let Some(cursor) = self.cursor else {
            self.stop().await;
            return;
        };
        if cursor + 1 >= self.paragraph_count {
            // Last paragraph reached: end of book.
            self.stop().await;
            return;
        }

        let text = self.find_valid_paragraph(direction).await;

        match self.cursor {
            Some(index) => self.sync_position(index).await,
            None => debug!(target: "playback", "No further readable content"),
        }

        if speak_after {
            if text.is_empty() {
                self.stop().await;
            } else {
                self.speak_paragraph(&text).await;
            }
        }
    }

    /// Step the cursor in `direction` until non-empty text is found or the
    /// cursor runs off either end of the book (the sentinel).
    ///
    /// Forward stepping is bounded by the paragraph count, so a content
    /// source that keeps returning empty text cannot loop this forever.
    async fn find_valid_paragraph(&mut self, mut direction: Direction) -> String {
        let mut text = String::new();
        while text.is_empty() {
            let Some(current) = self.cursor else { break };
            match direction {
                Direction::Forward => {
                    self.cursor = (current + 1 < self.paragraph_count).then_some(current + 1);
                }
                Direction::Backward => {
                    self.cursor = current.checked_sub(1);
                }
                Direction::CurrentOrForward => {
                    direction = Direction::Forward;
                }
            }
            let Some(index) = self.cursor else { break };
            text = self.paragraph_text(index).await;
            if text.is_empty() {
                self.metrics.paragraphs_skipped += 1;
            }
        }
        text
    }

    /// Paragraph text with the error path collapsed to "nothing to read".
    async fn paragraph_text(&self, index: usize) -> String {
        match self.content.paragraph_text(index).await {
            Ok(text) => text,
            Err(e) => {
                warn!(target: "playback", "Paragraph {} unavailable: {}", index, e);
                String::new()
            }
        }
    }

    /// Best-effort: keep the host's displayed page aligned with speech.
    async fn sync_position(&mut self, index: usize) {
        match self.content.is_page_end_of_text().await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => {
                warn!(target: "playback", "Position sync skipped: {}", e);
                self.metrics.sync_failures += 1;
                return;
            }
        }
        if let Err(e) = self
            .content
            .set_page_start(TextPosition::paragraph_start(index))
            .await
        {
            warn!(target: "playback", "Position sync failed: {}", e);
            self.metrics.sync_failures += 1;
        }
    }

    async fn speak_paragraph(&mut self, text: &str) {
        self.set_active(true).await;
        match self
            .engine
            .speak(text, FlushPolicy::ReplaceCurrent, PARAGRAPH_UTTERANCE_TAG)
            .await
        {
            Ok(()) => self.metrics.paragraphs_spoken += 1,
            Err(e) => {
                warn!(target: "playback", "Utterance submission failed: {}", e);
                self.stop().await;
            }
        }
    }

    /// Establish the session lazily on first activation, then flip the
    /// active flag. Returns the resulting activity state.
    async fn set_active(&mut self, active: bool) -> bool {
        if active && self.cursor.is_none() {
            self.fetch_session().await;
        }
        self.is_active = active && self.cursor.is_some();
        self.control_tx.send_replace(if self.is_active {
            ControlState::Playing
        } else {
            ControlState::Paused
        });
        self.is_active
    }

    /// Fetch the starting position and paragraph count from the content
    /// source. Failure leaves the cursor unset (and the session inactive).
    async fn fetch_session(&mut self) {
        let start = match self.content.page_start().await {
            Ok(position) => position,
            Err(e) => {
                warn!(target: "playback", "Could not fetch reading position: {}", e);
                return;
            }
        };
        let count = match self.content.paragraphs_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!(target: "playback", "Could not fetch paragraph count: {}", e);
                return;
            }
        };
        self.cursor = Some(start.paragraph_index);
        self.paragraph_count = count;
        debug!(
            target: "playback",
            "Session established at paragraph {} of {}",
            start.paragraph_index, count
        );
    }

    /// Book language if the engine supports it, configured fallback otherwise.
    async fn resolve_language(&mut self) -> String {
        match self.content.book_language().await {
            Ok(language) if !language.is_empty() => {
                if self.engine.language_score(&language).await < 0 {
                    info!(
                        target: "playback",
                        "Book language '{}' unsupported, using '{}'",
                        language, self.fallback_language
                    );
                    self.fallback_language.clone()
                } else {
                    language
                }
            }
            Ok(_) => self.fallback_language.clone(),
            Err(e) => {
                warn!(target: "playback", "Could not read book language: {}", e);
                self.fallback_language.clone()
            }
        }
    }
}
