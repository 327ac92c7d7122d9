//! eSpeak speech engine backend for PageVox
//!
//! Runs `espeak` (or `espeak-ng`) as a subprocess, one utterance per child
//! process. A watcher task owns each child and reports completion on the
//! engine event channel; superseding or stopping an utterance kills the
//! child without emitting a completion event.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use pagevox_tts::{EngineEvent, FlushPolicy, SpeechEngine, TtsError, TtsResult};

mod tests;

/// Utterance currently owned by a watcher task.
struct ActiveUtterance {
    cancel_tx: oneshot::Sender<()>,
    speaking: Arc<AtomicBool>,
}

pub struct EspeakEngine {
    command_override: Option<String>,
    command: Option<String>,
    language: Option<String>,
    languages: Vec<String>,
    events_tx: mpsc::Sender<EngineEvent>,
    current: Option<ActiveUtterance>,
    initialized: bool,
}

impl EspeakEngine {
    pub fn new(events_tx: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            command_override: None,
            command: None,
            language: None,
            languages: Vec::new(),
            events_tx,
            current: None,
            initialized: false,
        }
    }

    /// Use a specific espeak command instead of probing for one.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command_override = Some(command.into());
        self
    }

    /// Check that the given command answers `--version`.
    async fn probe(command: &str) -> bool {
        Command::new(command)
            .arg("--version")
            .output()
            .await
            .is_ok()
    }

    /// Find an espeak command on this system (espeak, then espeak-ng).
    async fn detect_command() -> Option<String> {
        for candidate in ["espeak", "espeak-ng"] {
            if Self::probe(candidate).await {
                return Some(candidate.to_string());
            }
        }
        None
    }

    fn cancel_current(&mut self) {
        if let Some(utterance) = self.current.take() {
            // The watcher kills the child; a closed channel means it
            // already finished on its own.
            let _ = utterance.cancel_tx.send(());
        }
    }
}

/// Parse the language column out of `espeak --voices` output.
///
/// Voice list format: Pty Language Age/Gender VoiceName File Other
/// Example: `5  en             M  en                 (en 2)`
fn parse_voice_languages(output: &str) -> Vec<String> {
    let voice_regex = Regex::new(r"^\s*(\d+)\s+([\w-]+)\s+([MF+-]?)\s+([\w\-_]+)\s+").unwrap();

    let mut languages = Vec::new();
    for line in output.lines().skip(1) {
        if let Some(captures) = voice_regex.captures(line) {
            let language = captures
                .get(2)
                .map_or("", |m| m.as_str())
                .to_ascii_lowercase();
            if !language.is_empty() && !languages.contains(&language) {
                languages.push(language);
            }
        }
    }
    languages
}

/// Signed availability score: 1 for a full tag match, 0 for a primary
/// subtag match, -1 for unsupported. An empty installed-language list is
/// treated as permissive (espeak resolves its own default voice).
fn score_language(languages: &[String], requested: &str) -> i32 {
    if languages.is_empty() {
        return 0;
    }
    let requested = requested.to_ascii_lowercase().replace('_', "-");
    if languages.iter().any(|lang| *lang == requested) {
        return 1;
    }
    let primary = requested.split('-').next().unwrap_or(&requested);
    if languages
        .iter()
        .any(|lang| lang.split('-').next() == Some(primary))
    {
        return 0;
    }
    -1
}

/// Wait for one espeak child and report how it ended.
async fn watch_utterance(
    mut child: Child,
    mut cancel_rx: oneshot::Receiver<()>,
    speaking: Arc<AtomicBool>,
    events_tx: mpsc::Sender<EngineEvent>,
    tag: String,
) {
    tokio::select! {
        _ = &mut cancel_rx => {
            if let Err(e) = child.kill().await {
                debug!(target: "tts", "Failed to kill espeak child: {}", e);
            }
            debug!(target: "tts", "Utterance '{}' cancelled", tag);
            speaking.store(false, Ordering::SeqCst);
        }
        status = child.wait() => {
            match status {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    // Still reported as finished so continuous reading
                    // moves past a paragraph espeak cannot render.
                    warn!(target: "tts", "espeak exited with {} for utterance '{}'", status, tag);
                }
                Err(e) => {
                    warn!(target: "tts", "Failed to wait on espeak child: {}", e);
                }
            }
            speaking.store(false, Ordering::SeqCst);
            if events_tx
                .send(EngineEvent::UtteranceFinished { tag })
                .await
                .is_err()
            {
                debug!(target: "tts", "Engine event channel closed");
            }
        }
    }
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    async fn initialize(&mut self) -> TtsResult<()> {
        let command = match &self.command_override {
            Some(cmd) => {
                if !Self::probe(cmd).await {
                    return Err(TtsError::EngineNotAvailable(format!(
                        "configured command '{}' is not runnable",
                        cmd
                    )));
                }
                cmd.clone()
            }
            None => Self::detect_command().await.ok_or_else(|| {
                TtsError::EngineNotAvailable(
                    "espeak not found. Please install espeak or espeak-ng.".to_string(),
                )
            })?,
        };

        match Command::new(&command).arg("--voices").output().await {
            Ok(output) => {
                let listing = String::from_utf8_lossy(&output.stdout);
                self.languages = parse_voice_languages(&listing);
                debug!(
                    target: "tts",
                    "Loaded {} espeak voice languages",
                    self.languages.len()
                );
            }
            Err(e) => {
                return Err(TtsError::InitializationError(format!(
                    "failed to list espeak voices: {}",
                    e
                )));
            }
        }

        self.command = Some(command);
        self.initialized = true;

        if self.events_tx.send(EngineEvent::Ready).await.is_err() {
            debug!(target: "tts", "Engine event channel closed before ready");
        }
        Ok(())
    }

    async fn language_score(&self, language: &str) -> i32 {
        score_language(&self.languages, language)
    }

    async fn set_language(&mut self, language: &str) -> TtsResult<()> {
        if self.initialized && score_language(&self.languages, language) < 0 {
            return Err(TtsError::LanguageUnavailable(language.to_string()));
        }
        self.language = Some(language.to_ascii_lowercase().replace('_', "-"));
        Ok(())
    }

    async fn speak(&mut self, text: &str, flush: FlushPolicy, tag: &str) -> TtsResult<()> {
        if !self.initialized {
            return Err(TtsError::InitializationError(
                "engine not initialized".to_string(),
            ));
        }
        if text.trim().is_empty() {
            return Err(TtsError::InvalidInput("empty text input".to_string()));
        }

        match flush {
            FlushPolicy::ReplaceCurrent => self.cancel_current(),
            FlushPolicy::Append => {
                if self.is_speaking() {
                    return Err(TtsError::EngineBusy);
                }
                self.current = None;
            }
        }

        let command = self
            .command
            .clone()
            .ok_or_else(|| TtsError::InitializationError("engine not initialized".to_string()))?;

        let mut cmd = Command::new(&command);
        if let Some(language) = &self.language {
            cmd.arg("-v").arg(language);
        }
        cmd.arg(text)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true);

        debug!(target: "tts", "Speaking {} chars via {} (tag '{}')", text.len(), command, tag);
        let child = cmd.spawn()?;

        let (cancel_tx, cancel_rx) = oneshot::channel();
        let speaking = Arc::new(AtomicBool::new(true));
        tokio::spawn(watch_utterance(
            child,
            cancel_rx,
            speaking.clone(),
            self.events_tx.clone(),
            tag.to_string(),
        ));
        self.current = Some(ActiveUtterance {
            cancel_tx,
            speaking,
        });
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|utterance| utterance.speaking.load(Ordering::SeqCst))
    }

    async fn stop(&mut self) -> TtsResult<()> {
        self.cancel_current();
        Ok(())
    }

    async fn shutdown(&mut self) -> TtsResult<()> {
        self.cancel_current();
        self.initialized = false;
        self.command = None;
        self.language = None;
        self.languages.clear();
        debug!(target: "tts", "eSpeak engine shutdown");
        Ok(())
    }
}
