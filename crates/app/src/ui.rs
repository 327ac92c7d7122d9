//! Transport keys and pause-button state
//!
//! Four controls, each mapped 1:1 onto a controller event: backward,
//! forward, pause/resume, stop. Ctrl+C arrives as a key event while the
//! terminal is in raw mode and is routed to the interruption channel.

use std::io::Write;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::controller::{ControlState, ControllerEvent};
use crate::interruption::InterruptSignal;

/// Read transport keys until stop, interruption, or controller teardown.
pub fn spawn_transport_keys(
    events_tx: mpsc::Sender<ControllerEvent>,
    interrupt_tx: mpsc::Sender<InterruptSignal>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = crossterm::terminal::enable_raw_mode() {
            debug!(target: "ui", "Raw mode unavailable: {}", e);
        }
        let mut keys = EventStream::new();
        while let Some(event) = keys.next().await {
            let key = match event {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
                Ok(_) => continue,
                Err(e) => {
                    debug!(target: "ui", "Key stream error: {}", e);
                    break;
                }
            };

            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                let _ = interrupt_tx.send(InterruptSignal).await;
                break;
            }

            let event = match key.code {
                KeyCode::Char(' ') => ControllerEvent::TogglePlayback,
                KeyCode::Right | KeyCode::Char('n') => ControllerEvent::SkipForward,
                KeyCode::Left | KeyCode::Char('p') => ControllerEvent::SkipBackward,
                KeyCode::Char('q') | KeyCode::Esc => ControllerEvent::Stop,
                _ => continue,
            };
            let stopping = event == ControllerEvent::Stop;
            if events_tx.send(event).await.is_err() || stopping {
                break;
            }
        }
        let _ = crossterm::terminal::disable_raw_mode();
    })
}

/// Render the pause-button state whenever it changes.
pub fn spawn_control_display(mut control_rx: watch::Receiver<ControlState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let label = match *control_rx.borrow_and_update() {
                ControlState::Playing => "playing",
                ControlState::Paused => "paused ",
            };
            print!("\r[{label}] space: pause/resume  n/p: skip  q: stop ");
            let _ = std::io::stdout().flush();
            if control_rx.changed().await.is_err() {
                break;
            }
        }
    })
}
