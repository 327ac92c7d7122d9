//! Interruption monitoring
//!
//! Watches one external interruption signal (the desktop analogue of an
//! incoming call) and forces playback to stop by pushing an interruption
//! event into the controller queue. The session ends; there is no resume.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::controller::ControllerEvent;

/// One external interruption, e.g. a ringing call or SIGINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptSignal;

pub struct InterruptionMonitor;

impl InterruptionMonitor {
    /// Forward the first signal as `ControllerEvent::Interrupted`, then exit.
    pub fn spawn(
        mut signal_rx: mpsc::Receiver<InterruptSignal>,
        events_tx: mpsc::Sender<ControllerEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            if signal_rx.recv().await.is_some() {
                info!(target: "playback", "Interruption signal received");
                let _ = events_tx.send(ControllerEvent::Interrupted).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signal_becomes_interrupted_event() {
        let (signal_tx, signal_rx) = mpsc::channel(4);
        let (events_tx, mut events_rx) = mpsc::channel(4);
        let handle = InterruptionMonitor::spawn(signal_rx, events_tx);

        signal_tx.send(InterruptSignal).await.unwrap();
        assert_eq!(events_rx.recv().await, Some(ControllerEvent::Interrupted));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn closed_signal_channel_sends_nothing() {
        let (signal_tx, signal_rx) = mpsc::channel::<InterruptSignal>(4);
        let (events_tx, mut events_rx) = mpsc::channel(4);
        let handle = InterruptionMonitor::spawn(signal_rx, events_tx);

        drop(signal_tx);
        handle.await.unwrap();
        assert_eq!(events_rx.recv().await, None);
    }
}
