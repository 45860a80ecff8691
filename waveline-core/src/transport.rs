//! Transport and playhead channel
//!
//! Playback position travels on its own `watch` channel so that a moving
//! playhead never goes through the entity pipeline. Subscribers only ever see
//! the latest state.

use sync_backend::Samples;
use tokio::sync::watch;

/// Snapshot of the transport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayheadState {
    pub position: Samples,
    pub playing: bool,
}

/// Play state and playhead position
pub struct Transport {
    tx: watch::Sender<PlayheadState>,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(PlayheadState::default());
        Self { tx }
    }

    /// Receiver for playhead updates
    pub fn subscribe(&self) -> watch::Receiver<PlayheadState> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> PlayheadState {
        *self.tx.borrow()
    }

    pub fn position(&self) -> Samples {
        self.tx.borrow().position
    }

    pub fn is_playing(&self) -> bool {
        self.tx.borrow().playing
    }

    /// Toggle between playing and stopped; returns the new play state
    pub fn toggle(&self) -> bool {
        let mut playing = false;
        self.tx.send_modify(|state| {
            state.playing = !state.playing;
            playing = state.playing;
        });
        log::debug!("transport {}", if playing { "playing" } else { "stopped" });
        playing
    }

    pub fn play(&self) {
        self.tx.send_if_modified(|state| !std::mem::replace(&mut state.playing, true));
    }

    pub fn stop(&self) {
        self.tx.send_if_modified(|state| std::mem::replace(&mut state.playing, false));
    }

    /// Move the playhead; negative positions clamp to zero
    pub fn seek(&self, position: Samples) {
        let position = position.max(0);
        self.tx.send_if_modified(|state| {
            let changed = state.position != position;
            state.position = position;
            changed
        });
    }

    /// Advance the playhead by `samples` while playing (driven by the audio clock)
    pub fn advance(&self, samples: Samples) {
        self.tx.send_if_modified(|state| {
            if !state.playing || samples == 0 {
                return false;
            }
            state.position = (state.position + samples).max(0);
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_advance() {
        let transport = Transport::new();
        transport.advance(100);
        assert_eq!(transport.position(), 0);

        assert!(transport.toggle());
        transport.advance(100);
        assert_eq!(transport.position(), 100);

        assert!(!transport.toggle());
        transport.advance(100);
        assert_eq!(transport.position(), 100);
    }

    #[test]
    fn test_seek_clamps() {
        let transport = Transport::new();
        transport.seek(-50);
        assert_eq!(transport.position(), 0);
        transport.seek(4410);
        assert_eq!(transport.state(), PlayheadState { position: 4410, playing: false });
    }

    #[tokio::test]
    async fn test_subscribers_see_latest_state() {
        let transport = Transport::new();
        let mut rx = transport.subscribe();

        transport.play();
        transport.advance(10);
        transport.advance(20);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), PlayheadState { position: 30, playing: true });
        assert!(!rx.has_changed().unwrap());
    }
}
