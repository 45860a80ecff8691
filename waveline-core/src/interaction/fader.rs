//! Fader drag (track gain or pan)
//!
//! Intermediate values go straight to the audio engine. Only the released
//! value becomes an undoable action.

use crate::actions::SetTrackPropertiesAction;
use crate::engine::EngineBridge;
use crate::snapshot::TrackProperties;
use sync_backend::Track;
use uuid::Uuid;

/// Parameter a fader controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaderParameter {
    GainDb,
    Pan,
}

/// A fader drag in progress
#[derive(Debug, Clone)]
pub struct FaderDrag {
    track_id: Uuid,
    parameter: FaderParameter,
    start: TrackProperties,
    value: f64,
}

impl FaderDrag {
    pub fn start(track: &Track, parameter: FaderParameter) -> Self {
        let start = TrackProperties::of(track);
        let value = match parameter {
            FaderParameter::GainDb => start.gain_db,
            FaderParameter::Pan => start.pan,
        };
        Self {
            track_id: track.id,
            parameter,
            start,
            value,
        }
    }

    /// Set the live value and send it to the engine
    pub fn update(&mut self, value: f64, engine: &mut EngineBridge) {
        match self.parameter {
            FaderParameter::GainDb => {
                self.value = value;
                engine.preview_gain(self.track_id, self.value);
            }
            FaderParameter::Pan => {
                self.value = value.clamp(-1.0, 1.0);
                engine.preview_pan(self.track_id, self.value);
            }
        }
    }

    /// Send the value the drag started from back to the engine
    pub fn revert(&self, engine: &mut EngineBridge) {
        match self.parameter {
            FaderParameter::GainDb => engine.preview_gain(self.track_id, self.start.gain_db),
            FaderParameter::Pan => engine.preview_pan(self.track_id, self.start.pan),
        }
    }

    pub fn track_id(&self) -> Uuid {
        self.track_id
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Wrap the released value in an action; `None` if the fader ended where it began
    pub fn finish(self) -> Option<SetTrackPropertiesAction> {
        let mut after = self.start.clone();
        let description = match self.parameter {
            FaderParameter::GainDb => {
                after.gain_db = self.value;
                "Change track gain"
            }
            FaderParameter::Pan => {
                after.pan = self.value;
                "Change track pan"
            }
        };
        if after == self.start {
            return None;
        }
        Some(SetTrackPropertiesAction::from_snapshots(
            self.track_id,
            self.start,
            after,
            description,
        ))
    }
}
