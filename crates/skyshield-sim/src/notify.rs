//! Notification sinks: where alerts and audio cues go after each tick.
//!
//! The engine never prints or plays anything itself. It hands every alert
//! and audio cue of the tick to the installed sink.

use std::cell::RefCell;
use std::rc::Rc;

use skyshield_core::enums::AlertLevel;
use skyshield_core::events::{Alert, AudioEvent};

/// Receiver for presentation-layer notifications.
pub trait NotificationSink {
    fn alert(&mut self, alert: &Alert);

    fn audio(&mut self, _event: &AudioEvent) {}
}

/// Writes alerts to the `tracing` log at a level matching their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn alert(&mut self, alert: &Alert) {
        match alert.level {
            AlertLevel::Critical => tracing::warn!(tick = alert.tick, "{}", alert.message),
            AlertLevel::Warning => tracing::info!(tick = alert.tick, "{}", alert.message),
            AlertLevel::Info => tracing::debug!(tick = alert.tick, "{}", alert.message),
        }
    }

    fn audio(&mut self, event: &AudioEvent) {
        tracing::trace!(cue = ?event.cue, x = event.position.x, y = event.position.y, "audio cue");
    }
}

/// Keeps everything it receives. Clones share the same buffers, so a test
/// can hand one clone to the engine and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    alerts: Rc<RefCell<Vec<Alert>>>,
    audio: Rc<RefCell<Vec<AudioEvent>>>,
}

impl RecordingSink {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.borrow().clone()
    }

    pub fn audio_events(&self) -> Vec<AudioEvent> {
        self.audio.borrow().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn alert(&mut self, alert: &Alert) {
        self.alerts.borrow_mut().push(alert.clone());
    }

    fn audio(&mut self, event: &AudioEvent) {
        self.audio.borrow_mut().push(*event);
    }
}
