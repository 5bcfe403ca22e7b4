//=========================================================================
// Input Event Pump
//=========================================================================
//
// Bounded channel carrying raw device events from the embedding platform
// layer into the engine.
//
// Architecture:
//   platform thread(s) ──send()──> channel ──drain_into()──> DeviceState
//
// The pump is the only asynchronous boundary of the core: senders may
// live on any thread, but draining happens exclusively on the update
// thread, once per tick, before command evaluation. When the channel is
// full the platform side drops the event rather than blocking the
// producer.
//
//=========================================================================

//=== External Crates =====================================================

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::device_state::DeviceState;
use super::event::RawInputEvent;

//=== InputSender =========================================================

/// Cloneable handle the platform layer uses to feed events to the engine.
#[derive(Debug, Clone)]
pub struct InputSender {
    sender: Sender<RawInputEvent>,
}

impl InputSender {
    /// Sends one event, dropping it with a warning if the engine has
    /// fallen behind and the channel is full.
    pub fn send(&self, event: RawInputEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(ev)) => {
                warn!("Input channel full, dropping event: {:?}", ev);
            }
            Err(TrySendError::Disconnected(_)) => {
                // Engine already shut down; nothing useful to do.
            }
        }
    }
}

//=== InputPump ===========================================================

/// Engine-side receiver that drains queued events into the device
/// snapshot each tick.
#[derive(Debug)]
pub struct InputPump {
    receiver: Receiver<RawInputEvent>,
    sender: Sender<RawInputEvent>,
}

impl InputPump {
    /// Creates a pump with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { receiver, sender }
    }

    /// Returns a new sender handle for the platform layer.
    pub fn sender(&self) -> InputSender {
        InputSender {
            sender: self.sender.clone(),
        }
    }

    /// Applies every queued event to the snapshot and returns how many
    /// were processed. Non-blocking.
    pub fn drain_into(&self, devices: &mut DeviceState) -> usize {
        let mut count = 0;
        while let Ok(event) = self.receiver.try_recv() {
            devices.apply(&event);
            count += 1;
        }
        count
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::KeyCode;

    #[test]
    fn drained_events_reach_the_snapshot() {
        let pump = InputPump::new(16);
        let sender = pump.sender();
        let mut devices = DeviceState::new();

        sender.send(RawInputEvent::KeyDown(KeyCode::KeyW));
        sender.send(RawInputEvent::MouseMoved { x: 10.0, y: 20.0 });

        devices.begin_frame();
        let drained = pump.drain_into(&mut devices);
        devices.end_frame();

        assert_eq!(drained, 2);
        assert!(devices.is_key_down(KeyCode::KeyW));
        assert_eq!(devices.mouse_position(), (10.0, 20.0));
    }

    #[test]
    fn drain_on_empty_channel_is_a_noop() {
        let pump = InputPump::new(4);
        let mut devices = DeviceState::new();
        assert_eq!(pump.drain_into(&mut devices), 0);
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let pump = InputPump::new(1);
        let sender = pump.sender();

        sender.send(RawInputEvent::KeyDown(KeyCode::KeyA));
        // Second send overflows the capacity-1 channel; must not block.
        sender.send(RawInputEvent::KeyDown(KeyCode::KeyB));

        let mut devices = DeviceState::new();
        devices.begin_frame();
        assert_eq!(pump.drain_into(&mut devices), 1);
        devices.end_frame();

        assert!(devices.is_key_down(KeyCode::KeyA));
        assert!(!devices.is_key_down(KeyCode::KeyB));
    }
}
