//=========================================================================
// Frame Context
//=========================================================================
//
// Read-only per-frame data handed to every update pass.
//
// Built once per tick by the engine after the device snapshot has
// advanced, and shared by reference through the scene and object passes.
// Because the snapshot is immutable for the rest of the tick, command
// evaluation through this context is idempotent within the frame.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::{CommandOutput, DeviceState, InputCommand};

//=== FrameContext ========================================================

/// Per-frame data available to components during update passes.
pub struct FrameContext<'f> {
    /// Seconds elapsed since the previous tick.
    pub dt: f32,

    /// The frame's immutable device snapshot.
    pub devices: &'f DeviceState,

    /// The engine's command binding table.
    pub commands: &'f InputCommand,
}

impl<'f> FrameContext<'f> {
    /// Evaluates a named action against this frame's snapshot.
    ///
    /// Shorthand for `self.commands.evaluate(action, self.devices)`.
    pub fn command(&self, action: &str) -> CommandOutput {
        self.commands.evaluate(action, self.devices)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputState, KeyCode, RawInputEvent};

    #[test]
    fn command_shorthand_matches_direct_evaluation() {
        let mut commands = InputCommand::new();
        commands.register_key("Jump", KeyCode::Space, InputState::Down, false);

        let mut devices = DeviceState::new();
        devices.begin_frame();
        devices.apply(&RawInputEvent::KeyDown(KeyCode::Space));
        devices.end_frame();

        let frame = FrameContext { dt: 1.0 / 60.0, devices: &devices, commands: &commands };
        assert_eq!(frame.command("Jump"), commands.evaluate("Jump", &devices));
        assert!(frame.command("Jump").triggered());
    }
}
