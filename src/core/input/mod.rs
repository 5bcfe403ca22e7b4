//=========================================================================
// Input System
//
// Declarative command binding and per-frame device snapshots.
//
// Responsibilities:
// - Digest raw platform events into an immutable per-frame snapshot
// - Bind named logical actions to physical device conditions
// - Evaluate actions once per frame for gameplay and UI code
//
// Pipeline:
// ```text
// InputSender (platform) → InputPump → DeviceState → InputCommand
// ```
//
// Gameplay code only ever talks to `InputCommand::evaluate`; everything
// upstream is the engine's responsibility.
//
//=========================================================================

//=== Submodules ==========================================================

mod command;
mod device_state;
pub mod event;
mod pump;

//=== Public API ==========================================================

pub use command::{CommandOutput, InputCommand, InputState, MouseAxis, MouseSpace};
pub use device_state::DeviceState;
pub use event::{
    AnalogChannel, ControllerButton, KeyCode, MouseButton, RawInputEvent, WindowHandle,
    MAX_CONTROLLERS,
};
pub use pump::{InputPump, InputSender};
