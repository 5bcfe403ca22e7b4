//=========================================================================
// Raw Input Event Types
//
// Defines the internal representation of low-level device events.
//
// This module abstracts away whatever platform layer feeds the engine
// (Win32 polling, SDL, a test harness) into a unified, engine-friendly
// format consumed by the device snapshot.
//
// Responsibilities:
// - Represent keyboard, mouse and controller inputs in a portable way
// - Provide equality and hashing semantics for set-based state tracking
// - Carry raw analog magnitudes so normalization happens in exactly
//   one place (command evaluation)
//
// Event Flow:
// ```text
// Platform layer (excluded from this crate)
//         ↓
//    RawInputEvent (this module)
//         ↓
//    DeviceState (per-frame snapshot)
//         ↓
//    InputCommand (named action evaluation)
// ```
//
//=========================================================================

//=== Constants ===========================================================

/// Maximum number of simultaneously tracked controllers.
pub const MAX_CONTROLLERS: usize = 4;

//=== WindowHandle ========================================================

/// Opaque reference to a platform window.
///
/// The engine never dereferences this value; it only uses it as a key to
/// look up a registered client-area origin when a mouse-axis binding asks
/// for client-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Additional keys can be added as needed without breaking existing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    /// Directional navigation keys
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    /// Spacebar
    Space,

    /// Return/Enter key
    Enter,

    /// Escape key
    Escape,

    /// Tab key
    Tab,

    /// Left or right Shift
    Shift,

    /// Left or right Control
    Control,

    /// Fallback for keys not explicitly mapped by the platform layer.
    Unidentified,
}

//=== ControllerButton ====================================================

/// Digital controller button identifier (gamepad layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerButton {
    A,
    B,
    X,
    Y,
    LeftShoulder,
    RightShoulder,
    Back,
    Start,
    LeftStick,
    RightStick,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

//=== AnalogChannel =======================================================

/// Continuous controller input channel.
///
/// Raw value ranges follow the underlying hardware report:
/// - Triggers: `0..=255`
/// - Stick axes: `-32768..=32767`
///
/// Normalization to `[0,1]` / `[-1,1]` happens at command evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogChannel {
    LeftTrigger,
    RightTrigger,
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
}

/// Number of analog channels per controller.
pub(crate) const ANALOG_CHANNEL_COUNT: usize = 6;

impl AnalogChannel {
    /// Dense index for per-controller channel arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            Self::LeftTrigger => 0,
            Self::RightTrigger => 1,
            Self::LeftStickX => 2,
            Self::LeftStickY => 3,
            Self::RightStickX => 4,
            Self::RightStickY => 5,
        }
    }

    /// Returns `true` for the trigger channels (unsigned 0-255 range).
    pub(crate) fn is_trigger(self) -> bool {
        matches!(self, Self::LeftTrigger | Self::RightTrigger)
    }
}

//=== RawInputEvent =======================================================

/// Low-level device event from the platform layer.
///
/// Events carry both the input type and its payload. They are digested
/// once per frame into the [`DeviceState`](super::DeviceState) snapshot;
/// gameplay code never sees raw events.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent {
    /// Key pressed down.
    KeyDown(KeyCode),

    /// Key released.
    KeyUp(KeyCode),

    /// Mouse button pressed.
    MouseButtonDown(MouseButton),

    /// Mouse button released.
    MouseButtonUp(MouseButton),

    /// Mouse cursor moved to a new screen-space position (pixels,
    /// top-left origin).
    MouseMoved { x: f32, y: f32 },

    /// Mouse wheel rotated. Positive is away from the user.
    MouseWheel { delta: f32 },

    /// Controller attached at the given slot (0-3).
    ControllerConnected { index: usize },

    /// Controller detached from the given slot.
    ControllerDisconnected { index: usize },

    /// Controller digital button pressed.
    ControllerButtonDown { index: usize, button: ControllerButton },

    /// Controller digital button released.
    ControllerButtonUp { index: usize, button: ControllerButton },

    /// Controller analog channel report (raw hardware range).
    ControllerAnalog {
        index: usize,
        channel: AnalogChannel,
        raw: i32,
    },

    /// A window's client-area origin moved in screen space.
    ///
    /// Needed so client-space mouse-axis bindings can subtract the
    /// window origin from the screen-space cursor position.
    WindowMoved { handle: WindowHandle, x: f32, y: f32 },

    /// Unrecognized or unsupported event. Silently ignored.
    Unidentified,
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analog_channel_indices_are_dense_and_unique() {
        let channels = [
            AnalogChannel::LeftTrigger,
            AnalogChannel::RightTrigger,
            AnalogChannel::LeftStickX,
            AnalogChannel::LeftStickY,
            AnalogChannel::RightStickX,
            AnalogChannel::RightStickY,
        ];

        let mut seen = [false; ANALOG_CHANNEL_COUNT];
        for ch in channels {
            let idx = ch.index();
            assert!(idx < ANALOG_CHANNEL_COUNT);
            assert!(!seen[idx], "duplicate index {}", idx);
            seen[idx] = true;
        }
    }

    #[test]
    fn trigger_channels_are_flagged() {
        assert!(AnalogChannel::LeftTrigger.is_trigger());
        assert!(AnalogChannel::RightTrigger.is_trigger());
        assert!(!AnalogChannel::LeftStickX.is_trigger());
        assert!(!AnalogChannel::RightStickY.is_trigger());
    }

    #[test]
    fn window_handles_compare_by_value() {
        assert_eq!(WindowHandle(7), WindowHandle(7));
        assert_ne!(WindowHandle(7), WindowHandle(8));
    }
}
