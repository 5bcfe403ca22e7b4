//=========================================================================
// Input Command Table
//=========================================================================
//
// Maps named logical actions to lists of physical device bindings and
// evaluates them against the frame's device snapshot.
//
// Architecture:
//   action name → SmallVec<Binding> → evaluate() → CommandOutput
//
// Evaluation semantics:
// - `triggered` is the OR of every binding's own condition.
// - `value` reports the FIRST binding in registration order whose
//   condition holds; if none holds, the value is 0.
// - Unknown actions evaluate to the default output, never an error —
//   callers treat "no such action" and "not triggered" identically.
//
// Duplicate or conflicting bindings are legal and simply evaluated in
// registration order. `clear()` drops the whole table; scene setup code
// rebuilds its bindings wholesale rather than editing them incrementally.
//
//=========================================================================

//=== External Crates =====================================================

use ahash::AHashMap;
use smallvec::SmallVec;

//=== Internal Dependencies ===============================================

use super::device_state::DeviceState;
use super::event::{AnalogChannel, ControllerButton, KeyCode, MouseButton, WindowHandle};

//=== InputState ==========================================================

/// Activation semantics for digital bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    /// Currently held.
    Down,

    /// Transitioned from not-held to held this frame.
    Trigger,

    /// Transitioned from held to not-held this frame.
    Release,
}

//=== MouseAxis ===========================================================

/// Continuous mouse channel readable by an axis binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAxis {
    /// Absolute cursor X.
    X,

    /// Absolute cursor Y.
    Y,

    /// Cursor movement X this frame.
    DeltaX,

    /// Cursor movement Y this frame.
    DeltaY,

    /// Accumulated wheel rotation.
    Wheel,

    /// Wheel rotation this frame.
    DeltaWheel,
}

//=== MouseSpace ==========================================================

/// Coordinate space for absolute mouse-axis bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseSpace {
    /// Raw screen coordinates.
    Screen,

    /// Coordinates relative to the given window's client origin.
    Client(WindowHandle),
}

//=== CommandOutput =======================================================

/// Result of evaluating one action for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CommandOutput {
    triggered: bool,
    value: f32,
}

impl CommandOutput {
    fn new(triggered: bool, value: f32) -> Self {
        Self { triggered, value }
    }

    /// Whether any binding's condition held this frame.
    pub fn triggered(&self) -> bool {
        self.triggered
    }

    /// Continuous value of the first satisfied binding (0 when none).
    pub fn value(&self) -> f32 {
        self.value
    }
}

//=== Binding =============================================================

/// One physical-device condition contributing to an action.
///
/// Each variant carries only the fields meaningful for its device kind.
#[derive(Debug, Clone, PartialEq)]
enum BindingSource {
    Keyboard {
        key: KeyCode,
        state: InputState,
    },
    MouseButton {
        button: MouseButton,
        state: InputState,
    },
    MouseAxis {
        axis: MouseAxis,
        space: MouseSpace,
        threshold: f32,
    },
    ControllerButton {
        button: ControllerButton,
        state: InputState,
        controller: usize,
    },
    ControllerAnalog {
        channel: AnalogChannel,
        state: InputState,
        controller: usize,
        threshold: f32,
    },
    ControllerAnalogDelta {
        channel: AnalogChannel,
        controller: usize,
        threshold: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Binding {
    source: BindingSource,
    invert_value: bool,
}

//=== Normalization Helpers ===============================================

fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

fn clamp11(v: f32) -> f32 {
    v.clamp(-1.0, 1.0)
}

/// Trigger magnitudes arrive as 0-255.
fn normalize_trigger(raw: i32) -> f32 {
    clamp01(raw as f32 / 255.0)
}

/// Stick magnitudes arrive as signed 16-bit; the negative half is one
/// count deeper, so it gets its own divisor to reach exactly -1.0.
fn normalize_stick(raw: i32) -> f32 {
    if raw >= 0 {
        clamp11(raw as f32 / 32767.0)
    } else {
        clamp11(raw as f32 / 32768.0)
    }
}

fn normalize_trigger_delta(raw: i32) -> f32 {
    clamp11(raw as f32 / 255.0)
}

fn normalize_stick_delta(raw: i32) -> f32 {
    clamp11(raw as f32 / 32767.0)
}

fn digital_fired(down: bool, trigger: bool, release: bool, state: InputState) -> bool {
    match state {
        InputState::Down => down,
        InputState::Trigger => trigger,
        InputState::Release => release,
    }
}

fn axis_fired(value: f32, threshold: f32) -> bool {
    value.abs() > threshold
}

//=== InputCommand ========================================================

/// Declarative binding table mapping named actions to device conditions.
///
/// Gameplay code registers bindings once (typically at scene setup) and
/// calls [`evaluate`](Self::evaluate) each frame. A single action may be
/// bound to many inputs; the action fires if any binding's condition
/// holds.
#[derive(Debug, Default)]
pub struct InputCommand {
    bindings: AHashMap<String, SmallVec<[Binding; 2]>>,
}

impl InputCommand {
    /// Creates an empty command table.
    pub fn new() -> Self {
        Self {
            bindings: AHashMap::new(),
        }
    }

    /// Drops every registered action.
    ///
    /// Called when a scene (re-)initializes so stale bindings never bleed
    /// into the new context.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Number of actions with at least one binding.
    pub fn action_count(&self) -> usize {
        self.bindings.len()
    }

    //--- Registration -----------------------------------------------------
    //
    // One method per device kind, mirroring the binding variants. No
    // validation of duplicates or conflicts: bindings are evaluated in
    // registration order. Empty action names are silently ignored.
    //

    /// Binds a keyboard key with the given activation state.
    pub fn register_key(
        &mut self,
        action: &str,
        key: KeyCode,
        state: InputState,
        invert_value: bool,
    ) {
        self.push(action, BindingSource::Keyboard { key, state }, invert_value);
    }

    /// Binds a mouse button with the given activation state.
    pub fn register_mouse_button(
        &mut self,
        action: &str,
        button: MouseButton,
        state: InputState,
        invert_value: bool,
    ) {
        self.push(action, BindingSource::MouseButton { button, state }, invert_value);
    }

    /// Binds a continuous mouse axis.
    ///
    /// The binding fires when the axis magnitude exceeds `threshold`.
    /// Absolute X/Y can be read in screen space or relative to a window's
    /// client origin via `space`.
    pub fn register_mouse_axis(
        &mut self,
        action: &str,
        axis: MouseAxis,
        space: MouseSpace,
        threshold: f32,
        invert_value: bool,
    ) {
        self.push(
            action,
            BindingSource::MouseAxis { axis, space, threshold },
            invert_value,
        );
    }

    /// Binds a controller digital button with the given activation state.
    pub fn register_pad_button(
        &mut self,
        action: &str,
        button: ControllerButton,
        state: InputState,
        controller: usize,
        invert_value: bool,
    ) {
        self.push(
            action,
            BindingSource::ControllerButton { button, state, controller },
            invert_value,
        );
    }

    /// Binds a controller analog channel.
    ///
    /// Triggers normalize to `[0,1]`, sticks to `[-1,1]` before the
    /// threshold comparison. `Down`/`Trigger` fire while the magnitude
    /// exceeds `threshold`; `Release` fires while it does not.
    pub fn register_pad_analog(
        &mut self,
        action: &str,
        channel: AnalogChannel,
        state: InputState,
        controller: usize,
        threshold: f32,
        invert_value: bool,
    ) {
        self.push(
            action,
            BindingSource::ControllerAnalog { channel, state, controller, threshold },
            invert_value,
        );
    }

    /// Binds the per-frame change of a controller analog channel.
    ///
    /// The current-minus-previous difference is normalized to `[-1,1]`;
    /// the binding fires when its magnitude exceeds `threshold`.
    pub fn register_pad_analog_delta(
        &mut self,
        action: &str,
        channel: AnalogChannel,
        controller: usize,
        threshold: f32,
        invert_value: bool,
    ) {
        self.push(
            action,
            BindingSource::ControllerAnalogDelta { channel, controller, threshold },
            invert_value,
        );
    }

    fn push(&mut self, action: &str, source: BindingSource, invert_value: bool) {
        if action.is_empty() {
            return;
        }
        self.bindings
            .entry(action.to_owned())
            .or_default()
            .push(Binding { source, invert_value });
    }

    //--- Evaluation -------------------------------------------------------

    /// Evaluates an action against the frame's device snapshot.
    ///
    /// Unknown actions and actions with no satisfied binding both produce
    /// the default `{triggered: false, value: 0}` output. Evaluation is
    /// pure with respect to the snapshot, so calling this twice within
    /// the same frame yields identical results.
    pub fn evaluate(&self, action: &str, devices: &DeviceState) -> CommandOutput {
        let Some(list) = self.bindings.get(action) else {
            return CommandOutput::default();
        };

        let mut triggered = false;
        let mut value: Option<f32> = None;

        for binding in list {
            let out = Self::evaluate_binding(binding, devices);
            triggered = triggered || out.triggered;
            if out.triggered && value.is_none() {
                // First satisfied binding wins the value slot.
                value = Some(out.value);
            }
        }

        CommandOutput::new(triggered, value.unwrap_or(0.0))
    }

    fn evaluate_binding(binding: &Binding, devices: &DeviceState) -> CommandOutput {
        let out = match binding.source {
            BindingSource::Keyboard { key, state } => {
                let down = devices.is_key_down(key);
                let fired = digital_fired(
                    down,
                    devices.is_key_trigger(key),
                    devices.is_key_release(key),
                    state,
                );
                CommandOutput::new(fired, if down { 1.0 } else { 0.0 })
            }

            BindingSource::MouseButton { button, state } => {
                let down = devices.is_button_down(button);
                let fired = digital_fired(
                    down,
                    devices.is_button_trigger(button),
                    devices.is_button_release(button),
                    state,
                );
                CommandOutput::new(fired, if down { 1.0 } else { 0.0 })
            }

            BindingSource::MouseAxis { axis, space, threshold } => {
                let v = match axis {
                    MouseAxis::X => match space {
                        MouseSpace::Screen => devices.mouse_position().0,
                        MouseSpace::Client(window) => devices.mouse_position_in(window).0,
                    },
                    MouseAxis::Y => match space {
                        MouseSpace::Screen => devices.mouse_position().1,
                        MouseSpace::Client(window) => devices.mouse_position_in(window).1,
                    },
                    MouseAxis::DeltaX => devices.mouse_delta().0,
                    MouseAxis::DeltaY => devices.mouse_delta().1,
                    MouseAxis::Wheel => devices.wheel_total(),
                    MouseAxis::DeltaWheel => devices.wheel_delta(),
                };
                CommandOutput::new(axis_fired(v, threshold), v)
            }

            BindingSource::ControllerButton { button, state, controller } => {
                if !devices.is_controller_connected(controller) {
                    return CommandOutput::default();
                }
                let down = devices.is_pad_button_down(controller, button);
                let fired = digital_fired(
                    down,
                    devices.is_pad_button_trigger(controller, button),
                    devices.is_pad_button_release(controller, button),
                    state,
                );
                CommandOutput::new(fired, if down { 1.0 } else { 0.0 })
            }

            BindingSource::ControllerAnalog { channel, state, controller, threshold } => {
                if !devices.is_controller_connected(controller) {
                    return CommandOutput::default();
                }
                let raw = devices.analog(controller, channel);
                let v = if channel.is_trigger() {
                    normalize_trigger(raw)
                } else {
                    normalize_stick(raw)
                };
                let fired = match state {
                    InputState::Down | InputState::Trigger => v.abs() > threshold,
                    InputState::Release => v.abs() <= threshold,
                };
                CommandOutput::new(fired, v)
            }

            BindingSource::ControllerAnalogDelta { channel, controller, threshold } => {
                if !devices.is_controller_connected(controller) {
                    return CommandOutput::default();
                }
                let raw = devices.analog_delta(controller, channel);
                let dv = if channel.is_trigger() {
                    normalize_trigger_delta(raw)
                } else {
                    normalize_stick_delta(raw)
                };
                CommandOutput::new(axis_fired(dv, threshold), dv)
            }
        };

        if binding.invert_value {
            CommandOutput::new(out.triggered, -out.value)
        } else {
            out
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
