//=========================================================================
// Device State Snapshot
//=========================================================================
//
// Per-frame snapshot of every polled input device.
//
// Architecture:
//   RawInputEvent → apply() → current sets  ──begin_frame()──> previous sets
//
// Frame lifecycle: begin_frame() → apply()* → end_frame() → query.
// Between two advances the snapshot is immutable, so command evaluation
// is idempotent within a frame.
//
// Down/Trigger/Release are derived from the current and previous frame's
// state sets: Trigger = down now and not down last frame, Release = down
// last frame and not now. Analog channels keep raw hardware magnitudes;
// normalization is the command layer's job.
//
//=========================================================================

//=== External Crates =====================================================

use ahash::{AHashMap, AHashSet};

//=== Internal Dependencies ===============================================

use super::event::{
    AnalogChannel, ControllerButton, KeyCode, MouseButton, RawInputEvent, WindowHandle,
    ANALOG_CHANNEL_COUNT, MAX_CONTROLLERS,
};

//=== ControllerState =====================================================

/// Snapshot of one controller slot.
#[derive(Debug, Clone, Default)]
struct ControllerState {
    connected: bool,
    buttons_down: AHashSet<ControllerButton>,
    buttons_prev: AHashSet<ControllerButton>,
    analog: [i32; ANALOG_CHANNEL_COUNT],
    analog_prev: [i32; ANALOG_CHANNEL_COUNT],
}

//=== DeviceState =========================================================

/// Snapshot of keyboard, mouse and controller state for the current frame.
///
/// Owned by the engine and advanced exactly once per tick, before any
/// command evaluation or component update runs.
#[derive(Debug, Clone)]
pub struct DeviceState {
    //--- Keyboard ---------------------------------------------------------
    keys_down: AHashSet<KeyCode>,
    keys_prev: AHashSet<KeyCode>,

    //--- Mouse ------------------------------------------------------------
    mouse_buttons_down: AHashSet<MouseButton>,
    mouse_buttons_prev: AHashSet<MouseButton>,
    mouse_position: (f32, f32),
    last_mouse_position: (f32, f32),
    mouse_delta: (f32, f32),
    wheel_total: f32,
    wheel_delta: f32,

    //--- Windows ----------------------------------------------------------
    window_origins: AHashMap<WindowHandle, (f32, f32)>,

    //--- Controllers ------------------------------------------------------
    controllers: [ControllerState; MAX_CONTROLLERS],
}

impl DeviceState {
    /// Creates an empty snapshot with nothing pressed and no controllers
    /// connected.
    pub fn new() -> Self {
        Self {
            keys_down: AHashSet::new(),
            keys_prev: AHashSet::new(),
            mouse_buttons_down: AHashSet::new(),
            mouse_buttons_prev: AHashSet::new(),
            mouse_position: (0.0, 0.0),
            last_mouse_position: (0.0, 0.0),
            mouse_delta: (0.0, 0.0),
            wheel_total: 0.0,
            wheel_delta: 0.0,
            window_origins: AHashMap::new(),
            controllers: Default::default(),
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Rolls the current state into the previous-frame buffers and resets
    /// per-frame accumulators. Call once at the start of every tick.
    pub fn begin_frame(&mut self) {
        self.keys_prev = self.keys_down.clone();
        self.mouse_buttons_prev = self.mouse_buttons_down.clone();
        self.last_mouse_position = self.mouse_position;
        self.wheel_delta = 0.0;

        for pad in &mut self.controllers {
            pad.buttons_prev = pad.buttons_down.clone();
            pad.analog_prev = pad.analog;
        }
    }

    /// Applies a single raw event to the current state.
    pub fn apply(&mut self, event: &RawInputEvent) {
        match *event {
            RawInputEvent::KeyDown(key) => {
                self.keys_down.insert(key);
            }
            RawInputEvent::KeyUp(key) => {
                self.keys_down.remove(&key);
            }
            RawInputEvent::MouseButtonDown(button) => {
                self.mouse_buttons_down.insert(button);
            }
            RawInputEvent::MouseButtonUp(button) => {
                self.mouse_buttons_down.remove(&button);
            }
            RawInputEvent::MouseMoved { x, y } => {
                self.mouse_position = (x, y);
            }
            RawInputEvent::MouseWheel { delta } => {
                self.wheel_delta += delta;
                self.wheel_total += delta;
            }
            RawInputEvent::ControllerConnected { index } => {
                if let Some(pad) = self.controllers.get_mut(index) {
                    pad.connected = true;
                }
            }
            RawInputEvent::ControllerDisconnected { index } => {
                if let Some(pad) = self.controllers.get_mut(index) {
                    // Drop all held state so a reconnect starts clean.
                    *pad = ControllerState::default();
                }
            }
            RawInputEvent::ControllerButtonDown { index, button } => {
                if let Some(pad) = self.controllers.get_mut(index) {
                    pad.buttons_down.insert(button);
                }
            }
            RawInputEvent::ControllerButtonUp { index, button } => {
                if let Some(pad) = self.controllers.get_mut(index) {
                    pad.buttons_down.remove(&button);
                }
            }
            RawInputEvent::ControllerAnalog { index, channel, raw } => {
                if let Some(pad) = self.controllers.get_mut(index) {
                    pad.analog[channel.index()] = raw;
                }
            }
            RawInputEvent::WindowMoved { handle, x, y } => {
                self.window_origins.insert(handle, (x, y));
            }
            RawInputEvent::Unidentified => {
                // Ignore unrecognized events
            }
        }
    }

    /// Finalizes frame calculations (mouse delta). Call after all events
    /// for the tick have been applied.
    pub fn end_frame(&mut self) {
        self.mouse_delta = (
            self.mouse_position.0 - self.last_mouse_position.0,
            self.mouse_position.1 - self.last_mouse_position.1,
        );
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// Returns `true` while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns `true` if the key transitioned UP → DOWN this frame.
    pub fn is_key_trigger(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key) && !self.keys_prev.contains(&key)
    }

    /// Returns `true` if the key transitioned DOWN → UP this frame.
    pub fn is_key_release(&self, key: KeyCode) -> bool {
        !self.keys_down.contains(&key) && self.keys_prev.contains(&key)
    }

    //=====================================================================
    // Query API - Mouse
    //=====================================================================

    /// Returns `true` while the mouse button is held.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons_down.contains(&button)
    }

    /// Returns `true` if the button transitioned UP → DOWN this frame.
    pub fn is_button_trigger(&self, button: MouseButton) -> bool {
        self.mouse_buttons_down.contains(&button) && !self.mouse_buttons_prev.contains(&button)
    }

    /// Returns `true` if the button transitioned DOWN → UP this frame.
    pub fn is_button_release(&self, button: MouseButton) -> bool {
        !self.mouse_buttons_down.contains(&button) && self.mouse_buttons_prev.contains(&button)
    }

    /// Mouse position in screen coordinates (pixels, top-left origin).
    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    /// Mouse position relative to a window's registered client origin.
    ///
    /// Falls back to screen coordinates when the window's origin was never
    /// reported.
    pub fn mouse_position_in(&self, window: WindowHandle) -> (f32, f32) {
        match self.window_origins.get(&window) {
            Some(&(ox, oy)) => (self.mouse_position.0 - ox, self.mouse_position.1 - oy),
            None => self.mouse_position,
        }
    }

    /// Mouse movement since the previous frame.
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    /// Accumulated wheel rotation since startup.
    pub fn wheel_total(&self) -> f32 {
        self.wheel_total
    }

    /// Wheel rotation this frame.
    pub fn wheel_delta(&self) -> f32 {
        self.wheel_delta
    }

    //=====================================================================
    // Query API - Controllers
    //=====================================================================

    /// Returns `true` if a controller is attached at the slot.
    pub fn is_controller_connected(&self, index: usize) -> bool {
        self.controllers.get(index).map_or(false, |p| p.connected)
    }

    /// Returns `true` while the controller button is held.
    pub fn is_pad_button_down(&self, index: usize, button: ControllerButton) -> bool {
        self.controllers
            .get(index)
            .map_or(false, |p| p.buttons_down.contains(&button))
    }

    /// Returns `true` if the controller button transitioned UP → DOWN this
    /// frame.
    pub fn is_pad_button_trigger(&self, index: usize, button: ControllerButton) -> bool {
        self.controllers.get(index).map_or(false, |p| {
            p.buttons_down.contains(&button) && !p.buttons_prev.contains(&button)
        })
    }

    /// Returns `true` if the controller button transitioned DOWN → UP this
    /// frame.
    pub fn is_pad_button_release(&self, index: usize, button: ControllerButton) -> bool {
        self.controllers.get(index).map_or(false, |p| {
            !p.buttons_down.contains(&button) && p.buttons_prev.contains(&button)
        })
    }

    /// Raw analog magnitude for the channel (hardware range).
    pub fn analog(&self, index: usize, channel: AnalogChannel) -> i32 {
        self.controllers
            .get(index)
            .map_or(0, |p| p.analog[channel.index()])
    }

    /// Raw analog change since the previous frame.
    pub fn analog_delta(&self, index: usize, channel: AnalogChannel) -> i32 {
        self.controllers.get(index).map_or(0, |p| {
            p.analog[channel.index()] - p.analog_prev[channel.index()]
        })
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
