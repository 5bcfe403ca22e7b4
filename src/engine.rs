//=========================================================================
// Cadence Engine
//
// Main entry point and per-tick coordinator.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──tick(dt)──>  [Frame]
//         │                          │
//         ├─ with_channel_capacity() └─ drain input pump
//         ├─ register_scene()           advance device snapshot
//         └─ with_initial_scene()       apply pending scene change
//                                       run scene + object passes
//                                       flush deferred operations
// ```
//
// The engine core is single-threaded: the embedding platform layer owns
// the clock and calls `tick` once per frame. The input channel is the
// only cross-thread boundary.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::frame::FrameContext;
use crate::core::input::{DeviceState, InputCommand, InputPump, InputSender};
use crate::core::scene::{SceneDelegate, SceneManager};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Input channel capacity**: 128 events
/// - **Initial scene**: none (the engine idles until
///   [`Engine::change_scene`] is called)
///
/// # Examples
///
/// ```
/// use cadence_engine::prelude::*;
///
/// struct Title;
///
/// impl SceneDelegate for Title {
///     fn on_initialize(&mut self, scene: &mut SceneContext, commands: &mut InputCommand) {
///         commands.register_key("Confirm", KeyCode::Enter, InputState::Trigger, false);
///         scene.add_object_2d(Object2D::new("logo"));
///     }
/// }
///
/// let mut engine = EngineBuilder::new()
///     .with_channel_capacity(256)
///     .register_scene("Title", Box::new(Title))
///     .with_initial_scene("Title")
///     .build();
///
/// engine.tick(1.0 / 60.0);
/// assert_eq!(engine.scenes().active_name(), Some("Title"));
/// ```
pub struct EngineBuilder {
    channel_capacity: usize,
    scenes: SceneManager,
    initial_scene: Option<String>,
}

impl EngineBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            channel_capacity: 128,
            scenes: SceneManager::new(),
            initial_scene: None,
        }
    }

    /// Sets the input event channel capacity. When the channel is full
    /// the platform side drops events instead of blocking.
    ///
    /// # Panics
    /// Panics if `capacity` is zero (a zero-capacity channel would make
    /// every send a rendezvous with the update thread).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "input channel capacity must be non-zero");
        self.channel_capacity = capacity;
        self
    }

    /// Registers a scene under a name.
    pub fn register_scene(mut self, name: &str, delegate: Box<dyn SceneDelegate>) -> Self {
        self.scenes.register(name, delegate);
        self
    }

    /// Names the scene to enter on the first tick.
    pub fn with_initial_scene(mut self, name: &str) -> Self {
        self.initial_scene = Some(name.to_owned());
        self
    }

    /// Constructs the engine.
    pub fn build(mut self) -> Engine {
        info!(
            "Engine built (channel capacity {}, initial scene {:?})",
            self.channel_capacity, self.initial_scene
        );
        if let Some(name) = self.initial_scene.take() {
            self.scenes.change_to(&name);
        }
        Engine {
            pump: InputPump::new(self.channel_capacity),
            devices: DeviceState::new(),
            commands: InputCommand::new(),
            scenes: self.scenes,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// The engine core: input plumbing plus the scene lifecycle driver.
///
/// The embedding platform layer feeds raw events through
/// [`input_sender`](Self::input_sender) and calls [`tick`](Self::tick)
/// once per frame with the elapsed time.
pub struct Engine {
    pump: InputPump,
    devices: DeviceState,
    commands: InputCommand,
    scenes: SceneManager,
}

impl Engine {
    /// Shorthand for [`EngineBuilder::new`].
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Runs a configuration closure against the freshly built engine and
    /// hands it back, so setup can stay in one builder-style chain:
    ///
    /// ```
    /// # use cadence_engine::EngineBuilder;
    /// let engine = EngineBuilder::new()
    ///     .build()
    ///     .init(|engine| {
    ///         engine.change_scene("Title");
    ///     });
    /// ```
    pub fn init(mut self, f: impl FnOnce(&mut Engine)) -> Self {
        f(&mut self);
        self
    }

    //--- Accessors -------------------------------------------------------

    /// A cloneable handle for feeding raw input events from any thread.
    pub fn input_sender(&self) -> InputSender {
        self.pump.sender()
    }

    /// The current device snapshot (as of the last tick).
    pub fn devices(&self) -> &DeviceState {
        &self.devices
    }

    /// The command binding table.
    ///
    /// Bindings are scene-scoped: every transition clears the table
    /// before the incoming scene's `on_initialize` runs. Bindings added
    /// here directly only live until the next scene change; anything
    /// that must survive belongs in each delegate's `on_initialize`.
    pub fn commands_mut(&mut self) -> &mut InputCommand {
        &mut self.commands
    }

    /// The scene registry and lifecycle state.
    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// Mutable scene registry access (e.g. for late registration).
    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    /// Requests a scene transition, applied at the start of the next
    /// tick.
    pub fn change_scene(&mut self, name: &str) {
        self.scenes.change_to(name);
    }

    //--- tick() ----------------------------------------------------------

    /// Advances the engine by one frame.
    ///
    /// Order within a tick:
    /// 1. Drain the input pump and advance the device snapshot
    /// 2. Apply a pending scene transition, if any
    /// 3. Scene component pass (ascending priority)
    /// 4. Object update pass, then object pre-render pass
    /// 5. Delegate update
    /// 6. Flush deferred operations (removals, transition latch)
    pub fn tick(&mut self, dt: f32) {
        self.devices.begin_frame();
        self.pump.drain_into(&mut self.devices);
        self.devices.end_frame();

        self.scenes.apply_pending(&mut self.commands);

        let frame = FrameContext {
            dt,
            devices: &self.devices,
            commands: &self.commands,
        };
        self.scenes.update(&frame);
    }

    /// Finalizes the active scene. Call once before dropping the engine
    /// so scene components and objects get their teardown hooks.
    pub fn shutdown(&mut self) {
        info!("Engine shutting down");
        self.scenes.shutdown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputState, KeyCode, RawInputEvent};
    use crate::core::scene::SceneContext;

    //--- Test Fixtures ---------------------------------------------------

    struct EmptyScene;

    impl SceneDelegate for EmptyScene {
        fn on_initialize(&mut self, _scene: &mut SceneContext, commands: &mut InputCommand) {
            commands.register_key("Confirm", KeyCode::Enter, InputState::Trigger, false);
        }
    }

    //--- Tests -----------------------------------------------------------

    #[test]
    fn initial_scene_becomes_active_on_first_tick() {
        let mut engine = EngineBuilder::new()
            .register_scene("Title", Box::new(EmptyScene))
            .with_initial_scene("Title")
            .build();

        assert_eq!(engine.scenes().active_name(), None);
        engine.tick(1.0 / 60.0);
        assert_eq!(engine.scenes().active_name(), Some("Title"));
    }

    #[test]
    fn events_sent_before_a_tick_are_visible_during_it() {
        let mut engine = EngineBuilder::new()
            .register_scene("Title", Box::new(EmptyScene))
            .with_initial_scene("Title")
            .build();
        let sender = engine.input_sender();

        engine.tick(1.0 / 60.0);
        sender.send(RawInputEvent::KeyDown(KeyCode::Enter));
        engine.tick(1.0 / 60.0);

        assert!(engine.devices().is_key_down(KeyCode::Enter));
        assert!(engine
            .commands
            .evaluate("Confirm", engine.devices())
            .triggered());
    }

    #[test]
    fn no_scene_engine_still_ticks() {
        let mut engine = EngineBuilder::new().build();
        engine.tick(1.0 / 60.0);
        assert_eq!(engine.scenes().active_name(), None);
    }

    //--- End-to-End ------------------------------------------------------

    use crate::core::input::ControllerButton;
    use crate::core::object::{Object2D, ObjectComponent, ObjectContext};
    use std::any::Any;

    /// Applies an upward impulse whenever the "Jump" action triggers,
    /// then falls back under gravity.
    struct JumpController {
        velocity_y: f32,
    }

    impl ObjectComponent for JumpController {
        fn type_name(&self) -> &'static str {
            "JumpController"
        }
        fn update(&mut self, ctx: &mut ObjectContext) {
            if ctx.command("Jump").triggered() {
                self.velocity_y = 5.0;
            }
            self.velocity_y -= 10.0 * ctx.dt();
            let dy = self.velocity_y * ctx.dt();
            let owner = ctx.owner_2d();
            owner.transform.position[1] = (owner.transform.position[1] + dy).max(0.0);
        }
        fn clone_component(&self) -> Box<dyn ObjectComponent> {
            Box::new(JumpController {
                velocity_y: self.velocity_y,
            })
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct GameplayScene;

    impl SceneDelegate for GameplayScene {
        fn on_initialize(&mut self, scene: &mut SceneContext, commands: &mut InputCommand) {
            commands.register_key("Jump", KeyCode::Space, InputState::Trigger, false);
            commands.register_pad_button("Jump", ControllerButton::A, InputState::Trigger, 0, false);
            let mut player = Object2D::new("player");
            player.add_component(JumpController { velocity_y: 0.0 });
            scene.add_object_2d(player);
        }
    }

    #[test]
    fn space_press_makes_the_player_jump() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut engine = EngineBuilder::new()
            .register_scene("Game", Box::new(GameplayScene))
            .with_initial_scene("Game")
            .build();
        let sender = engine.input_sender();
        let dt = 1.0 / 60.0;

        // Settle one frame with no input: player stays grounded.
        engine.tick(dt);
        let player_y = |engine: &mut Engine| {
            engine
                .scenes_mut()
                .active_scene_mut()
                .unwrap()
                .object_2d_named("player")
                .unwrap()
                .data
                .transform
                .position[1]
        };
        assert_eq!(player_y(&mut engine), 0.0);

        // Press Space: the trigger edge fires exactly once.
        sender.send(RawInputEvent::KeyDown(KeyCode::Space));
        engine.tick(dt);
        let after_press = player_y(&mut engine);
        assert!(after_press > 0.0);

        // Held key is Down but no longer Trigger; gravity still applies
        // upward motion from the stored velocity.
        engine.tick(dt);
        let second = player_y(&mut engine);
        assert!(second > after_press);

        // Release and wait: the player falls back to the ground.
        sender.send(RawInputEvent::KeyUp(KeyCode::Space));
        for _ in 0..120 {
            engine.tick(dt);
        }
        assert_eq!(player_y(&mut engine), 0.0);

        engine.shutdown();
    }
}
