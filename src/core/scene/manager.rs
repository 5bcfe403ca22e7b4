//=========================================================================
// Scene Manager
//=========================================================================
//
// Owns every registered scene and drives the active one's lifecycle.
//
// Transition protocol: a requested change is latched as pending and
// applied at the start of the next tick, never mid-frame. Applying a
// transition finalizes the outgoing scene (objects shut down, scene
// components finalized, state cleared), clears the command binding
// table, then initializes the incoming scene from scratch. Re-entering a
// scene always starts it fresh.
//
//=========================================================================

//=== External Crates =====================================================

use ahash::AHashMap;
use log::{info, warn};

//=== Internal Dependencies ===============================================

use super::context::{SceneContext, SceneView};
use crate::core::frame::FrameContext;
use crate::core::input::InputCommand;

//=== SceneDelegate =======================================================

/// Per-scene author hooks.
///
/// The delegate populates the scene on entry (objects, scene components,
/// command bindings) and may run scene-level logic each frame after the
/// component and object passes.
pub trait SceneDelegate {
    /// Called when the scene becomes active. Populate the scene and
    /// register the command bindings it needs.
    fn on_initialize(&mut self, scene: &mut SceneContext, commands: &mut InputCommand);

    /// Called every frame after the scene component and object passes,
    /// before the deferred operation flush.
    fn on_update(&mut self, _scene: &mut SceneView) {}

    /// Called when the scene is about to be finalized, while its objects
    /// and components are still live.
    fn on_finalize(&mut self, _scene: &mut SceneContext) {}
}

//=== SceneManager ========================================================

struct SceneEntry {
    delegate: Box<dyn SceneDelegate>,
    context: SceneContext,
}

/// Registry and lifecycle driver for all scenes.
#[derive(Default)]
pub struct SceneManager {
    scenes: AHashMap<String, SceneEntry>,
    active: Option<String>,
    pending: Option<String>,
}

impl SceneManager {
    /// Creates a manager with no scenes.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration ----------------------------------------------------

    /// Registers a scene under a name. Re-registering a name replaces
    /// the previous delegate (after finalizing it if it is active).
    pub fn register(&mut self, name: &str, delegate: Box<dyn SceneDelegate>) {
        if self.active.as_deref() == Some(name) {
            warn!("Replacing active scene '{}'; finalizing it first", name);
            if let Some(entry) = self.scenes.get_mut(name) {
                entry.delegate.on_finalize(&mut entry.context);
                entry.context.finalize();
            }
            self.active = None;
        }
        self.scenes.insert(
            name.to_owned(),
            SceneEntry {
                delegate,
                context: SceneContext::new(name),
            },
        );
    }

    /// Requests a transition; applied at the start of the next tick. The
    /// last request before that point wins.
    pub fn change_to(&mut self, name: &str) {
        self.pending = Some(name.to_owned());
    }

    /// Name of the currently active scene, if any.
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Read access to the active scene's state.
    pub fn active_scene(&self) -> Option<&SceneContext> {
        let name = self.active.as_deref()?;
        self.scenes.get(name).map(|entry| &entry.context)
    }

    /// Mutable access to the active scene's state.
    pub fn active_scene_mut(&mut self) -> Option<&mut SceneContext> {
        let name = self.active.clone()?;
        self.scenes.get_mut(&name).map(|entry| &mut entry.context)
    }

    //--- Lifecycle -------------------------------------------------------

    /// Applies a pending transition, if any. A request naming an
    /// unregistered scene is dropped with a warning and the current
    /// scene stays active.
    pub(crate) fn apply_pending(&mut self, commands: &mut InputCommand) {
        let Some(next) = self.pending.take() else {
            return;
        };
        if !self.scenes.contains_key(&next) {
            warn!("Scene change to unregistered scene '{}' ignored", next);
            return;
        }
        if self.active.as_deref() == Some(next.as_str()) {
            // Transition to the already-active scene restarts it.
            info!("Restarting scene '{}'", next);
        }

        if let Some(current) = self.active.take() {
            if let Some(entry) = self.scenes.get_mut(&current) {
                entry.delegate.on_finalize(&mut entry.context);
                entry.context.finalize();
            }
        }
        // Bindings are scene-scoped; the incoming scene registers its own.
        commands.clear();

        info!("Entering scene '{}'", next);
        let Some(entry) = self.scenes.get_mut(&next) else {
            return;
        };
        entry.context = SceneContext::new(&next);
        entry.delegate.on_initialize(&mut entry.context, commands);
        self.active = Some(next);
    }

    /// Ticks the active scene: component and object passes, delegate
    /// update, then the deferred flush. A resulting scene change is
    /// latched for the next tick.
    pub(crate) fn update(&mut self, frame: &FrameContext<'_>) {
        let Some(name) = self.active.clone() else {
            return;
        };
        let Some(entry) = self.scenes.get_mut(&name) else {
            return;
        };
        entry.context.update(frame);
        {
            let mut view = SceneView::new(frame, &mut entry.context);
            entry.delegate.on_update(&mut view);
        }
        if let Some(next) = entry.context.flush_ops() {
            self.pending = Some(next);
        }
    }

    /// Finalizes the active scene, if any. Used at engine shutdown.
    pub(crate) fn shutdown(&mut self) {
        if let Some(current) = self.active.take() {
            if let Some(entry) = self.scenes.get_mut(&current) {
                entry.delegate.on_finalize(&mut entry.context);
                entry.context.finalize();
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
