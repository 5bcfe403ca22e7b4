//=========================================================================
// Scene Component Trait
//=========================================================================
//
// Scene-wide behaviors: systems that act on the scene as a whole rather
// than on one object (spawners, camera controllers, score keepers).
//
// Unlike object components, several instances of the same concrete type
// may coexist in a scene, up to the type's per-scene cap. Each frame the
// scene runs every component's update in ascending priority order;
// components with equal priority keep their registration order.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::context::SceneView;

//=== Priority ============================================================

/// Default update priority. Lower runs earlier.
pub const DEFAULT_UPDATE_PRIORITY: i32 = 1;

/// Default per-scene instance cap for a scene component type.
pub const DEFAULT_MAX_PER_SCENE: usize = 255;

//=== SceneComponent ======================================================

/// Scene-wide per-frame behavior.
///
/// `update_priority` is re-read every frame, so implementors that store
/// the priority in a field (and honor `set_update_priority`) can be
/// reordered at runtime.
pub trait SceneComponent: Any {
    /// Human-readable type tag for logs and debug output.
    fn type_name(&self) -> &'static str;

    /// How many instances of this concrete type one scene may hold.
    fn max_per_scene(&self) -> usize {
        DEFAULT_MAX_PER_SCENE
    }

    /// Ascending execution order within the scene component pass.
    fn update_priority(&self) -> i32 {
        DEFAULT_UPDATE_PRIORITY
    }

    /// Reorders this component for subsequent frames. The default
    /// implementation ignores the request; implementors with a priority
    /// field should store it.
    fn set_update_priority(&mut self, _priority: i32) {}

    /// One-shot setup, called lazily at the start of the component's
    /// first update pass after it joins a live scene.
    fn initialize(&mut self) {}

    /// Per-frame scene-wide logic.
    fn update(&mut self, _scene: &mut SceneView) {}

    /// One-shot teardown, called when the scene is finalized.
    fn finalize(&mut self) {}

    /// Upcast for typed lookup.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed lookup.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
