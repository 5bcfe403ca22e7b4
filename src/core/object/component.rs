//=========================================================================
// Object Component Trait
//=========================================================================
//
// The capability contract every attachable per-object behavior
// implements.
//
// Lifecycle (per instance):
//   Constructed → initialize() → { update() ⇄ pre_render() }* → shutdown()
//
// `initialize` runs exactly once, after the component's object has been
// attached to a live scene (lazily, at the start of its first update
// pass). `update` and `pre_render` are two distinct passes across ALL
// components of a frame — every component's update completes before any
// pre_render runs. `shutdown` runs exactly once before the owning object
// is torn down.
//
// `clone_component` is the prefab mechanism: a deep, independent copy
// preserving externally observable configuration. Transient runtime
// state is only copied if the concrete component chooses to.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::object::ObjectContext;

//=== ObjectComponent =====================================================

/// Attachable per-object behavior.
///
/// Implementors provide a stable human-readable `type_name` (used only
/// for logging and introspection) and a deep [`clone_component`]
/// (Self::clone_component). At most one live instance of a concrete type
/// exists per object.
///
/// The `as_any` accessors power the typed lookup
/// (`ObjectContext::get::<T>()`); implement them as `self`.
pub trait ObjectComponent: Any {
    /// Human-readable type tag for logs and debug output.
    fn type_name(&self) -> &'static str;

    /// One-shot setup, called after the owning object joins a live scene.
    fn initialize(&mut self) {}

    /// Per-frame logic/physics pass.
    fn update(&mut self, _ctx: &mut ObjectContext) {}

    /// Per-frame render-staging pass, run after every component's update.
    fn pre_render(&mut self, _ctx: &mut ObjectContext) {}

    /// One-shot teardown, called before the owning object is destroyed.
    /// Must release any owned render-attachment state.
    fn shutdown(&mut self) {}

    /// Deep copy for prefab duplication. The clone exclusively owns its
    /// state; mutating it must never affect the original.
    fn clone_component(&self) -> Box<dyn ObjectComponent>;

    /// Upcast for typed lookup.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed lookup.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
