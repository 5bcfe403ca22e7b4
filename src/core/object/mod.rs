//=========================================================================
// Object System
//
// Component-based scene objects.
//
// Responsibilities:
// - Define the `ObjectComponent` behavior contract and its lifecycle
// - Store components with O(1) typed lookup (`ComponentSet`)
// - Drive the per-object update and pre-render passes
// - Deep-copy objects for prefab duplication (`instantiate`)
//
//=========================================================================

//=== Submodules ==========================================================

mod component;
mod component_set;
pub(crate) mod object;

//=== Public API ==========================================================

pub use component::ObjectComponent;
pub use component_set::ComponentSet;
pub use object::{
    Object2D, Object2DData, Object3D, Object3DData, ObjectContext, ObjectId, Transform2D,
    Transform3D,
};
