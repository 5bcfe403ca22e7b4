//=========================================================================
// Scene System
//
// Scene lifecycle, scene-wide components, and deferred mutation.
//
// Responsibilities:
// - Define the `SceneComponent` contract (priority-ordered, capped)
// - Hold each scene's live state (`SceneContext`)
// - Queue structural mutations for the end-of-frame flush (`SceneOps`)
// - Drive registration, transitions, and teardown (`SceneManager`)
//
//=========================================================================

//=== Submodules ==========================================================

mod component;
mod context;
mod manager;
mod ops;

//=== Public API ==========================================================

pub use component::{SceneComponent, DEFAULT_MAX_PER_SCENE, DEFAULT_UPDATE_PRIORITY};
pub use context::{SceneContext, SceneView};
pub use manager::{SceneDelegate, SceneManager};
pub use ops::{SceneOp, SceneOps};
