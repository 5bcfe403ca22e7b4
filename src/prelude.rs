//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use cadence_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};

// Input system
pub use crate::core::input::{
    AnalogChannel, CommandOutput, ControllerButton, DeviceState, InputCommand, InputState,
    KeyCode, MouseAxis, MouseButton, MouseSpace, RawInputEvent, WindowHandle,
};

// Object system
pub use crate::core::object::{
    Object2D, Object3D, ObjectComponent, ObjectContext, ObjectId, Transform2D, Transform3D,
};

// Scene system
pub use crate::core::scene::{SceneComponent, SceneContext, SceneDelegate, SceneView};

// Entity store
pub use crate::core::ecs::{Entity, EntityStore};

// Frame context
pub use crate::core::frame::FrameContext;
