//=========================================================================
// Engine Core
//
// All internal engine systems: input, objects, scenes, the entity
// store, and the shared frame context.
//
// Module map:
// - `input`      raw events → device snapshot → command evaluation
// - `object`     component-based 2D/3D scene objects
// - `scene`      scene lifecycle, scene components, deferred mutation
// - `ecs`        flat entity/component table for bulk data
// - `frame`      read-only per-frame context shared by every pass
// - `type_index` process-wide dense indices for component types
//
//=========================================================================

pub mod ecs;
pub mod frame;
pub mod input;
pub mod object;
pub mod scene;
pub(crate) mod type_index;
