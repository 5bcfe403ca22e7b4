//=========================================================================
// Cadence Engine — Library Root
//
// This crate defines the public API surface of the Cadence engine core.
//
// Responsibilities:
// - Expose the engine facade (`Engine` / `EngineBuilder`)
// - Expose the core subsystems (input, objects, scenes, entity store)
//   for engine-level extensibility
// - Provide a `prelude` with the types scene authors touch every day
//
// Typical usage:
// ```no_run
// use cadence_engine::EngineBuilder;
//
// fn main() {
//     let mut engine = EngineBuilder::new().build();
//     loop {
//         engine.tick(1.0 / 60.0);
//         # break;
//     }
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains all internal engine systems (input, scenes, objects,
// the entity store). It is exposed publicly for extensibility, but
// application code will mostly use the top-level facade and the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the main entry point and the per-tick coordinator.
//
mod engine;

//--- Public Exports ------------------------------------------------------
//
// Re-exports the facade so users can `use cadence_engine::Engine;`
// without knowing the internal module structure.
//
pub use engine::{Engine, EngineBuilder};
