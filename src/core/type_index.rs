//=========================================================================
// Component Type Index Registry
//=========================================================================
//
// Process-wide mapping from concrete component types to small sequential
// indices.
//
// Architecture:
//   TypeId ──type_index()──> usize (monotonic, never reused)
//
// Indices are assigned on first use and are deterministic within a single
// process, but NOT stable across runs or builds. Everything that stores
// components by type (component slots, entity columns) keys off these
// indices so lookups stay O(1) array accesses instead of hash probes.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::any::TypeId;
use std::sync::{Mutex, OnceLock};

//=== External Crates =====================================================

use ahash::AHashMap;

//=== Registry ============================================================

/// Global type-index table, constructed on first use.
///
/// A `Mutex` guards registration so indices stay consistent even if a
/// future embedding registers types from multiple threads. The core update
/// loop itself is single-threaded and only ever reads cached indices.
fn registry() -> &'static Mutex<AHashMap<TypeId, usize>> {
    static REGISTRY: OnceLock<Mutex<AHashMap<TypeId, usize>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(AHashMap::new()))
}

/// Returns the process-wide sequential index for the concrete type `T`.
///
/// The first call for a given type allocates the next free index; later
/// calls return the same value. Indices are never reused.
pub fn type_index<T: 'static>() -> usize {
    type_index_of(TypeId::of::<T>())
}

/// Like [`type_index`] but keyed by an already-known `TypeId`.
pub fn type_index_of(type_id: TypeId) -> usize {
    let mut map = registry().lock().expect("type index registry poisoned");
    let next = map.len();
    *map.entry(type_id).or_insert(next)
}

//=========================================================================
// Unit Tests
//=========================================================================
