//=========================================================================
// Component Set
//=========================================================================
//
// Per-object component storage with O(1) typed lookup.
//
// Storage layout: a sparse `Vec<Option<Slot>>` indexed by the process-
// wide component type index, so `get::<T>()` is a single array access
// after the one-time index assignment. At most one component of each
// concrete type exists per object; attaching a duplicate is rejected.
//
// Slots track an `initialized` flag so initialization can run lazily —
// a component attached mid-frame is initialized at the start of its
// first update pass, never in the middle of one.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::any::Any;

//=== External Crates =====================================================

use log::warn;

//=== Internal Dependencies ===============================================

use super::component::ObjectComponent;
use crate::core::type_index::{type_index, type_index_of};

//=== Slot ================================================================

/// One attached component plus its lifecycle bookkeeping.
pub(crate) struct Slot {
    pub(crate) component: Box<dyn ObjectComponent>,
    pub(crate) initialized: bool,
}

//=== ComponentSet ========================================================

/// Typed component storage for a single object.
#[derive(Default)]
pub struct ComponentSet {
    slots: Vec<Option<Slot>>,
}

impl ComponentSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    //--- add() -----------------------------------------------------------

    /// Attaches a component. Returns false (and leaves the set unchanged)
    /// if a component of the same concrete type is already attached.
    pub fn add<C: ObjectComponent>(&mut self, component: C) -> bool {
        self.add_boxed(Box::new(component))
    }

    /// Attaches an already-boxed component. Same duplicate rule as
    /// [`add`](Self::add).
    pub fn add_boxed(&mut self, component: Box<dyn ObjectComponent>) -> bool {
        let idx = type_index_of(component.as_any().type_id());
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        if self.slots[idx].is_some() {
            warn!(
                "Duplicate component '{}' rejected; one instance per type",
                component.type_name()
            );
            return false;
        }
        self.slots[idx] = Some(Slot {
            component,
            initialized: false,
        });
        true
    }

    //--- get() / get_mut() -----------------------------------------------

    /// Typed lookup. Returns None if no component of type `C` is
    /// attached, or if that component's slot is vacated because its own
    /// lifecycle method is currently running.
    pub fn get<C: ObjectComponent>(&self) -> Option<&C> {
        let idx = type_index::<C>();
        self.slots
            .get(idx)?
            .as_ref()
            .and_then(|slot| slot.component.as_any().downcast_ref::<C>())
    }

    /// Mutable typed lookup. Same vacancy rule as [`get`](Self::get).
    pub fn get_mut<C: ObjectComponent>(&mut self) -> Option<&mut C> {
        let idx = type_index::<C>();
        self.slots
            .get_mut(idx)?
            .as_mut()
            .and_then(|slot| slot.component.as_any_mut().downcast_mut::<C>())
    }

    /// True if a component of type `C` is attached (and not vacated).
    pub fn has<C: ObjectComponent>(&self) -> bool {
        self.get::<C>().is_some()
    }

    //--- Iteration support -----------------------------------------------

    /// Indices of every occupied slot, in type-index order. Collected
    /// into an owned list so slots can be vacated while iterating.
    pub(crate) fn occupied_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
            .collect()
    }

    /// Vacates the slot at `idx`, handing out its contents. The slot
    /// reads as empty until [`restore_at`](Self::restore_at) puts the
    /// component back.
    pub(crate) fn take_at(&mut self, idx: usize) -> Option<Slot> {
        self.slots.get_mut(idx)?.take()
    }

    /// Restores a slot previously vacated by [`take_at`](Self::take_at).
    pub(crate) fn restore_at(&mut self, idx: usize, slot: Slot) {
        debug_assert!(self.slots[idx].is_none(), "restoring into an occupied slot");
        self.slots[idx] = Some(slot);
    }

    //--- Lifecycle -------------------------------------------------------

    /// Runs shutdown on every attached, initialized component and clears
    /// the set. Components never initialized are dropped silently.
    pub(crate) fn shutdown_all(&mut self) {
        for slot in self.slots.iter_mut() {
            if let Some(slot) = slot.as_mut() {
                if slot.initialized {
                    slot.component.shutdown();
                }
            }
        }
        self.slots.clear();
    }

    /// Deep-copies every attached component into a fresh set. Clones are
    /// uninitialized regardless of the source's lifecycle state.
    pub(crate) fn clone_set(&self) -> ComponentSet {
        let slots = self
            .slots
            .iter()
            .map(|slot| {
                slot.as_ref().map(|s| Slot {
                    component: s.component.clone_component(),
                    initialized: false,
                })
            })
            .collect();
        ComponentSet { slots }
    }

    /// Number of attached components.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True if no components are attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::object::object::ObjectContext;

    //--- Test Components -------------------------------------------------

    struct Health {
        hp: i32,
    }

    impl ObjectComponent for Health {
        fn type_name(&self) -> &'static str {
            "Health"
        }
        fn clone_component(&self) -> Box<dyn ObjectComponent> {
            Box::new(Health { hp: self.hp })
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct Velocity {
        dx: f32,
    }

    impl ObjectComponent for Velocity {
        fn type_name(&self) -> &'static str {
            "Velocity"
        }
        fn update(&mut self, _ctx: &mut ObjectContext) {
            self.dx += 1.0;
        }
        fn clone_component(&self) -> Box<dyn ObjectComponent> {
            Box::new(Velocity { dx: self.dx })
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    //--- Tests -----------------------------------------------------------

    #[test]
    fn typed_lookup_finds_the_attached_component() {
        let mut set = ComponentSet::new();
        assert!(set.add(Health { hp: 100 }));
        assert!(set.add(Velocity { dx: 0.0 }));

        assert_eq!(set.get::<Health>().unwrap().hp, 100);
        set.get_mut::<Health>().unwrap().hp -= 30;
        assert_eq!(set.get::<Health>().unwrap().hp, 70);
        assert!(set.has::<Velocity>());
    }

    #[test]
    fn duplicate_attach_is_rejected() {
        let mut set = ComponentSet::new();
        assert!(set.add(Health { hp: 100 }));
        assert!(!set.add(Health { hp: 5 }));

        // The original survives the rejected attach.
        assert_eq!(set.get::<Health>().unwrap().hp, 100);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn missing_component_reads_as_none() {
        let set = ComponentSet::new();
        assert!(set.get::<Health>().is_none());
        assert!(!set.has::<Health>());
    }

    #[test]
    fn vacated_slot_reads_as_empty_until_restored() {
        let mut set = ComponentSet::new();
        set.add(Health { hp: 42 });
        let idx = type_index::<Health>();

        let slot = set.take_at(idx).unwrap();
        assert!(set.get::<Health>().is_none());

        set.restore_at(idx, slot);
        assert_eq!(set.get::<Health>().unwrap().hp, 42);
    }

    #[test]
    fn clone_set_is_independent_and_uninitialized() {
        let mut set = ComponentSet::new();
        set.add(Health { hp: 10 });

        let mut copy = set.clone_set();
        copy.get_mut::<Health>().unwrap().hp = 99;

        assert_eq!(set.get::<Health>().unwrap().hp, 10);
        assert_eq!(copy.get::<Health>().unwrap().hp, 99);
        let idx = type_index::<Health>();
        let slot = copy.take_at(idx).unwrap();
        assert!(!slot.initialized);
    }
}
