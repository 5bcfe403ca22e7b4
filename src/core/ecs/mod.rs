//=========================================================================
// Entity Store
//
// Flat entity/component table for bulk data, independent of the scene
// object system.
//
// Layout: one densely packed column per component type, with a sparse
// entity→dense index per column so lookup, insert, and removal are all
// O(1). Removal swap-fills from the back of the dense array, so dense
// iteration order is unspecified. Entity ids come from a LIFO free list:
// the most recently destroyed id is the next one handed out.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use crate::core::type_index::type_index;

//=== Entity ==============================================================

/// Entity id. Valid while the entity is alive; after destruction the id
/// is recycled for a future `create`.
pub type Entity = usize;

const NO_SLOT: usize = usize::MAX;

//=== ComponentColumn =====================================================

/// Dense storage for one component type.
struct ComponentColumn<T> {
    data: Vec<T>,
    entities: Vec<Entity>,
    sparse: Vec<usize>,
}

impl<T> ComponentColumn<T> {
    fn new() -> Self {
        Self {
            data: Vec::new(),
            entities: Vec::new(),
            sparse: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn dense_index(&self, entity: Entity) -> Option<usize> {
        match self.sparse.get(entity) {
            Some(&idx) if idx != NO_SLOT => Some(idx),
            _ => None,
        }
    }

    fn get(&self, entity: Entity) -> Option<&T> {
        self.dense_index(entity).map(|idx| &self.data[idx])
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.dense_index(entity).map(|idx| &mut self.data[idx])
    }

    /// Inserts or overwrites in place. Returns true if the entity did
    /// not already have this component.
    fn insert(&mut self, entity: Entity, value: T) -> bool {
        if let Some(idx) = self.dense_index(entity) {
            self.data[idx] = value;
            return false;
        }
        if entity >= self.sparse.len() {
            self.sparse.resize(entity + 1, NO_SLOT);
        }
        self.sparse[entity] = self.data.len();
        self.data.push(value);
        self.entities.push(entity);
        true
    }

    /// Swap-removes: the last dense element fills the vacated slot.
    fn remove(&mut self, entity: Entity) -> Option<T> {
        let idx = self.dense_index(entity)?;
        let last = self.data.len() - 1;
        self.data.swap(idx, last);
        self.entities.swap(idx, last);
        let value = self.data.pop();
        self.entities.pop();
        self.sparse[entity] = NO_SLOT;
        if idx != last {
            let moved = self.entities[idx];
            self.sparse[moved] = idx;
        }
        value
    }

    fn clear(&mut self) {
        self.data.clear();
        self.entities.clear();
        self.sparse.clear();
    }
}

//=== Column Erasure ======================================================

trait AnyColumn {
    fn remove_entity(&mut self, entity: Entity);
    fn clear(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> AnyColumn for ComponentColumn<T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.remove(entity);
    }
    fn clear(&mut self) {
        self.clear();
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== EntityStore =========================================================

/// The entity/component table.
#[derive(Default)]
pub struct EntityStore {
    alive: Vec<bool>,
    free: Vec<Entity>,
    columns: Vec<Option<Box<dyn AnyColumn>>>,
}

impl EntityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Entities --------------------------------------------------------

    /// Allocates an entity, preferring the most recently freed id.
    pub fn create(&mut self) -> Entity {
        if let Some(entity) = self.free.pop() {
            self.alive[entity] = true;
            entity
        } else {
            self.alive.push(true);
            self.alive.len() - 1
        }
    }

    /// Destroys an entity, dropping all of its components and recycling
    /// its id. Destroying a dead entity is a no-op.
    pub fn destroy(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            return;
        }
        for column in self.columns.iter_mut().flatten() {
            column.remove_entity(entity);
        }
        self.alive[entity] = false;
        self.free.push(entity);
    }

    /// True if the id refers to a live entity.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity).copied().unwrap_or(false)
    }

    /// Number of live entities.
    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Destroys everything: all entities, all components. Column type
    /// registrations survive, empty.
    pub fn clear_all(&mut self) {
        for column in self.columns.iter_mut().flatten() {
            column.clear();
        }
        self.alive.clear();
        self.free.clear();
    }

    //--- Components ------------------------------------------------------

    /// Attaches (or overwrites in place) a component on a live entity.
    /// Returns false when the entity is dead, or when the component was
    /// already present and got overwritten.
    pub fn insert<T: 'static>(&mut self, entity: Entity, value: T) -> bool {
        if !self.is_alive(entity) {
            debug_assert!(false, "insert on dead entity {entity}");
            return false;
        }
        self.column_mut_or_create::<T>().insert(entity, value)
    }

    /// Detaches and returns a component.
    pub fn remove<T: 'static>(&mut self, entity: Entity) -> Option<T> {
        self.column_mut::<T>()?.remove(entity)
    }

    /// Shared component access.
    pub fn get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        self.column::<T>()?.get(entity)
    }

    /// Mutable component access.
    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        self.column_mut::<T>()?.get_mut(entity)
    }

    /// True if the entity carries a `T`.
    pub fn has<T: 'static>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Number of entities carrying a `T`.
    pub fn count<T: 'static>(&self) -> usize {
        self.column::<T>().map_or(0, |c| c.len())
    }

    //--- Column plumbing -------------------------------------------------

    fn column<T: 'static>(&self) -> Option<&ComponentColumn<T>> {
        let idx = type_index::<T>();
        self.columns
            .get(idx)?
            .as_ref()?
            .as_any()
            .downcast_ref::<ComponentColumn<T>>()
    }

    fn column_mut<T: 'static>(&mut self) -> Option<&mut ComponentColumn<T>> {
        let idx = type_index::<T>();
        self.columns
            .get_mut(idx)?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<ComponentColumn<T>>()
    }

    fn column_mut_or_create<T: 'static>(&mut self) -> &mut ComponentColumn<T> {
        let idx = type_index::<T>();
        if idx >= self.columns.len() {
            self.columns.resize_with(idx + 1, || None);
        }
        if self.columns[idx].is_none() {
            self.columns[idx] = Some(Box::new(ComponentColumn::<T>::new()));
        }
        self.columns[idx]
            .as_mut()
            .unwrap()
            .as_any_mut()
            .downcast_mut::<ComponentColumn<T>>()
            .expect("column type index collision")
    }

    //--- Queries ---------------------------------------------------------

    /// Iterates every entity carrying a `T`, in dense (unspecified)
    /// order.
    pub fn query1<A: 'static>(&self) -> impl Iterator<Item = (Entity, &A)> + '_ {
        let column = self.column::<A>();
        let dense: &[Entity] = column.map_or(&[], |c| c.entities.as_slice());
        dense
            .iter()
            .filter_map(move |&e| Some((e, column?.get(e)?)))
    }

    /// Mutable single-column iteration.
    pub fn query1_mut<A: 'static>(&mut self) -> impl Iterator<Item = (Entity, &mut A)> + '_ {
        match self.column_mut::<A>() {
            Some(column) => {
                let entities = &column.entities;
                let data = &mut column.data;
                Some(entities.iter().copied().zip(data.iter_mut()))
            }
            None => None,
        }
        .into_iter()
        .flatten()
    }

    /// Iterates entities carrying both `A` and `B`, driven by whichever
    /// column is smaller.
    pub fn query2<A: 'static, B: 'static>(
        &self,
    ) -> impl Iterator<Item = (Entity, &A, &B)> + '_ {
        let ca = self.column::<A>();
        let cb = self.column::<B>();
        let driver: &[Entity] = match (ca, cb) {
            (Some(a), Some(b)) => {
                if a.len() <= b.len() {
                    &a.entities
                } else {
                    &b.entities
                }
            }
            _ => &[],
        };
        driver
            .iter()
            .filter_map(move |&e| Some((e, ca?.get(e)?, cb?.get(e)?)))
    }

    /// Three-way intersection, driven by the smallest column.
    pub fn query3<A: 'static, B: 'static, C: 'static>(
        &self,
    ) -> impl Iterator<Item = (Entity, &A, &B, &C)> + '_ {
        let ca = self.column::<A>();
        let cb = self.column::<B>();
        let cc = self.column::<C>();
        let driver: &[Entity] = match (ca, cb, cc) {
            (Some(a), Some(b), Some(c)) => {
                let mut dense: &[Entity] = &a.entities;
                if b.len() < dense.len() {
                    dense = &b.entities;
                }
                if c.len() < dense.len() {
                    dense = &c.entities;
                }
                dense
            }
            _ => &[],
        };
        driver
            .iter()
            .filter_map(move |&e| Some((e, ca?.get(e)?, cb?.get(e)?, cc?.get(e)?)))
    }

    /// Four-way intersection, driven by the smallest column.
    pub fn query4<A: 'static, B: 'static, C: 'static, D: 'static>(
        &self,
    ) -> impl Iterator<Item = (Entity, &A, &B, &C, &D)> + '_ {
        let ca = self.column::<A>();
        let cb = self.column::<B>();
        let cc = self.column::<C>();
        let cd = self.column::<D>();
        let driver: &[Entity] = match (ca, cb, cc, cd) {
            (Some(a), Some(b), Some(c), Some(d)) => {
                let mut dense: &[Entity] = &a.entities;
                if b.len() < dense.len() {
                    dense = &b.entities;
                }
                if c.len() < dense.len() {
                    dense = &c.entities;
                }
                if d.len() < dense.len() {
                    dense = &d.entities;
                }
                dense
            }
            _ => &[],
        };
        driver
            .iter()
            .filter_map(move |&e| Some((e, ca?.get(e)?, cb?.get(e)?, cc?.get(e)?, cd?.get(e)?)))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Components -------------------------------------------------

    #[derive(Debug, PartialEq)]
    struct Position(f32, f32);

    #[derive(Debug, PartialEq)]
    struct Velocity(f32, f32);

    #[derive(Debug, PartialEq)]
    struct Tag(&'static str);

    #[derive(Debug, PartialEq)]
    struct Flag;

    //--- Tests -----------------------------------------------------------

    #[test]
    fn destroyed_ids_are_reused_lifo() {
        let mut store = EntityStore::new();
        let a = store.create();
        let b = store.create();
        let c = store.create();

        store.destroy(a);
        store.destroy(c);

        // Most recently freed comes back first.
        assert_eq!(store.create(), c);
        assert_eq!(store.create(), a);
        assert!(store.is_alive(b));
        assert_eq!(store.alive_count(), 3);
    }

    #[test]
    fn insert_get_remove_round_trip() {
        let mut store = EntityStore::new();
        let e = store.create();

        assert!(store.insert(e, Position(1.0, 2.0)));
        assert_eq!(store.get::<Position>(e), Some(&Position(1.0, 2.0)));
        assert!(store.has::<Position>(e));

        store.get_mut::<Position>(e).unwrap().0 = 5.0;
        assert_eq!(store.remove::<Position>(e), Some(Position(5.0, 2.0)));
        assert!(!store.has::<Position>(e));
    }

    #[test]
    fn repeated_insert_overwrites_in_place() {
        let mut store = EntityStore::new();
        let e = store.create();

        assert!(store.insert(e, Tag("old")));
        assert!(!store.insert(e, Tag("new")));
        assert_eq!(store.get::<Tag>(e), Some(&Tag("new")));
        assert_eq!(store.count::<Tag>(), 1);
    }

    #[test]
    fn swap_removal_keeps_survivors_reachable() {
        let mut store = EntityStore::new();
        let ids: Vec<Entity> = (0..5).map(|_| store.create()).collect();
        for (i, &e) in ids.iter().enumerate() {
            store.insert(e, Position(i as f32, 0.0));
        }

        // Remove from the middle; the last dense element fills the hole.
        store.remove::<Position>(ids[1]);
        store.remove::<Position>(ids[3]);

        assert_eq!(store.count::<Position>(), 3);
        assert_eq!(store.get::<Position>(ids[0]), Some(&Position(0.0, 0.0)));
        assert_eq!(store.get::<Position>(ids[2]), Some(&Position(2.0, 0.0)));
        assert_eq!(store.get::<Position>(ids[4]), Some(&Position(4.0, 0.0)));
        assert_eq!(store.get::<Position>(ids[1]), None);
    }

    #[test]
    fn destroy_strips_all_components() {
        let mut store = EntityStore::new();
        let e = store.create();
        store.insert(e, Position(0.0, 0.0));
        store.insert(e, Velocity(1.0, 1.0));

        store.destroy(e);
        assert!(!store.is_alive(e));
        assert_eq!(store.count::<Position>(), 0);
        assert_eq!(store.count::<Velocity>(), 0);

        // Recycled id starts with no components.
        let e2 = store.create();
        assert_eq!(e2, e);
        assert!(!store.has::<Position>(e2));
    }

    #[test]
    fn query2_yields_the_intersection() {
        let mut store = EntityStore::new();
        let moving = store.create();
        let still = store.create();
        let ghost = store.create();

        store.insert(moving, Position(0.0, 0.0));
        store.insert(moving, Velocity(1.0, 0.0));
        store.insert(still, Position(9.0, 9.0));
        store.insert(ghost, Velocity(2.0, 2.0));

        let hits: Vec<_> = store.query2::<Position, Velocity>().collect();
        assert_eq!(hits.len(), 1);
        let (e, pos, vel) = hits[0];
        assert_eq!(e, moving);
        assert_eq!(pos, &Position(0.0, 0.0));
        assert_eq!(vel, &Velocity(1.0, 0.0));
    }

    #[test]
    fn query_on_missing_column_is_empty() {
        let mut store = EntityStore::new();
        let e = store.create();
        store.insert(e, Position(0.0, 0.0));

        assert_eq!(store.query2::<Position, Velocity>().count(), 0);
        assert_eq!(store.query1::<Velocity>().count(), 0);
    }

    #[test]
    fn query1_mut_updates_every_holder() {
        let mut store = EntityStore::new();
        for i in 0..3 {
            let e = store.create();
            store.insert(e, Position(i as f32, 0.0));
        }
        for (_, pos) in store.query1_mut::<Position>() {
            pos.1 += 10.0;
        }
        for (_, pos) in store.query1::<Position>() {
            assert_eq!(pos.1, 10.0);
        }
    }

    #[test]
    fn query3_and_query4_intersect() {
        let mut store = EntityStore::new();
        let full = store.create();
        let partial = store.create();

        store.insert(full, Position(0.0, 0.0));
        store.insert(full, Velocity(1.0, 1.0));
        store.insert(full, Tag("full"));
        store.insert(full, Flag);
        store.insert(partial, Position(5.0, 5.0));
        store.insert(partial, Velocity(0.0, 0.0));

        let three: Vec<_> = store.query3::<Position, Velocity, Tag>().collect();
        assert_eq!(three.len(), 1);
        assert_eq!(three[0].0, full);

        let four: Vec<_> = store.query4::<Position, Velocity, Tag, Flag>().collect();
        assert_eq!(four.len(), 1);
        assert_eq!(four[0].3, &Tag("full"));
    }

    #[test]
    fn clear_all_resets_entities_and_columns() {
        let mut store = EntityStore::new();
        let e = store.create();
        store.insert(e, Position(1.0, 1.0));

        store.clear_all();
        assert_eq!(store.alive_count(), 0);
        assert!(!store.is_alive(e));
        assert_eq!(store.count::<Position>(), 0);

        // Ids restart from zero after a full clear.
        assert_eq!(store.create(), 0);
    }
}
