//=========================================================================
// Scene Context
//=========================================================================
//
// The live state of one scene: its scene components, its 2D and 3D
// object lists, and the deferred operation queue.
//
// Frame order within a scene:
//   1. Scene component pass, ascending priority (ties keep registration
//      order)
//   2. Object update pass (2D then 3D, registration order)
//   3. Object pre-render pass (same order)
//   4. Deferred operation flush (removals applied, transition latched)
//
// Object lists never change length while a pass is iterating them —
// removals queue through `SceneOps` and apply at the flush.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::ops::{Deref, DerefMut};

//=== External Crates =====================================================

use ahash::AHashMap;
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::component::SceneComponent;
use super::ops::{SceneOp, SceneOps};
use crate::core::frame::FrameContext;
use crate::core::input::CommandOutput;
use crate::core::object::object::Pass;
use crate::core::object::{Object2D, Object3D, ObjectId};
use crate::core::type_index::type_index;

//=== SceneSlot ===========================================================

struct SceneSlot {
    type_idx: usize,
    initialized: bool,
    component: Box<dyn SceneComponent>,
}

//=== SceneContext ========================================================

/// Mutable state of one scene.
pub struct SceneContext {
    name: String,
    entries: Vec<Option<SceneSlot>>,
    // Live instances per type index. Kept separately from `entries`
    // because a slot is vacated while its component updates, and a
    // vacated instance still counts against the per-scene cap.
    component_counts: AHashMap<usize, usize>,
    objects_2d: Vec<Object2D>,
    objects_3d: Vec<Object3D>,
    next_object_id: u64,
    ops: SceneOps,
}

impl SceneContext {
    /// Creates an empty scene with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            entries: Vec::new(),
            component_counts: AHashMap::new(),
            objects_2d: Vec::new(),
            objects_3d: Vec::new(),
            next_object_id: 1,
            ops: SceneOps::new(),
        }
    }

    /// The scene's registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    //--- Scene components ------------------------------------------------

    /// Registers a scene component. Returns false (and leaves the scene
    /// unchanged) when the type's per-scene cap is already reached.
    pub fn add_component<C: SceneComponent>(&mut self, component: C) -> bool {
        let type_idx = type_index::<C>();
        let cap = component.max_per_scene();
        let live = self.component_counts.get(&type_idx).copied().unwrap_or(0);
        if live >= cap {
            warn!(
                "Scene '{}': cap of {} reached for component '{}', rejecting",
                self.name,
                cap,
                component.type_name()
            );
            return false;
        }
        *self.component_counts.entry(type_idx).or_insert(0) += 1;
        self.entries.push(Some(SceneSlot {
            type_idx,
            initialized: false,
            component: Box::new(component),
        }));
        true
    }

    /// First registered scene component of type `C`, if any.
    pub fn component<C: SceneComponent>(&self) -> Option<&C> {
        self.entries
            .iter()
            .flatten()
            .find_map(|slot| slot.component.as_any().downcast_ref::<C>())
    }

    /// Mutable variant of [`component`](Self::component).
    pub fn component_mut<C: SceneComponent>(&mut self) -> Option<&mut C> {
        self.entries
            .iter_mut()
            .flatten()
            .find_map(|slot| slot.component.as_any_mut().downcast_mut::<C>())
    }

    /// Number of registered scene components of type `C`. Counts an
    /// instance even while its own update is running.
    pub fn component_count<C: SceneComponent>(&self) -> usize {
        let type_idx = type_index::<C>();
        self.component_counts.get(&type_idx).copied().unwrap_or(0)
    }

    //--- Objects ---------------------------------------------------------

    /// Adds a 2D object, assigning it a fresh id.
    pub fn add_object_2d(&mut self, mut object: Object2D) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        object.data.id = id;
        debug!("Scene '{}': added 2D object '{}'", self.name, object.data.name);
        self.objects_2d.push(object);
        id
    }

    /// Adds a 3D object, assigning it a fresh id.
    pub fn add_object_3d(&mut self, mut object: Object3D) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        object.data.id = id;
        debug!("Scene '{}': added 3D object '{}'", self.name, object.data.name);
        self.objects_3d.push(object);
        id
    }

    /// Looks up a live 2D object by id.
    pub fn object_2d(&self, id: ObjectId) -> Option<&Object2D> {
        self.objects_2d.iter().find(|o| o.data.id == id)
    }

    /// Mutable variant of [`object_2d`](Self::object_2d).
    pub fn object_2d_mut(&mut self, id: ObjectId) -> Option<&mut Object2D> {
        self.objects_2d.iter_mut().find(|o| o.data.id == id)
    }

    /// Looks up a live 3D object by id.
    pub fn object_3d(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects_3d.iter().find(|o| o.data.id == id)
    }

    /// Mutable variant of [`object_3d`](Self::object_3d).
    pub fn object_3d_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects_3d.iter_mut().find(|o| o.data.id == id)
    }

    /// First live 2D object with the given name.
    pub fn object_2d_named(&mut self, name: &str) -> Option<&mut Object2D> {
        self.objects_2d.iter_mut().find(|o| o.data.name == name)
    }

    /// First live 3D object with the given name.
    pub fn object_3d_named(&mut self, name: &str) -> Option<&mut Object3D> {
        self.objects_3d.iter_mut().find(|o| o.data.name == name)
    }

    /// Count of live 2D objects.
    pub fn object_2d_count(&self) -> usize {
        self.objects_2d.len()
    }

    /// Count of live 3D objects.
    pub fn object_3d_count(&self) -> usize {
        self.objects_3d.len()
    }

    //--- Deferred operations ---------------------------------------------

    /// Queues removal of a 2D object for the end-of-frame flush. The
    /// object stays fully live until then. Idempotent per frame.
    pub fn remove_object_2d(&mut self, id: ObjectId) {
        self.ops.push(SceneOp::RemoveObject2D(id));
    }

    /// Queues removal of a 3D object for the end-of-frame flush.
    pub fn remove_object_3d(&mut self, id: ObjectId) {
        self.ops.push(SceneOp::RemoveObject3D(id));
    }

    /// Requests a transition to the named scene at the next tick
    /// boundary. The last request of a frame wins.
    pub fn change_scene(&mut self, name: &str) {
        self.ops.push(SceneOp::ChangeScene(name.to_owned()));
    }

    //--- Frame driving ---------------------------------------------------

    /// Runs the scene component pass and both object passes. Called once
    /// per tick by the scene manager; the flush is separate so the
    /// delegate's update can still queue operations.
    pub(crate) fn update(&mut self, frame: &FrameContext<'_>) {
        self.run_scene_component_pass(frame);
        for i in 0..self.objects_2d.len() {
            self.objects_2d[i].run_pass(frame, &mut self.ops, Pass::Update);
        }
        for i in 0..self.objects_3d.len() {
            self.objects_3d[i].run_pass(frame, &mut self.ops, Pass::Update);
        }
        for i in 0..self.objects_2d.len() {
            self.objects_2d[i].run_pass(frame, &mut self.ops, Pass::PreRender);
        }
        for i in 0..self.objects_3d.len() {
            self.objects_3d[i].run_pass(frame, &mut self.ops, Pass::PreRender);
        }
    }

    fn run_scene_component_pass(&mut self, frame: &FrameContext<'_>) {
        // Priority is re-read each frame; sort_by_key is stable, so equal
        // priorities keep registration order.
        let mut order: Vec<(usize, i32)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                slot.as_ref().map(|s| (i, s.component.update_priority()))
            })
            .collect();
        order.sort_by_key(|&(_, priority)| priority);

        for (idx, _) in order {
            let Some(mut slot) = self.entries[idx].take() else {
                continue;
            };
            if !slot.initialized {
                debug!(
                    "Scene '{}': initializing component '{}'",
                    self.name,
                    slot.component.type_name()
                );
                slot.component.initialize();
                slot.initialized = true;
            }
            {
                let mut view = SceneView { frame, scene: self };
                slot.component.update(&mut view);
            }
            self.entries[idx] = Some(slot);
        }
    }

    /// Applies every deferred operation queued this frame. Removed
    /// objects are shut down; the latest scene change request, if any, is
    /// returned for the manager to latch.
    pub(crate) fn flush_ops(&mut self) -> Option<String> {
        let mut transition = None;
        for op in self.ops.take() {
            match op {
                SceneOp::RemoveObject2D(id) => {
                    if let Some(pos) = self.objects_2d.iter().position(|o| o.data.id == id) {
                        self.objects_2d[pos].shutdown();
                        self.objects_2d.remove(pos);
                    }
                }
                SceneOp::RemoveObject3D(id) => {
                    if let Some(pos) = self.objects_3d.iter().position(|o| o.data.id == id) {
                        self.objects_3d[pos].shutdown();
                        self.objects_3d.remove(pos);
                    }
                }
                SceneOp::ChangeScene(name) => {
                    transition = Some(name);
                }
            }
        }
        transition
    }

    /// Tears the scene down: shuts down every object's components,
    /// finalizes every initialized scene component, and clears all state
    /// so a re-entered scene starts fresh.
    pub(crate) fn finalize(&mut self) {
        debug!("Finalizing scene '{}'", self.name);
        for object in self.objects_2d.iter_mut() {
            object.shutdown();
        }
        self.objects_2d.clear();
        for object in self.objects_3d.iter_mut() {
            object.shutdown();
        }
        self.objects_3d.clear();
        for slot in self.entries.iter_mut().flatten() {
            if slot.initialized {
                slot.component.finalize();
            }
        }
        self.entries.clear();
        self.component_counts.clear();
        self.ops.take();
        self.next_object_id = 1;
    }
}

//=== SceneView ===========================================================

/// Scene access handed to scene components and delegates during update.
///
/// Derefs to [`SceneContext`], adding frame access on top. The calling
/// component's own slot is vacated for the duration, so looking up your
/// own type reads as None.
pub struct SceneView<'a, 'f> {
    frame: &'a FrameContext<'f>,
    scene: &'a mut SceneContext,
}

impl<'a, 'f> SceneView<'a, 'f> {
    pub(crate) fn new(frame: &'a FrameContext<'f>, scene: &'a mut SceneContext) -> Self {
        Self { frame, scene }
    }

    /// The frame this pass belongs to.
    pub fn frame(&self) -> &FrameContext<'f> {
        self.frame
    }

    /// Seconds elapsed since the previous tick.
    pub fn dt(&self) -> f32 {
        self.frame.dt
    }

    /// Evaluates a named input action against this frame's snapshot.
    pub fn command(&self, action: &str) -> CommandOutput {
        self.frame.command(action)
    }
}

impl Deref for SceneView<'_, '_> {
    type Target = SceneContext;

    fn deref(&self) -> &SceneContext {
        self.scene
    }
}

impl DerefMut for SceneView<'_, '_> {
    fn deref_mut(&mut self) -> &mut SceneContext {
        self.scene
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{DeviceState, InputCommand};
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Fixtures ---------------------------------------------------

    fn frame_fixture() -> (DeviceState, InputCommand) {
        let mut devices = DeviceState::new();
        devices.begin_frame();
        devices.end_frame();
        (devices, InputCommand::new())
    }

    /// Appends its tag to a shared trace when updated.
    struct TraceComponent {
        tag: &'static str,
        priority: i32,
        trace: Rc<RefCell<Vec<&'static str>>>,
    }

    impl SceneComponent for TraceComponent {
        fn type_name(&self) -> &'static str {
            "TraceComponent"
        }
        fn update_priority(&self) -> i32 {
            self.priority
        }
        fn set_update_priority(&mut self, priority: i32) {
            self.priority = priority;
        }
        fn update(&mut self, _scene: &mut SceneView) {
            self.trace.borrow_mut().push(self.tag);
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    /// A component capped at two instances per scene.
    struct CappedComponent;

    impl SceneComponent for CappedComponent {
        fn type_name(&self) -> &'static str {
            "CappedComponent"
        }
        fn max_per_scene(&self) -> usize {
            2
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
    fn scene_components_run_in_priority_order_with_stable_ties() {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let mut scene = SceneContext::new("Game");
        scene.add_component(TraceComponent {
            tag: "late",
            priority: 10,
            trace: Rc::clone(&trace),
        });
        scene.add_component(TraceComponent {
            tag: "first-tie",
            priority: 1,
            trace: Rc::clone(&trace),
        });
        scene.add_component(TraceComponent {
            tag: "second-tie",
            priority: 1,
            trace: Rc::clone(&trace),
        });

        let (devices, commands) = frame_fixture();
        let frame = FrameContext {
            dt: 1.0,
            devices: &devices,
            commands: &commands,
        };
        scene.update(&frame);

        assert_eq!(*trace.borrow(), vec!["first-tie", "second-tie", "late"]);
    }

    #[test]
    fn priority_change_reorders_the_next_frame() {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let mut scene = SceneContext::new("Game");
        scene.add_component(TraceComponent {
            tag: "a",
            priority: 1,
            trace: Rc::clone(&trace),
        });
        scene.add_component(TraceComponent {
            tag: "b",
            priority: 2,
            trace: Rc::clone(&trace),
        });

        let (devices, commands) = frame_fixture();
        let frame = FrameContext {
            dt: 1.0,
            devices: &devices,
            commands: &commands,
        };
        scene.update(&frame);
        assert_eq!(*trace.borrow(), vec!["a", "b"]);

        // Push "a" behind "b" and tick again.
        scene.component_mut::<TraceComponent>().unwrap().set_update_priority(5);
        trace.borrow_mut().clear();
        scene.update(&frame);
        assert_eq!(*trace.borrow(), vec!["b", "a"]);
    }

    #[test]
    fn per_scene_cap_rejects_the_overflowing_instance() {
        let mut scene = SceneContext::new("Game");
        assert!(scene.add_component(CappedComponent));
        assert!(scene.add_component(CappedComponent));
        assert!(!scene.add_component(CappedComponent));
        assert_eq!(scene.component_count::<CappedComponent>(), 2);
    }

    /// A singleton component that tries to register a second instance of
    /// its own type from inside its own update.
    struct SelfSpawner {
        accepted: Rc<RefCell<Vec<bool>>>,
    }

    impl SceneComponent for SelfSpawner {
        fn type_name(&self) -> &'static str {
            "SelfSpawner"
        }
        fn max_per_scene(&self) -> usize {
            1
        }
        fn update(&mut self, scene: &mut SceneView) {
            let ok = scene.add_component(SelfSpawner {
                accepted: Rc::clone(&self.accepted),
            });
            self.accepted.borrow_mut().push(ok);
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn cap_holds_while_a_component_registers_from_its_own_update() {
        let accepted = Rc::new(RefCell::new(Vec::new()));
        let mut scene = SceneContext::new("Game");
        assert!(scene.add_component(SelfSpawner {
            accepted: Rc::clone(&accepted),
        }));

        let (devices, commands) = frame_fixture();
        let frame = FrameContext {
            dt: 1.0,
            devices: &devices,
            commands: &commands,
        };
        scene.update(&frame);

        // The instance whose slot is vacated mid-update still counts
        // against its own cap.
        assert_eq!(*accepted.borrow(), vec![false]);
        assert_eq!(scene.component_count::<SelfSpawner>(), 1);
    }

    #[test]
    fn object_ids_are_unique_and_lookups_resolve() {
        let mut scene = SceneContext::new("Game");
        let a = scene.add_object_2d(Object2D::new("a"));
        let b = scene.add_object_2d(Object2D::new("b"));
        assert_ne!(a, b);

        assert_eq!(scene.object_2d(a).unwrap().data.name, "a");
        assert_eq!(scene.object_2d_named("b").unwrap().data.id, b);
        assert!(scene.object_2d(ObjectId(999)).is_none());
    }

    #[test]
    fn deferred_removal_applies_at_flush_and_preserves_order() {
        let mut scene = SceneContext::new("Game");
        let a = scene.add_object_2d(Object2D::new("a"));
        let _b = scene.add_object_2d(Object2D::new("b"));
        let c = scene.add_object_2d(Object2D::new("c"));

        scene.remove_object_2d(a);
        scene.remove_object_2d(a); // duplicate request is harmless
        assert_eq!(scene.object_2d_count(), 3, "removal must be deferred");

        assert_eq!(scene.flush_ops(), None);
        assert_eq!(scene.object_2d_count(), 2);
        assert!(scene.object_2d(a).is_none());
        // Survivors keep their relative order.
        assert_eq!(scene.objects_2d[0].data.name, "b");
        assert_eq!(scene.objects_2d[1].data.name, "c");
        assert!(scene.object_2d(c).is_some());
    }

    #[test]
    fn last_scene_change_request_wins() {
        let mut scene = SceneContext::new("Game");
        scene.change_scene("Title");
        scene.change_scene("Result");
        assert_eq!(scene.flush_ops(), Some("Result".to_owned()));
        assert_eq!(scene.flush_ops(), None);
    }

    #[test]
    fn finalize_clears_everything() {
        let mut scene = SceneContext::new("Game");
        scene.add_component(CappedComponent);
        scene.add_object_2d(Object2D::new("a"));
        scene.add_object_3d(crate::core::object::Object3D::new("b"));

        scene.finalize();
        assert_eq!(scene.component_count::<CappedComponent>(), 0);
        assert_eq!(scene.object_2d_count(), 0);
        assert_eq!(scene.object_3d_count(), 0);

        // Ids restart for the next run of the scene.
        let id = scene.add_object_2d(Object2D::new("fresh"));
        assert_eq!(id, ObjectId(1));
    }
}
