//=========================================================================
// Scene Objects
//=========================================================================
//
// The 2D and 3D object containers and the context view their components
// update through.
//
// An object is a transform plus a `ComponentSet`; all behavior lives in
// the components. The update and pre-render passes hand each component
// an `ObjectContext` exposing the frame data, the owner's transform, the
// sibling components, and the deferred operation queue.
//
// Borrow discipline: while a component's own lifecycle method runs, its
// slot in the set is vacated, so the component may freely receive a
// mutable view of the rest of the object. Looking up your own type from
// inside your own update therefore reads as None.
//
//=========================================================================

//=== External Crates =====================================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::component::ObjectComponent;
use super::component_set::ComponentSet;
use crate::core::frame::FrameContext;
use crate::core::input::CommandOutput;
use crate::core::scene::{SceneOp, SceneOps};

//=== ObjectId ============================================================

/// Scene-scoped object identifier, assigned when the object is added to
/// a scene. Stable for the object's lifetime; never reused within a
/// scene's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObjectId(pub u64);

//=== Transforms ==========================================================

/// Planar transform for 2D objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub position: [f32; 2],
    pub rotation: f32,
    pub scale: [f32; 2],
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            rotation: 0.0,
            scale: [1.0, 1.0],
        }
    }
}

/// Spatial transform for 3D objects. Rotation is Euler angles in
/// radians, applied Z then X then Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

//=== Object Data =========================================================

/// The component-visible state of a 2D object.
#[derive(Debug, Clone, Default)]
pub struct Object2DData {
    pub id: ObjectId,
    pub name: String,
    pub transform: Transform2D,
    pub visible: bool,
}

/// The component-visible state of a 3D object.
#[derive(Debug, Clone, Default)]
pub struct Object3DData {
    pub id: ObjectId,
    pub name: String,
    pub transform: Transform3D,
    pub visible: bool,
}

//=== ObjectContext =======================================================

enum OwnerData<'a> {
    TwoD(&'a mut Object2DData),
    ThreeD(&'a mut Object3DData),
}

/// Per-component view of the owning object during an update pass.
///
/// Grants a component mutable access to its owner's transform and
/// siblings, read access to the frame, and the ability to queue deferred
/// scene operations.
pub struct ObjectContext<'a, 'f> {
    frame: &'a FrameContext<'f>,
    ops: &'a mut SceneOps,
    owner: OwnerData<'a>,
    components: &'a mut ComponentSet,
}

impl<'a, 'f> ObjectContext<'a, 'f> {
    //--- Frame access ----------------------------------------------------

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

    //--- Owner access ----------------------------------------------------

    /// The owning 2D object's state.
    ///
    /// # Panics
    /// Panics if the component is attached to a 3D object. A component
    /// that must work on both kinds should branch on
    /// [`is_owner_2d`](Self::is_owner_2d) instead.
    pub fn owner_2d(&mut self) -> &mut Object2DData {
        match &mut self.owner {
            OwnerData::TwoD(data) => data,
            OwnerData::ThreeD(data) => {
                panic!("owner_2d() called on 3D object '{}'", data.name)
            }
        }
    }

    /// The owning 3D object's state.
    ///
    /// # Panics
    /// Panics if the component is attached to a 2D object.
    pub fn owner_3d(&mut self) -> &mut Object3DData {
        match &mut self.owner {
            OwnerData::ThreeD(data) => data,
            OwnerData::TwoD(data) => {
                panic!("owner_3d() called on 2D object '{}'", data.name)
            }
        }
    }

    /// True if the owner is a 2D object.
    pub fn is_owner_2d(&self) -> bool {
        matches!(self.owner, OwnerData::TwoD(_))
    }

    /// The owner's id.
    pub fn owner_id(&self) -> ObjectId {
        match &self.owner {
            OwnerData::TwoD(data) => data.id,
            OwnerData::ThreeD(data) => data.id,
        }
    }

    //--- Sibling access --------------------------------------------------

    /// Typed lookup of a sibling component. Returns None for the caller's
    /// own type (its slot is vacated while its method runs).
    pub fn get<C: ObjectComponent>(&self) -> Option<&C> {
        self.components.get::<C>()
    }

    /// Mutable sibling lookup. Same self-vacancy rule as
    /// [`get`](Self::get).
    pub fn get_mut<C: ObjectComponent>(&mut self) -> Option<&mut C> {
        self.components.get_mut::<C>()
    }

    //--- Deferred operations ---------------------------------------------

    /// Queues the owning object for removal at the end-of-frame flush.
    /// The owner stays fully live for the rest of the frame.
    pub fn remove_self(&mut self) {
        let op = match &self.owner {
            OwnerData::TwoD(data) => SceneOp::RemoveObject2D(data.id),
            OwnerData::ThreeD(data) => SceneOp::RemoveObject3D(data.id),
        };
        self.ops.push(op);
    }

    /// Requests a transition to the named scene at the next tick
    /// boundary.
    pub fn change_scene(&mut self, name: &str) {
        self.ops.push(SceneOp::ChangeScene(name.to_owned()));
    }
}

//=== Pass Plumbing =======================================================

/// Which lifecycle method a pass invokes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    Update,
    PreRender,
}

// Shared pass driver for both object kinds. Vacates each slot in turn,
// builds the context over the remainder of the object, runs the
// component, restores the slot.
macro_rules! run_pass {
    ($obj:expr, $frame:expr, $ops:expr, $pass:expr, $owner_variant:ident) => {{
        for idx in $obj.components.occupied_indices() {
            let Some(mut slot) = $obj.components.take_at(idx) else {
                continue;
            };
            if !slot.initialized {
                // Lazy init: first update pass after attach. Components
                // attached during pre_render wait for the next frame.
                if $pass == Pass::Update {
                    debug!("Initializing component '{}'", slot.component.type_name());
                    slot.component.initialize();
                    slot.initialized = true;
                } else {
                    $obj.components.restore_at(idx, slot);
                    continue;
                }
            }
            {
                let mut ctx = ObjectContext {
                    frame: $frame,
                    ops: $ops,
                    owner: OwnerData::$owner_variant(&mut $obj.data),
                    components: &mut $obj.components,
                };
                match $pass {
                    Pass::Update => slot.component.update(&mut ctx),
                    Pass::PreRender => slot.component.pre_render(&mut ctx),
                }
            }
            $obj.components.restore_at(idx, slot);
        }
    }};
}

//=== Object2D ============================================================

/// A 2D scene object: transform state plus attached components.
#[derive(Default)]
pub struct Object2D {
    pub data: Object2DData,
    components: ComponentSet,
}

impl Object2D {
    /// Creates a visible object with the given name at the origin.
    pub fn new(name: &str) -> Self {
        Self {
            data: Object2DData {
                name: name.to_owned(),
                visible: true,
                ..Object2DData::default()
            },
            components: ComponentSet::new(),
        }
    }

    /// Attaches a component. Returns false if one of the same concrete
    /// type is already attached.
    pub fn add_component<C: ObjectComponent>(&mut self, component: C) -> bool {
        self.components.add(component)
    }

    /// Typed component lookup.
    pub fn component<C: ObjectComponent>(&self) -> Option<&C> {
        self.components.get::<C>()
    }

    /// Mutable typed component lookup.
    pub fn component_mut<C: ObjectComponent>(&mut self) -> Option<&mut C> {
        self.components.get_mut::<C>()
    }

    /// Deep copy: independent transform state and component clones. The
    /// copy's components are uninitialized; its id is reassigned when it
    /// is added to a scene.
    pub fn instantiate(&self) -> Object2D {
        Object2D {
            data: Object2DData {
                id: ObjectId::default(),
                ..self.data.clone()
            },
            components: self.components.clone_set(),
        }
    }

    pub(crate) fn run_pass(&mut self, frame: &FrameContext<'_>, ops: &mut SceneOps, pass: Pass) {
        run_pass!(self, frame, ops, pass, TwoD);
    }

    pub(crate) fn shutdown(&mut self) {
        debug!("Shutting down object '{}'", self.data.name);
        self.components.shutdown_all();
    }
}

//=== Object3D ============================================================

/// A 3D scene object: transform state plus attached components.
#[derive(Default)]
pub struct Object3D {
    pub data: Object3DData,
    components: ComponentSet,
}

impl Object3D {
    /// Creates a visible object with the given name at the origin.
    pub fn new(name: &str) -> Self {
        Self {
            data: Object3DData {
                name: name.to_owned(),
                visible: true,
                ..Object3DData::default()
            },
            components: ComponentSet::new(),
        }
    }

    /// Attaches a component. Returns false if one of the same concrete
    /// type is already attached.
    pub fn add_component<C: ObjectComponent>(&mut self, component: C) -> bool {
        self.components.add(component)
    }

    /// Typed component lookup.
    pub fn component<C: ObjectComponent>(&self) -> Option<&C> {
        self.components.get::<C>()
    }

    /// Mutable typed component lookup.
    pub fn component_mut<C: ObjectComponent>(&mut self) -> Option<&mut C> {
        self.components.get_mut::<C>()
    }

    /// Deep copy: independent transform state and component clones. The
    /// copy's components are uninitialized; its id is reassigned when it
    /// is added to a scene.
    pub fn instantiate(&self) -> Object3D {
        Object3D {
            data: Object3DData {
                id: ObjectId::default(),
                ..self.data.clone()
            },
            components: self.components.clone_set(),
        }
    }

    pub(crate) fn run_pass(&mut self, frame: &FrameContext<'_>, ops: &mut SceneOps, pass: Pass) {
        run_pass!(self, frame, ops, pass, ThreeD);
    }

    pub(crate) fn shutdown(&mut self) {
        debug!("Shutting down object '{}'", self.data.name);
        self.components.shutdown_all();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
