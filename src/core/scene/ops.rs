//=========================================================================
// Deferred Scene Operations
//=========================================================================
//
// Queue for structural mutations requested mid-frame.
//
// Components and delegates queue operations here during update passes;
// the scene context applies them at the end-of-frame flush point. This
// keeps the object lists stable while they are being iterated — an
// object may request its own removal from inside its own update.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::object::ObjectId;

//=== SceneOp =============================================================

/// One deferred structural mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneOp {
    /// Remove a 2D object (and shut down its components).
    RemoveObject2D(ObjectId),

    /// Remove a 3D object (and shut down its components).
    RemoveObject3D(ObjectId),

    /// Transition to the named scene at the next tick boundary.
    ChangeScene(String),
}

//=== SceneOps ============================================================

/// Queue of deferred operations, flushed once per frame.
#[derive(Debug, Default)]
pub struct SceneOps {
    queue: Vec<SceneOp>,
}

impl SceneOps {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues an operation for the end-of-frame flush.
    pub fn push(&mut self, op: SceneOp) {
        self.queue.push(op);
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all queued operations, leaving the queue empty.
    pub fn take(&mut self) -> Vec<SceneOp> {
        std::mem::take(&mut self.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_empties_the_queue_in_order() {
        let mut ops = SceneOps::new();
        ops.push(SceneOp::RemoveObject2D(ObjectId(1)));
        ops.push(SceneOp::ChangeScene("Title".to_owned()));
        assert_eq!(ops.len(), 2);

        let taken = ops.take();
        assert_eq!(taken[0], SceneOp::RemoveObject2D(ObjectId(1)));
        assert_eq!(taken[1], SceneOp::ChangeScene("Title".to_owned()));
        assert!(ops.is_empty());
    }
}
