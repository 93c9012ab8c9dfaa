//! Live-task registry: slot arena, per-task bookkeeping and the collection sweep.
//!
//! The registry never calls into task code. Callers borrow it briefly, copy out
//! what they need (an `Rc` to the task, a snapshot of ids) and release the borrow
//! before running a step, a hook, or a destructor.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use slab::Slab;

use super::{Task, TaskId};

/// Shared pointer to a type-erased task.
pub(crate) type TaskCell = Rc<RefCell<dyn Task>>;

/// Scheduler-owned bookkeeping for one task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    /// Depth of this task's step or hook executions on the stack.
    pub running: u32,
    /// Number of owning handles.
    pub ref_count: u32,
    /// Deferred-deletion flag.
    pub deleting: bool,
    /// Explicit suspension.
    pub suspended: bool,
    /// Suspension propagated from an owner.
    pub suspended_slave: bool,
}

impl TaskState {
    /// Suspended by either flag.
    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        self.suspended || self.suspended_slave
    }

    /// Eligible for a step during a registry walk.
    #[must_use]
    pub const fn is_schedulable(&self) -> bool {
        !self.is_suspended() && self.running == 0
    }

    /// Storage may be reclaimed.
    #[must_use]
    pub const fn is_collectable(&self) -> bool {
        self.ref_count == 0 && self.deleting && self.running == 0
    }
}

pub(crate) struct Slot {
    pub(crate) id: TaskId,
    pub(crate) kind: &'static str,
    pub(crate) state: TaskState,
    pub(crate) task: TaskCell,
}

#[derive(Default)]
pub(crate) struct Registry {
    slots: Slab<Slot>,
    /// Walk order (registration order).
    chain: Vec<TaskId>,
    next_serial: u64,
}

impl Registry {
    pub(crate) fn insert(&mut self, task: TaskCell, kind: &'static str) -> TaskId {
        self.next_serial += 1;
        let entry = self.slots.vacant_entry();
        let id = TaskId {
            slot: entry.key(),
            serial: self.next_serial,
        };
        entry.insert(Slot {
            id,
            kind,
            state: TaskState::default(),
            task,
        });
        self.chain.push(id);
        id
    }

    pub(crate) fn get(&self, id: TaskId) -> Option<&Slot> {
        self.slots.get(id.slot).filter(|slot| slot.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: TaskId) -> Option<&mut Slot> {
        self.slots.get_mut(id.slot).filter(|slot| slot.id == id)
    }

    pub(crate) fn state(&self, id: TaskId) -> Option<TaskState> {
        self.get(id).map(|slot| slot.state)
    }

    pub(crate) fn state_mut(&mut self, id: TaskId) -> Option<&mut TaskState> {
        self.get_mut(id).map(|slot| &mut slot.state)
    }

    pub(crate) fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Copy of the walk order.
    pub(crate) fn snapshot(&self) -> Vec<TaskId> {
        self.chain.clone()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.chain.iter().filter_map(|id| self.get(*id))
    }

    /// Unlink every collectable task and hand the storage back to the caller.
    ///
    /// The caller drops the returned cells after releasing its borrow of the
    /// registry, since a task destructor may release handles of its own.
    pub(crate) fn sweep(&mut self) -> Vec<TaskCell> {
        let mut freed = Vec::new();
        let slots = &mut self.slots;
        self.chain.retain(|id| {
            let collectable = slots
                .get(id.slot)
                .is_some_and(|slot| slot.id == *id && slot.state.is_collectable());
            if collectable {
                freed.push(slots.remove(id.slot).task);
            }
            !collectable
        });
        freed
    }

    /// Mark every unreferenced task for deletion. Used at shutdown.
    pub(crate) fn condemn_unreferenced(&mut self) {
        for (_, slot) in &mut self.slots {
            if slot.state.ref_count == 0 {
                slot.state.deleting = true;
            }
        }
    }
}
