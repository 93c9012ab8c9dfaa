//! Reference-counted task handle.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use super::scheduler::Shared;
use super::{AsTaskId, Scheduler, Task, TaskId};

struct Bound<T: ?Sized> {
    sched: Weak<Shared>,
    id: TaskId,
    task: Rc<RefCell<T>>,
}

/// Owning handle to a registered task.
///
/// Creating a handle binds the task; dropping or reassigning it releases the
/// task, which then becomes eligible for collection once nothing else holds
/// it. Handles are deliberately not `Clone`: a second owner is made with
/// [`TaskRef::share`], which goes through [`Scheduler::bind`].
///
/// A handle does not keep the scheduler alive. Once the scheduler is gone the
/// handle still gives access to the task object, and dropping it is a no-op.
pub struct TaskRef<T: Task + ?Sized> {
    inner: Option<Bound<T>>,
}

impl<T: Task + ?Sized> TaskRef<T> {
    /// A handle that references nothing.
    #[must_use]
    pub const fn null() -> Self {
        Self { inner: None }
    }

    pub(crate) fn bound(sched: &Scheduler, id: TaskId, task: Rc<RefCell<T>>) -> Self {
        if sched.bind(id).is_none() {
            return Self::null();
        }
        Self {
            inner: Some(Bound {
                sched: sched.downgrade(),
                id,
                task,
            }),
        }
    }

    /// Identity of the referenced task.
    #[must_use]
    pub fn id(&self) -> Option<TaskId> {
        self.inner.as_ref().map(|bound| bound.id)
    }

    /// True for a handle that references nothing.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Shared access to the task object. `None` for a null handle or while the
    /// task is mutably borrowed (for instance, during its own step).
    #[must_use]
    pub fn get(&self) -> Option<Ref<'_, T>> {
        self.inner.as_ref()?.task.try_borrow().ok()
    }

    /// Exclusive access to the task object. `None` for a null handle or while
    /// the task is borrowed elsewhere.
    #[must_use]
    pub fn get_mut(&self) -> Option<RefMut<'_, T>> {
        self.inner.as_ref()?.task.try_borrow_mut().ok()
    }

    /// Bind a second owning handle to the same task.
    #[must_use]
    pub fn share(&self) -> Self {
        let Some(bound) = self.inner.as_ref() else {
            return Self::null();
        };
        let Some(shared) = bound.sched.upgrade() else {
            return Self::null();
        };
        Self::bound(&Scheduler::from_shared(shared), bound.id, Rc::clone(&bound.task))
    }

    /// Release now and become null. Same as dropping the handle.
    pub fn release(&mut self) {
        if let Some(bound) = self.inner.take() {
            if let Some(shared) = bound.sched.upgrade() {
                Scheduler::from_shared(shared).release(bound.id);
            }
        }
    }

    /// Give up ownership without requesting deletion. The task keeps running
    /// unowned until something deletes it.
    pub fn disown(mut self) -> Option<TaskId> {
        let bound = self.inner.take()?;
        if let Some(shared) = bound.sched.upgrade() {
            Scheduler::from_shared(shared).disown(bound.id);
        }
        Some(bound.id)
    }
}

impl<T: Task> TaskRef<T> {
    /// Forget the concrete type, keeping the reference.
    #[must_use]
    pub fn erase(mut self) -> TaskRef<dyn Task> {
        let inner = self.inner.take().map(|bound| {
            let task: Rc<RefCell<dyn Task>> = bound.task;
            Bound {
                sched: bound.sched,
                id: bound.id,
                task,
            }
        });
        TaskRef { inner }
    }
}

impl<T: Task + ?Sized> Drop for TaskRef<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Task + ?Sized> Default for TaskRef<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: Task + ?Sized> AsTaskId for TaskRef<T> {
    fn as_task_id(&self) -> Option<TaskId> {
        self.id()
    }
}

impl<T: Task + ?Sized> fmt::Debug for TaskRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "TaskRef({id})"),
            None => f.write_str("TaskRef(null)"),
        }
    }
}
