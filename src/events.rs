//! Synchronous listener registries.
//!
//! Graph nodes and graphs announce edge changes to registered closures. Listeners run in
//! registration order on the calling thread. Each registration hands back a [`ListenerId`]
//! which can later be passed to `unsubscribe`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Hands out [`ListenerId`]s that are unique within one owner.
#[derive(Default)]
pub(crate) struct ListenerIds {
    next: Cell<u64>,
}

impl ListenerIds {
    pub(crate) fn next(&self) -> ListenerId {
        let id = self.next.get();
        self.next.set(id + 1);
        ListenerId(id)
    }
}

/// An ordered list of listeners of one kind.
///
/// `F` is usually an unsized closure type such as `dyn Fn(&GraphNode<T>)`.
pub(crate) struct Listeners<F: ?Sized> {
    entries: RefCell<Vec<(ListenerId, Rc<F>)>>,
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<F: ?Sized> fmt::Debug for Listeners<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.borrow().len())
            .finish()
    }
}

impl<F: ?Sized> Listeners<F> {
    pub(crate) fn push(&self, id: ListenerId, listener: Rc<F>) {
        self.entries.borrow_mut().push((id, listener));
    }

    /// Removes the listener registered under `id`. Returns `false` if there was none.
    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// A copy of the current listeners. Callers iterate the copy so that a listener may
    /// register or unregister listeners without tripping over an outstanding borrow.
    pub(crate) fn snapshot(&self) -> Vec<Rc<F>> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}
