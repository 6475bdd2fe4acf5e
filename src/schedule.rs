use std::cell::RefCell;

/// At most one pending handle (a timeout or an animation frame) whose drop
/// cancels the work it stands for.
pub struct PendingSlot<H> {
    handle: RefCell<Option<H>>,
}

impl<H> Default for PendingSlot<H> {
    fn default() -> Self {
        Self {
            handle: RefCell::new(None),
        }
    }
}

impl<H> PendingSlot<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `handle` and cancels the one it displaces.
    pub fn replace(&self, handle: H) {
        let previous = self.handle.borrow_mut().replace(handle);
        // Dropped outside the borrow: a handle's drop may reach back into the slot.
        drop(previous);
    }

    /// Keeps an already pending handle; otherwise stores a new one.
    pub fn fill_if_empty(&self, make: impl FnOnce() -> H) -> bool {
        if self.is_pending() {
            return false;
        }

        self.replace(make());
        true
    }

    pub fn take(&self) -> Option<H> {
        self.handle.borrow_mut().take()
    }

    pub fn is_pending(&self) -> bool {
        self.handle.borrow().is_some()
    }
}
