use std::cell::Cell;
use std::rc::Rc;

use super::simulation::Body;

/// What a tick listener sees after each simulation step.
#[derive(Clone, Copy, Debug)]
pub struct TickEvent<'a> {
    pub generation: u64,
    pub tick: u64,
    pub alpha: f32,
    pub running: bool,
    pub bodies: &'a [Body],
}

type TickCallback = Box<dyn FnMut(&TickEvent<'_>)>;

struct Listener {
    active: Rc<Cell<bool>>,
    callback: TickCallback,
}

/// Keeps a listener registered for as long as it lives.
#[must_use = "dropping a subscription unregisters its listener"]
#[derive(Debug)]
pub struct Subscription {
    active: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Unregisters now instead of at drop.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

#[derive(Default)]
pub(super) struct TickListeners {
    listeners: Vec<Listener>,
}

impl TickListeners {
    pub(super) fn subscribe(
        &mut self,
        callback: impl FnMut(&TickEvent<'_>) + 'static,
    ) -> Subscription {
        let active = Rc::new(Cell::new(true));
        self.listeners.push(Listener {
            active: Rc::clone(&active),
            callback: Box::new(callback),
        });
        Subscription { active }
    }

    pub(super) fn emit(&mut self, event: &TickEvent<'_>) {
        self.listeners.retain(|listener| listener.active.get());
        for listener in &mut self.listeners {
            (listener.callback)(event);
        }
    }

    pub(super) fn len(&self) -> usize {
        self.listeners
            .iter()
            .filter(|listener| listener.active.get())
            .count()
    }

    pub(super) fn clear(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.active.set(false);
        }
    }
}
