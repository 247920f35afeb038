use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Registration token. [`dispose`](Self::dispose) unregisters; dropping
/// the token does the same.
#[must_use = "dropping a Subscription unregisters it"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Token that runs `release` when disposed.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Token with nothing to release.
    pub fn empty() -> Self {
        Self { release: None }
    }

    /// Unregister now.
    pub fn dispose(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

// Keyed by connection order so emission order is stable
type Slots = RefCell<BTreeMap<u64, Rc<dyn Fn()>>>;

/// Multi-subscriber notification list for host adapters.
///
/// Handlers run in connection order. Emission snapshots the slot list
/// first, so handlers may connect or dispose subscriptions while it runs.
#[derive(Default)]
pub struct Signal {
    slots: Rc<Slots>,
    next_id: Cell<u64>,
}

impl Signal {
    /// Empty signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`.
    pub fn connect(&self, handler: Box<dyn Fn()>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let previous = self.slots.borrow_mut().insert(id, Rc::from(handler));
        debug_assert!(previous.is_none());
        let slots = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = slots.upgrade() {
                let removed = slots.borrow_mut().remove(&id);
                drop(removed);
            }
        })
    }

    /// Call every connected handler.
    pub fn emit(&self) {
        let handlers: Vec<_> = self.slots.borrow().values().cloned().collect();
        for handler in handlers {
            handler();
        }
    }

    /// Number of connected handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Whether nothing is connected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("handlers", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispose_runs_release_once() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let sub = Subscription::new(move || c.set(c.get() + 1));
        sub.dispose();
        assert_eq!(count.get(), 1);

        let c = Rc::clone(&count);
        drop(Subscription::new(move || c.set(c.get() + 1)));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn emit_reaches_connected_handlers_only() {
        let signal = Signal::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let a = signal.connect(Box::new(move || h.set(h.get() + 1)));
        let h = Rc::clone(&hits);
        let b = signal.connect(Box::new(move || h.set(h.get() + 10)));
        signal.emit();
        assert_eq!(hits.get(), 11);

        b.dispose();
        signal.emit();
        assert_eq!(hits.get(), 12);
        assert_eq!(signal.len(), 1);
        drop(a);
        assert!(signal.is_empty());
    }

    #[test]
    fn handlers_run_in_connection_order() {
        let signal = Signal::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let subs: Vec<Subscription> = (0..32)
            .map(|i| {
                let order = Rc::clone(&order);
                signal.connect(Box::new(move || order.borrow_mut().push(i)))
            })
            .collect();
        signal.emit();
        assert_eq!(*order.borrow(), (0..32).collect::<Vec<_>>());
        drop(subs);
    }

    #[test]
    fn handler_may_disconnect_during_emit() {
        let signal = Rc::new(Signal::new());
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::default();
        let s = Rc::clone(&slot);
        let sub = signal.connect(Box::new(move || {
            s.borrow_mut().take();
        }));
        *slot.borrow_mut() = Some(sub);
        signal.emit();
        assert!(signal.is_empty());
    }

    #[test]
    fn subscription_outliving_signal_is_harmless() {
        let signal = Signal::new();
        let sub = signal.connect(Box::new(|| {}));
        drop(signal);
        sub.dispose();
    }
}
