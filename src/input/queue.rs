use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::EngineEvent;

type Waker = Rc<dyn Fn()>;

#[derive(Default)]
struct Inner {
    events: VecDeque<EngineEvent>,
    waker: Option<Waker>,
}

/// Shared FIFO of pending [`EngineEvent`]s.
///
/// Cloning shares the queue. An optional waker runs after every push so a
/// parked animation loop can be re-armed.
#[derive(Clone, Default)]
pub struct EventQueue {
    inner: Rc<RefCell<Inner>>,
}

impl EventQueue {
    /// Empty queue with no waker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the closure run after each push.
    pub fn set_waker(&self, waker: impl Fn() + 'static) {
        self.inner.borrow_mut().waker = Some(Rc::new(waker));
    }

    /// Remove the waker.
    pub fn clear_waker(&self) {
        let waker = self.inner.borrow_mut().waker.take();
        drop(waker);
    }

    /// Queue an event and wake the consumer.
    pub fn push(&self, event: EngineEvent) {
        let waker = {
            let mut inner = self.inner.borrow_mut();
            inner.events.push_back(event);
            inner.waker.clone()
        };
        if let Some(waker) = waker {
            waker();
        }
    }

    /// Take every pending event, oldest first.
    pub fn drain(&self) -> Vec<EngineEvent> {
        self.inner.borrow_mut().events.drain(..).collect()
    }

    /// Drop pending events and the waker.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.events.clear();
        let waker = inner.waker.take();
        drop(inner);
        drop(waker);
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().events.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventQueue")
            .field("pending", &inner.events.len())
            .field("has_waker", &inner.waker.is_some())
            .finish()
    }
}
