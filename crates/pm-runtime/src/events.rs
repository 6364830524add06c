use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pm_core::PmError;
use tracing::warn;

use crate::StopReason;

pub type ObserverResult = Result<(), PmError>;

type Observer<E> = Rc<dyn Fn(&E) -> ObserverResult>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// One named broadcast channel. Observers run in subscription order; a failing observer
/// is logged and the broadcast continues with the next one.
pub struct Channel<E> {
    name: &'static str,
    next_id: Cell<u64>,
    observers: RefCell<Vec<(SubscriptionId, Observer<E>)>>,
}

impl<E> Channel<E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            next_id: Cell::new(0),
            observers: RefCell::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&E) -> ObserverResult + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.borrow().is_empty()
    }

    /// Delivers `event` to every observer subscribed when the broadcast began and
    /// returns how many of them failed.
    pub fn broadcast(&self, event: &E) -> usize {
        let snapshot = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect::<Vec<_>>();

        let mut failures = 0usize;
        for observer in snapshot {
            if let Err(error) = observer(event) {
                failures += 1;
                warn!(channel = self.name, code = error.code(), error = %error, "observer_failed");
            }
        }
        failures
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChanged {
    pub level_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseSwitched {
    pub case_number: usize,
}

pub struct LifecycleEvents {
    pub compiler_started: Channel<()>,
    pub compiler_stopped: Channel<StopReason>,
    pub level_changed: Channel<LevelChanged>,
    pub case_switched: Channel<CaseSwitched>,
}

impl Default for LifecycleEvents {
    fn default() -> Self {
        Self {
            compiler_started: Channel::new("compiler_started"),
            compiler_stopped: Channel::new("compiler_stopped"),
            level_changed: Channel::new("level_changed"),
            case_switched: Channel::new("case_switched"),
        }
    }
}
