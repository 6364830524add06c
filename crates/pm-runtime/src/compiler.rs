use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use pm_core::{EffectiveConfiguration, PmError};
use pm_functions::FunctionRegistry;
use tracing::{debug, info, warn};

use crate::{LifecycleEvents, Walker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompilerState {
    #[default]
    Idle,
    Running,
}

/// Why a run ended. Purely informational: the session behaves the same for every
/// reason, observers decide what each one means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// The learner pressed stop.
    UserForced,
    /// Stopped by the game itself, e.g. on a level change.
    #[default]
    CodeForced,
    /// The program ran to completion.
    Finished,
    /// The walker failed, or the run could not be started.
    RuntimeError,
}

struct CompilerInner {
    state: Cell<CompilerState>,
    generation: Cell<u64>,
    activating: Cell<bool>,
    deferred_stop: Cell<Option<StopReason>>,
    walker: RefCell<Box<dyn Walker>>,
    functions: RefCell<FunctionRegistry>,
    events: LifecycleEvents,
}

/// Idle/Running state machine around the walker. Cloning yields another handle to the
/// same session.
#[derive(Clone)]
pub struct CompilerSession {
    inner: Rc<CompilerInner>,
}

impl fmt::Debug for CompilerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerSession")
            .field("state", &self.inner.state.get())
            .field("generation", &self.inner.generation.get())
            .field("functions", &self.inner.functions.borrow().len())
            .finish()
    }
}

impl CompilerSession {
    pub fn new(walker: Box<dyn Walker>) -> Self {
        Self {
            inner: Rc::new(CompilerInner {
                state: Cell::new(CompilerState::Idle),
                generation: Cell::new(0),
                activating: Cell::new(false),
                deferred_stop: Cell::new(None),
                walker: RefCell::new(walker),
                functions: RefCell::new(FunctionRegistry::default()),
                events: LifecycleEvents::default(),
            }),
        }
    }

    pub fn state(&self) -> CompilerState {
        self.inner.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.state() == CompilerState::Running
    }

    pub fn events(&self) -> &LifecycleEvents {
        &self.inner.events
    }

    pub fn functions(&self) -> FunctionRegistry {
        self.inner.functions.borrow().clone()
    }

    /// Replaces the registry used by the next `start`. A running program keeps the one
    /// it was started with.
    pub fn set_functions(&self, functions: FunctionRegistry) {
        *self.inner.functions.borrow_mut() = functions;
    }

    pub fn configure_walker(&self, config: &EffectiveConfiguration) -> Result<(), PmError> {
        let mut walker = self
            .inner
            .walker
            .try_borrow_mut()
            .map_err(|_| PmError::runtime("walker is busy and cannot be configured"))?;
        walker.apply_configuration(config);
        Ok(())
    }

    /// Starts a run unless one is already going. Any failure while starting stops the
    /// session with `RuntimeError` and is returned to the caller.
    pub fn start(&self) -> Result<(), PmError> {
        if self.is_running() {
            debug!("compiler_already_running");
            return Ok(());
        }

        let generation = self.bump_generation();
        self.inner.state.set(CompilerState::Running);
        info!(generation, "compiler_started");
        self.inner.events.compiler_started.broadcast(&());

        if !self.is_running() || self.inner.generation.get() != generation {
            debug!(generation, "compiler_stopped_by_start_observer");
            return Ok(());
        }

        if let Err(error) = self.activate_walker(generation) {
            self.inner.deferred_stop.set(None);
            warn!(code = error.code(), error = %error, "compiler_start_failed");
            self.stop(StopReason::RuntimeError);
            return Err(error);
        }

        if let Some(reason) = self.inner.deferred_stop.take() {
            self.stop(reason);
        }
        Ok(())
    }

    fn activate_walker(&self, generation: u64) -> Result<(), PmError> {
        let functions = self.functions();
        let mut walker = self
            .inner
            .walker
            .try_borrow_mut()
            .map_err(|_| PmError::runtime("walker is busy and cannot be activated"))?;
        walker.install_functions(&functions)?;

        self.inner.activating.set(true);
        let result = walker.activate(StopHandle {
            session: Rc::downgrade(&self.inner),
            generation,
        });
        self.inner.activating.set(false);
        result
    }

    /// Moves to `Idle`, halts the walker and broadcasts the reason. Runs in full even
    /// when already idle. A stop requested while the walker is still inside `activate`
    /// is held back and lands once `start` has returned from it.
    pub fn stop(&self, reason: StopReason) {
        if self.inner.activating.get() {
            if self.inner.deferred_stop.get().is_none() {
                debug!(?reason, "compiler_stop_deferred");
                self.inner.deferred_stop.set(Some(reason));
            }
            return;
        }

        self.inner.state.set(CompilerState::Idle);
        self.bump_generation();
        match self.inner.walker.try_borrow_mut() {
            Ok(mut walker) => walker.stop(),
            Err(_) => warn!("walker_busy_during_stop"),
        }
        info!(?reason, "compiler_stopped");
        self.inner.events.compiler_stopped.broadcast(&reason);
    }

    pub fn stop_by_user(&self) {
        self.stop(StopReason::UserForced);
    }

    fn bump_generation(&self) -> u64 {
        let next = self.inner.generation.get() + 1;
        self.inner.generation.set(next);
        next
    }
}

/// Completion callback handed to the walker for one run. Calls from a run that has
/// since been stopped or replaced are ignored.
#[derive(Clone)]
pub struct StopHandle {
    session: Weak<CompilerInner>,
    generation: u64,
}

impl StopHandle {
    pub fn is_current(&self) -> bool {
        self.session
            .upgrade()
            .map(|inner| inner.generation.get() == self.generation)
            .unwrap_or(false)
    }

    /// Returns whether the stop was accepted.
    pub fn stop(&self, reason: StopReason) -> bool {
        let Some(inner) = self.session.upgrade() else {
            return false;
        };
        if inner.generation.get() != self.generation {
            debug!(?reason, generation = self.generation, "stale_stop_ignored");
            return false;
        }
        CompilerSession { inner }.stop(reason);
        true
    }
}

impl fmt::Debug for StopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopHandle")
            .field("generation", &self.generation)
            .field("current", &self.is_current())
            .finish()
    }
}
