//! Execution lifecycle: the compiler session state machine, its observer channels,
//! cancellable scheduled work, and the seam to the code walker.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`). The host's main loop owns the
//! control thread; the walker reports completion through a [`StopHandle`].

mod compiler;
mod events;
mod scheduler;
mod walker;

pub use compiler::{CompilerSession, CompilerState, StopHandle, StopReason};
pub use events::{
    CaseSwitched, Channel, LevelChanged, LifecycleEvents, ObserverResult, SubscriptionId,
};
pub use scheduler::{Scheduler, TaskId};
pub use walker::{IdleWalker, Walker};
