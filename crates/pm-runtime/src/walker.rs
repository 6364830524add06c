use pm_core::{EffectiveConfiguration, PmError};
use pm_functions::FunctionRegistry;

use crate::{StopHandle, StopReason};

/// The code walker that steps through learner programs.
///
/// `activate` may report completion synchronously (by calling the handle before it
/// returns) or later from the host loop. Halting an already halted walker must be
/// harmless.
pub trait Walker {
    fn install_functions(&mut self, functions: &FunctionRegistry) -> Result<(), PmError>;

    fn activate(&mut self, on_stop: StopHandle) -> Result<(), PmError>;

    fn stop(&mut self);

    fn apply_configuration(&mut self, _config: &EffectiveConfiguration) {}
}

/// Walker for hosts that only need the orchestration layer, e.g. authoring checks.
/// With `finish_on_activate` it reports every run as finished straight away.
#[derive(Debug, Default)]
pub struct IdleWalker {
    finish_on_activate: bool,
    handle: Option<StopHandle>,
}

impl IdleWalker {
    pub fn finishing() -> Self {
        Self {
            finish_on_activate: true,
            ..Self::default()
        }
    }
}

impl Walker for IdleWalker {
    fn install_functions(&mut self, _functions: &FunctionRegistry) -> Result<(), PmError> {
        Ok(())
    }

    fn activate(&mut self, on_stop: StopHandle) -> Result<(), PmError> {
        if self.finish_on_activate {
            on_stop.stop(StopReason::Finished);
            return Ok(());
        }
        self.handle = Some(on_stop);
        Ok(())
    }

    fn stop(&mut self) {
        self.handle = None;
    }
}
