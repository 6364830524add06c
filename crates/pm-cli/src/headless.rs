use std::sync::Arc;

use pm_core::{PmError, PmValue, TaskDescription, Theme};
use pm_functions::{Arity, FunctionTable, HostFunction};
use pm_session::{BuildTarget, GameUi, LevelGuide, SceneHost};
use tracing::{debug, warn};

/// Binds a fixed list of scene names to build targets in list order.
#[derive(Debug, Clone, Default)]
pub(crate) struct HeadlessHost {
    scenes: Vec<String>,
}

impl HeadlessHost {
    pub(crate) fn new(scenes: Vec<String>) -> Self {
        Self { scenes }
    }
}

impl SceneHost for HeadlessHost {
    fn build_target(&self, scene_name: &str) -> Option<BuildTarget> {
        self.scenes
            .iter()
            .position(|scene| scene == scene_name)
            .map(BuildTarget)
    }

    fn load_scene(&mut self, target: BuildTarget) {
        debug!(target = target.0, "headless_scene_loaded");
    }

    fn unload_scene(&mut self, scene_name: &str) {
        debug!(scene = %scene_name, "headless_scene_unloaded");
    }
}

#[derive(Debug, Default)]
pub(crate) struct HeadlessUi {
    pub(crate) task_errors: Vec<String>,
}

impl GameUi for HeadlessUi {
    fn set_task_description(&mut self, description: &TaskDescription) {
        debug!(header = %description.header, "task_description");
    }

    fn set_precode(&mut self, _precode: &str) {}

    fn set_row_limit(&mut self, _row_limit: u32) {}

    fn set_theme(&mut self, _theme: Theme) {}

    fn reset_variables(&mut self) {}

    fn set_guide(&mut self, guide: &LevelGuide) {
        debug!(steps = guide.steps().len(), "guide_shown");
    }

    fn hide_guide(&mut self) {}

    fn raise_task_error(&mut self, message: &str) {
        warn!(message, "task_error");
        self.task_errors.push(message.to_string());
    }
}

/// Stand-in for a game-specific function that only the real game provides.
#[derive(Debug)]
pub(crate) struct AuthoredFunction {
    name: String,
}

impl HostFunction for AuthoredFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> Arity {
        Arity::at_least(0)
    }

    fn call(&self, _args: &[PmValue]) -> Result<PmValue, PmError> {
        Err(PmError::function_call(
            &self.name,
            "only available inside the game",
        ))
    }
}

pub(crate) fn function_table_with(allowed: &[String]) -> Result<FunctionTable, PmError> {
    let mut table = FunctionTable::with_builtins();
    for name in allowed {
        if table.contains(name) {
            continue;
        }
        let exposed = name.clone();
        table.register(
            name.clone(),
            Arc::new(move || -> Arc<dyn HostFunction> {
                Arc::new(AuthoredFunction {
                    name: exposed.clone(),
                })
            }),
        )?;
    }
    Ok(table)
}
