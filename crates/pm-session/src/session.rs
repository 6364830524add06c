use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use pm_core::{
    EffectiveConfiguration, GameDefinition, GlobalDefaults, LevelMode, PmError, PmValue,
};
use pm_functions::FunctionTable;
use pm_runtime::{
    CaseSwitched, CompilerSession, LevelChanged, LifecycleEvents, Scheduler, StopReason,
    SubscriptionId, TaskId, Walker,
};
use tracing::{debug, info, warn};

use crate::{cascade, navigation, CaseHandler, GameUi, LevelAnswer, LevelGuide, SceneHost};

pub const NO_ANSWER_MESSAGE: &str = "No answer was given";

#[derive(Clone, Default)]
pub struct SessionOptions {
    pub defaults: GlobalDefaults,
    pub function_table: FunctionTable,
}

#[derive(Debug, Clone)]
struct CurrentLevel {
    index: usize,
    scene_name: String,
    level_id: String,
    mode: LevelMode,
    has_sandbox: bool,
    case_handler: Option<CaseHandler>,
    guide: LevelGuide,
}

/// Drives one player's way through a game definition.
///
/// The session owns the definition, the compiler session and the scheduled work of the
/// level being played. Every transition re-resolves the effective configuration and
/// rebuilds the function registry from it.
pub struct Session {
    definition: GameDefinition,
    options: SessionOptions,
    compiler: CompilerSession,
    scheduler: Scheduler,
    host: Box<dyn SceneHost>,
    ui: Rc<RefCell<dyn GameUi>>,
    answer: Rc<RefCell<LevelAnswer>>,
    loaded_scene: Option<String>,
    current: Option<CurrentLevel>,
    config: Option<EffectiveConfiguration>,
    stop_subscription: SubscriptionId,
}

impl Session {
    pub fn new(
        definition: GameDefinition,
        walker: Box<dyn Walker>,
        host: Box<dyn SceneHost>,
        ui: Rc<RefCell<dyn GameUi>>,
        options: SessionOptions,
    ) -> Self {
        let compiler = CompilerSession::new(walker);
        let answer = Rc::new(RefCell::new(LevelAnswer::default()));
        let stop_subscription = subscribe_answer_check(&compiler, &answer, &ui);

        Self {
            definition,
            options,
            compiler,
            scheduler: Scheduler::new(),
            host,
            ui,
            answer,
            loaded_scene: None,
            current: None,
            config: None,
            stop_subscription,
        }
    }

    pub fn definition(&self) -> &GameDefinition {
        &self.definition
    }

    pub fn compiler(&self) -> &CompilerSession {
        &self.compiler
    }

    pub fn events(&self) -> &LifecycleEvents {
        self.compiler.events()
    }

    /// Configuration applied by the last successful transition.
    pub fn config(&self) -> Option<&EffectiveConfiguration> {
        self.config.as_ref()
    }

    pub fn loaded_scene(&self) -> Option<&str> {
        self.loaded_scene.as_deref()
    }

    pub fn current_level(&self) -> Option<usize> {
        self.current.as_ref().map(|current| current.index)
    }

    pub fn mode(&self) -> Option<LevelMode> {
        self.current.as_ref().map(|current| current.mode)
    }

    pub fn case_handler(&self) -> Option<CaseHandler> {
        self.current.as_ref().and_then(|current| current.case_handler)
    }

    pub fn guide(&self) -> Option<&LevelGuide> {
        self.current.as_ref().map(|current| &current.guide)
    }

    pub fn answer(&self) -> LevelAnswer {
        self.answer.borrow().clone()
    }

    pub fn start_level(&mut self, index: usize) -> Result<(), PmError> {
        let level_ref = navigation::active_level(&self.definition, index)?;
        let scene = navigation::find_scene(&self.definition, &level_ref.scene_name)?;

        if self.loaded_scene.as_deref() != Some(scene.name.as_str()) {
            let target = navigation::resolve_build_target(self.host.as_ref(), &scene.name)?;
            if let Some(previous) = self.loaded_scene.take() {
                self.host.unload_scene(&previous);
                info!(scene = %previous, "scene_unloaded");
            }
            self.host.load_scene(target);
            info!(scene = %scene.name, target = target.0, "scene_loaded");
            self.loaded_scene = Some(scene.name.clone());
        }

        let level = navigation::find_level(scene, &level_ref.level_id)?;
        let guide = LevelGuide::build(&level.guide_bubbles, index)?;
        let mode = if level.has_sandbox() {
            LevelMode::Sandbox
        } else {
            LevelMode::Case
        };
        let current = CurrentLevel {
            index,
            scene_name: scene.name.clone(),
            level_id: level.id.clone(),
            mode,
            has_sandbox: level.has_sandbox(),
            case_handler: CaseHandler::for_level(level),
            guide,
        };

        self.handle_level_changed()?;
        info!(
            level = index,
            scene = %current.scene_name,
            level_id = %current.level_id,
            ?mode,
            "level_started"
        );
        self.current = Some(current);
        self.push_guide()?;
        self.apply_settings()?;
        self.compiler
            .events()
            .level_changed
            .broadcast(&LevelChanged { level_index: index });
        Ok(())
    }

    pub fn switch_case(&mut self, case_number: usize) -> Result<(), PmError> {
        let current = self
            .current
            .as_mut()
            .ok_or_else(|| PmError::precondition("no level has been started"))?;
        if current.mode != LevelMode::Case {
            return Err(PmError::precondition(
                "cases cannot be switched while the level is in sandbox mode",
            ));
        }
        let handler = current
            .case_handler
            .as_mut()
            .ok_or_else(|| PmError::precondition("the current level has no cases"))?;
        handler.select(case_number)?;

        self.scheduler.cancel_all();
        self.answer.borrow_mut().reset();
        self.with_ui(|ui| {
            ui.hide_answer_bubble();
            ui.reset_variables();
        })?;
        info!(case = case_number, "case_switched");
        self.apply_settings()?;
        self.compiler
            .events()
            .case_switched
            .broadcast(&CaseSwitched { case_number });
        Ok(())
    }

    /// Moves a level that has both cases and a sandbox between the two. A running
    /// program is stopped because its precode no longer applies.
    pub fn switch_mode(&mut self, mode: LevelMode) -> Result<(), PmError> {
        let current = self
            .current
            .as_mut()
            .ok_or_else(|| PmError::precondition("no level has been started"))?;
        let available = match mode {
            LevelMode::Case => current.case_handler.is_some(),
            LevelMode::Sandbox => current.has_sandbox,
        };
        if !available {
            return Err(PmError::precondition(format!(
                "level \"{}\" has no {} mode",
                current.level_id,
                mode_label(mode)
            )));
        }
        if current.mode == mode {
            return Ok(());
        }
        current.mode = mode;

        self.compiler.stop(StopReason::CodeForced);
        self.scheduler.cancel_all();
        self.answer.borrow_mut().reset();
        info!(mode = mode_label(mode), "mode_switched");
        self.apply_settings()
    }

    /// Runs the learner's program. Refused while the current level has no applied
    /// configuration, so a level whose settings failed never runs.
    pub fn start_compiler(&self) -> Result<(), PmError> {
        if self.config.is_none() {
            return Err(PmError::precondition(
                "the current level has no applied settings",
            ));
        }
        self.compiler.start()
    }

    pub fn stop_compiler(&self, reason: StopReason) {
        self.compiler.stop(reason);
    }

    pub fn expect_answer(&self, expects_answer: bool) {
        self.answer.borrow_mut().set_expects_answer(expects_answer);
    }

    pub fn submit_answer(&self, answer: PmValue) {
        debug!(answer = %answer, "answer_submitted");
        self.answer.borrow_mut().submit(answer);
    }

    /// Schedules work that belongs to the current level or case.
    pub fn schedule<F>(&mut self, delay: Duration, task: F) -> TaskId
    where
        F: FnOnce() + 'static,
    {
        self.scheduler.schedule(delay, task)
    }

    pub fn cancel_scheduled(&mut self, id: TaskId) -> bool {
        self.scheduler.cancel(id)
    }

    pub fn pending_work(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.scheduler.advance(elapsed)
    }

    fn handle_level_changed(&mut self) -> Result<(), PmError> {
        self.compiler.stop(StopReason::CodeForced);
        self.scheduler.cancel_all();
        *self.answer.borrow_mut() = LevelAnswer::default();
        self.config = None;
        self.clear_functions();
        self.with_ui(|ui| ui.reset_variables())
    }

    /// Leaves only the built-ins installed until the next settings application succeeds.
    fn clear_functions(&self) {
        match self.options.function_table.build::<&str>(&[]) {
            Ok(builtins) => self.compiler.set_functions(builtins),
            Err(error) => {
                warn!(code = error.code(), "function_registry_clear_failed");
                self.compiler.set_functions(Default::default());
            }
        }
    }

    fn apply_settings(&mut self) -> Result<(), PmError> {
        let current = self
            .current
            .as_ref()
            .ok_or_else(|| PmError::precondition("no level has been started"))?;
        let scene = navigation::find_scene(&self.definition, &current.scene_name)?;
        let level = navigation::find_level(scene, &current.level_id)?;
        let case_index = current.case_handler.map(|h| h.current()).unwrap_or(0);
        let config = cascade::resolve(
            &self.options.defaults,
            scene,
            level,
            current.mode,
            case_index,
        );

        let registry = self
            .options
            .function_table
            .build(&config.available_functions)?;
        debug!(functions = ?registry.names(), "function_registry_built");
        self.compiler.set_functions(registry);
        self.compiler.configure_walker(&config)?;
        self.with_ui(|ui| {
            ui.set_task_description(&config.task_description);
            ui.set_precode(&config.precode);
            ui.set_start_code(&config.start_code);
            ui.set_row_limit(config.row_limit);
            ui.set_theme(config.theme);
        })?;
        self.config = Some(config);
        Ok(())
    }

    fn push_guide(&self) -> Result<(), PmError> {
        let Some(current) = &self.current else {
            return Ok(());
        };
        self.with_ui(|ui| {
            if current.guide.is_empty() {
                ui.hide_guide();
            } else {
                ui.set_guide(&current.guide);
            }
        })
    }

    fn with_ui(&self, apply: impl FnOnce(&mut dyn GameUi)) -> Result<(), PmError> {
        let mut ui = self
            .ui
            .try_borrow_mut()
            .map_err(|_| PmError::runtime("game ui is busy"))?;
        apply(&mut *ui);
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.compiler
            .events()
            .compiler_stopped
            .unsubscribe(self.stop_subscription);
    }
}

fn mode_label(mode: LevelMode) -> &'static str {
    match mode {
        LevelMode::Case => "case",
        LevelMode::Sandbox => "sandbox",
    }
}

fn subscribe_answer_check(
    compiler: &CompilerSession,
    answer: &Rc<RefCell<LevelAnswer>>,
    ui: &Rc<RefCell<dyn GameUi>>,
) -> SubscriptionId {
    let answer: Weak<RefCell<LevelAnswer>> = Rc::downgrade(answer);
    let ui: Weak<RefCell<dyn GameUi>> = Rc::downgrade(ui);
    compiler.events().compiler_stopped.subscribe(move |reason| {
        let Some(answer) = answer.upgrade() else {
            return Ok(());
        };
        let missing = {
            let mut answer = answer
                .try_borrow_mut()
                .map_err(|_| PmError::runtime("answer tracker is busy"))?;
            answer.mark_compiler_stopped();
            answer.is_missing()
        };
        if *reason != StopReason::Finished || !missing {
            return Ok(());
        }
        if let Some(ui) = ui.upgrade() {
            ui.try_borrow_mut()
                .map_err(|_| PmError::runtime("game ui is busy"))?
                .raise_task_error(NO_ANSWER_MESSAGE);
        }
        Ok(())
    })
}
