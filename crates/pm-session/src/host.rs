use pm_core::{TaskDescription, Theme};

use crate::{BuildTarget, LevelGuide};

/// Scene loading on the host side. Loads and unloads are fire-and-forget.
pub trait SceneHost {
    fn build_target(&self, scene_name: &str) -> Option<BuildTarget>;

    fn load_scene(&mut self, target: BuildTarget);

    fn unload_scene(&mut self, scene_name: &str);
}

/// The game window widgets the session pushes state into.
pub trait GameUi {
    fn set_task_description(&mut self, description: &TaskDescription);

    fn set_precode(&mut self, precode: &str);

    fn set_start_code(&mut self, _start_code: &str) {}

    fn set_row_limit(&mut self, row_limit: u32);

    fn set_theme(&mut self, theme: Theme);

    fn reset_variables(&mut self);

    fn set_guide(&mut self, guide: &LevelGuide);

    fn hide_guide(&mut self);

    fn hide_answer_bubble(&mut self) {}

    fn raise_task_error(&mut self, message: &str);
}
