use serde::{Deserialize, Serialize};

use crate::error::PmError;

/// Root of an authored game: every scene plus the ordered list of playable levels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDefinition {
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub active_levels: Vec<ActiveLevelRef>,
}

impl GameDefinition {
    pub fn from_json_str(raw: &str) -> Result<Self, PmError> {
        serde_json::from_str(raw).map_err(|error| PmError::Definition(error.to_string()))
    }

    pub fn level_count(&self) -> usize {
        self.active_levels.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveLevelRef {
    pub scene_name: String,
    pub level_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub name: String,
    #[serde(default)]
    pub scene_settings: Option<SceneSettings>,
    #[serde(default)]
    pub levels: Vec<Level>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: String,
    #[serde(default)]
    pub level_settings: Option<LevelSettings>,
    #[serde(default)]
    pub cases: Vec<Case>,
    #[serde(default)]
    pub sandbox: Option<Sandbox>,
    #[serde(default)]
    pub guide_bubbles: Vec<GuideBubble>,
}

impl Level {
    pub fn has_cases(&self) -> bool {
        !self.cases.is_empty()
    }

    pub fn has_sandbox(&self) -> bool {
        self.sandbox.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    #[serde(default)]
    pub case_settings: Option<CaseSettings>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sandbox {
    #[serde(default)]
    pub sandbox_settings: Option<SandboxSettings>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSettings {
    #[serde(default)]
    pub walker_step_time: f64,
    #[serde(default)]
    pub game_window_ui_light_theme: bool,
    #[serde(default)]
    pub available_functions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSettings {
    #[serde(default)]
    pub precode: Option<String>,
    #[serde(default)]
    pub start_code: Option<String>,
    #[serde(default)]
    pub task_description: Option<TaskDescription>,
    #[serde(default)]
    pub row_limit: i64,
    #[serde(default)]
    pub available_functions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSettings {
    #[serde(default)]
    pub precode: Option<String>,
    #[serde(default)]
    pub walker_step_time: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxSettings {
    #[serde(default)]
    pub precode: Option<String>,
    #[serde(default)]
    pub walker_step_time: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskDescription {
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub body: String,
}

impl TaskDescription {
    pub fn new(header: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuideBubble {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}
