use serde::{Deserialize, Serialize};

use crate::model::TaskDescription;

pub const DEFAULT_WALKER_STEP_TIME: f64 = 0.3;
pub const DEFAULT_ROW_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn from_light_flag(light: bool) -> Self {
        if light {
            Self::Light
        } else {
            Self::Dark
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelMode {
    Case,
    Sandbox,
}

/// Bottom layer of the settings cascade. Every resolution starts from these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalDefaults {
    pub walker_step_time: f64,
    pub row_limit: u32,
    pub theme: Theme,
}

impl Default for GlobalDefaults {
    fn default() -> Self {
        Self {
            walker_step_time: DEFAULT_WALKER_STEP_TIME,
            row_limit: DEFAULT_ROW_LIMIT,
            theme: Theme::default(),
        }
    }
}

impl GlobalDefaults {
    pub fn from_json_str(raw: &str) -> Result<Self, crate::PmError> {
        serde_json::from_str(raw).map_err(|error| crate::PmError::Definition(error.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfiguration {
    pub walker_step_time: f64,
    pub row_limit: u32,
    pub theme: Theme,
    pub precode: String,
    pub start_code: String,
    pub task_description: TaskDescription,
    pub available_functions: Vec<String>,
    pub mode: LevelMode,
    pub case_index: usize,
}

impl EffectiveConfiguration {
    /// The cleared state: defaults applied, text fields and the function list empty.
    pub fn cleared(defaults: &GlobalDefaults, mode: LevelMode, case_index: usize) -> Self {
        Self {
            walker_step_time: defaults.walker_step_time,
            row_limit: defaults.row_limit,
            theme: defaults.theme,
            precode: String::new(),
            start_code: String::new(),
            task_description: TaskDescription::default(),
            available_functions: Vec::new(),
            mode,
            case_index,
        }
    }
}
