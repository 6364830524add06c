use pm_core::{
    EffectiveConfiguration, GlobalDefaults, Level, LevelMode, LevelSettings, Scene, SceneSettings,
    TaskDescription, Theme,
};

/// Folds defaults, scene, level and the selected case or sandbox into one configuration.
///
/// Each layer writes only the fields it carries. The result depends on nothing but the
/// arguments, so resolving twice yields the same configuration.
pub fn resolve(
    defaults: &GlobalDefaults,
    scene: &Scene,
    level: &Level,
    mode: LevelMode,
    case_index: usize,
) -> EffectiveConfiguration {
    let mut config = EffectiveConfiguration::cleared(defaults, mode, case_index);
    apply_scene(&mut config, scene.scene_settings.as_ref());
    if let Some(settings) = &level.level_settings {
        apply_level(&mut config, settings);
    }
    let (precode, step_time) = match mode {
        LevelMode::Case => {
            let settings = level
                .cases
                .get(case_index)
                .and_then(|case| case.case_settings.as_ref());
            match settings {
                Some(settings) => (settings.precode.as_deref(), settings.walker_step_time),
                None => return config,
            }
        }
        LevelMode::Sandbox => {
            let settings = level
                .sandbox
                .as_ref()
                .and_then(|sandbox| sandbox.sandbox_settings.as_ref());
            match settings {
                Some(settings) => (settings.precode.as_deref(), settings.walker_step_time),
                None => return config,
            }
        }
    };
    apply_override(&mut config, precode, step_time);
    config
}

fn apply_scene(config: &mut EffectiveConfiguration, settings: Option<&SceneSettings>) {
    // Without scene settings the theme stays at the global default.
    let Some(settings) = settings else {
        return;
    };
    if settings.walker_step_time > 0.0 {
        config.walker_step_time = settings.walker_step_time;
    }
    config.theme = Theme::from_light_flag(settings.game_window_ui_light_theme);
    if let Some(functions) = &settings.available_functions {
        config.available_functions = functions.clone();
    }
}

fn apply_level(config: &mut EffectiveConfiguration, settings: &LevelSettings) {
    if let Some(precode) = non_empty(settings.precode.as_deref()) {
        config.precode = precode.to_string();
    }
    if let Some(start_code) = non_empty(settings.start_code.as_deref()) {
        config.start_code.push_str(start_code);
    }
    config.task_description = settings
        .task_description
        .clone()
        .unwrap_or_else(TaskDescription::default);
    if settings.row_limit > 0 {
        config.row_limit = u32::try_from(settings.row_limit).unwrap_or(u32::MAX);
    }
    if let Some(functions) = &settings.available_functions {
        config.available_functions.extend(functions.iter().cloned());
    }
}

fn apply_override(config: &mut EffectiveConfiguration, precode: Option<&str>, step_time: f64) {
    if let Some(precode) = non_empty(precode) {
        config.precode = precode.to_string();
    }
    if step_time > 0.0 {
        config.walker_step_time = step_time;
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|text| !text.is_empty())
}

#[cfg(test)]
mod cascade_tests {
    use super::*;
    use pm_core::{Case, CaseSettings, Sandbox, SandboxSettings};

    fn scene_with(settings: SceneSettings) -> Scene {
        Scene {
            name: "intro".to_string(),
            scene_settings: Some(settings),
            levels: Vec::new(),
        }
    }

    fn level_with(settings: LevelSettings) -> Level {
        Level {
            id: "L1".to_string(),
            level_settings: Some(settings),
            ..Level::default()
        }
    }

    fn names(list: &[&str]) -> Option<Vec<String>> {
        Some(list.iter().map(|name| (*name).to_string()).collect())
    }

    #[test]
    fn empty_layers_leave_the_defaults() {
        let config = resolve(
            &GlobalDefaults::default(),
            &Scene::default(),
            &Level::default(),
            LevelMode::Case,
            0,
        );
        assert_eq!(
            config,
            EffectiveConfiguration::cleared(&GlobalDefaults::default(), LevelMode::Case, 0)
        );
    }

    #[test]
    fn scene_list_is_replaced_and_level_list_appended() {
        let scene = scene_with(SceneSettings {
            available_functions: names(&["A", "B"]),
            ..SceneSettings::default()
        });
        let level = level_with(LevelSettings {
            available_functions: names(&["C"]),
            ..LevelSettings::default()
        });
        let config = resolve(&GlobalDefaults::default(), &scene, &level, LevelMode::Case, 0);
        assert_eq!(config.available_functions, vec!["A", "B", "C"]);
    }

    #[test]
    fn level_without_settings_keeps_scene_values() {
        let scene = scene_with(SceneSettings {
            walker_step_time: 0.8,
            game_window_ui_light_theme: true,
            available_functions: names(&["A"]),
        });
        let config = resolve(
            &GlobalDefaults::default(),
            &scene,
            &Level::default(),
            LevelMode::Case,
            0,
        );
        assert_eq!(config.walker_step_time, 0.8);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.available_functions, vec!["A"]);
        assert_eq!(config.task_description, TaskDescription::default());
    }

    #[test]
    fn zero_and_empty_values_do_not_overwrite() {
        let defaults = GlobalDefaults {
            walker_step_time: 0.5,
            row_limit: 40,
            theme: Theme::Light,
        };
        let scene = scene_with(SceneSettings::default());
        let level = level_with(LevelSettings {
            precode: Some(String::new()),
            row_limit: 0,
            ..LevelSettings::default()
        });
        let config = resolve(&defaults, &scene, &level, LevelMode::Case, 0);
        assert_eq!(config.walker_step_time, 0.5);
        assert_eq!(config.row_limit, 40);
        assert_eq!(config.theme, Theme::Dark);
        assert!(config.precode.is_empty());
    }

    #[test]
    fn level_settings_fill_text_fields() {
        let level = level_with(LevelSettings {
            precode: Some("x = 1".to_string()),
            start_code: Some("print(x)".to_string()),
            task_description: Some(TaskDescription::new("Uppgift", "Skriv ut x")),
            row_limit: 7,
            available_functions: None,
        });
        let config = resolve(
            &GlobalDefaults::default(),
            &Scene::default(),
            &level,
            LevelMode::Case,
            0,
        );
        assert_eq!(config.precode, "x = 1");
        assert_eq!(config.start_code, "print(x)");
        assert_eq!(config.task_description, TaskDescription::new("Uppgift", "Skriv ut x"));
        assert_eq!(config.row_limit, 7);
    }

    #[test]
    fn case_settings_override_level_and_scene() {
        let scene = scene_with(SceneSettings {
            walker_step_time: 0.8,
            ..SceneSettings::default()
        });
        let mut level = level_with(LevelSettings {
            precode: Some("level".to_string()),
            ..LevelSettings::default()
        });
        level.cases = vec![
            Case::default(),
            Case {
                case_settings: Some(CaseSettings {
                    precode: Some("case".to_string()),
                    walker_step_time: 0.1,
                }),
            },
        ];

        let first = resolve(&GlobalDefaults::default(), &scene, &level, LevelMode::Case, 0);
        assert_eq!(first.precode, "level");
        assert_eq!(first.walker_step_time, 0.8);

        let second = resolve(&GlobalDefaults::default(), &scene, &level, LevelMode::Case, 1);
        assert_eq!(second.precode, "case");
        assert_eq!(second.walker_step_time, 0.1);
        assert_eq!(second.case_index, 1);
    }

    #[test]
    fn sandbox_settings_apply_only_in_sandbox_mode() {
        let mut level = level_with(LevelSettings {
            precode: Some("level".to_string()),
            ..LevelSettings::default()
        });
        level.sandbox = Some(Sandbox {
            sandbox_settings: Some(SandboxSettings {
                precode: Some("sandbox".to_string()),
                walker_step_time: 0.0,
            }),
        });

        let sandbox = resolve(
            &GlobalDefaults::default(),
            &Scene::default(),
            &level,
            LevelMode::Sandbox,
            0,
        );
        assert_eq!(sandbox.precode, "sandbox");
        assert_eq!(sandbox.mode, LevelMode::Sandbox);

        let case = resolve(
            &GlobalDefaults::default(),
            &Scene::default(),
            &level,
            LevelMode::Case,
            0,
        );
        assert_eq!(case.precode, "level");
    }

    #[test]
    fn missing_case_is_skipped() {
        let level = level_with(LevelSettings {
            precode: Some("level".to_string()),
            ..LevelSettings::default()
        });
        let config = resolve(
            &GlobalDefaults::default(),
            &Scene::default(),
            &level,
            LevelMode::Case,
            4,
        );
        assert_eq!(config.precode, "level");
    }

    #[test]
    fn resolving_twice_gives_the_same_configuration() {
        let scene = scene_with(SceneSettings {
            available_functions: names(&["A"]),
            ..SceneSettings::default()
        });
        let level = level_with(LevelSettings {
            start_code: Some("go()".to_string()),
            available_functions: names(&["B"]),
            ..LevelSettings::default()
        });
        let first = resolve(&GlobalDefaults::default(), &scene, &level, LevelMode::Case, 0);
        let second = resolve(&GlobalDefaults::default(), &scene, &level, LevelMode::Case, 0);
        assert_eq!(first, second);
        assert_eq!(second.start_code, "go()");
        assert_eq!(second.available_functions, vec!["A", "B"]);
    }
}
