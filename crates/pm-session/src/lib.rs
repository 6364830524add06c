//! Scene and level navigation, the settings cascade and the session controller that
//! ties them to the compiler session.

mod answer;
mod cascade;
mod case_handler;
mod guide;
mod host;
mod navigation;
mod session;

pub use answer::LevelAnswer;
pub use cascade::resolve;
pub use case_handler::CaseHandler;
pub use guide::{GuideStep, GuideTarget, LevelGuide};
pub use host::{GameUi, SceneHost};
pub use navigation::{active_level, find_level, find_scene, resolve_build_target, BuildTarget};
pub use session::{Session, SessionOptions, NO_ANSWER_MESSAGE};

#[cfg(test)]
use host::host_test_support;
