use std::sync::OnceLock;

use pm_core::{GuideBubble, PmError};
use regex::Regex;

fn line_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+$").expect("line number regex must compile"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideTarget {
    /// A line of the learner's code, 1-based as authored.
    Line(u32),
    /// A named element of the game window.
    Element(String),
}

impl GuideTarget {
    fn parse(raw: &str) -> Self {
        if line_number_pattern().is_match(raw) {
            if let Ok(line) = raw.parse() {
                return Self::Line(line);
            }
        }
        Self::Element(raw.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideStep {
    pub target: GuideTarget,
    pub text: String,
}

/// The ordered guide bubbles of one level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelGuide {
    steps: Vec<GuideStep>,
}

impl LevelGuide {
    pub fn build(bubbles: &[GuideBubble], level_index: usize) -> Result<Self, PmError> {
        let steps = bubbles
            .iter()
            .map(|bubble| {
                let target = bubble.target.as_deref().filter(|t| !t.trim().is_empty());
                let text = bubble.text.as_deref().filter(|t| !t.is_empty());
                match (target, text) {
                    (Some(target), Some(text)) => Ok(GuideStep {
                        target: GuideTarget::parse(target.trim()),
                        text: text.to_string(),
                    }),
                    _ => Err(PmError::InvalidGuide { level_index }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[GuideStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
