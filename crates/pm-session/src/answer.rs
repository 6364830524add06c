use pm_core::PmValue;

/// Answer bookkeeping for the level being played.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelAnswer {
    expects_answer: bool,
    answer: Option<PmValue>,
    compiler_has_been_stopped: bool,
}

impl LevelAnswer {
    pub fn expecting(expects_answer: bool) -> Self {
        Self {
            expects_answer,
            ..Self::default()
        }
    }

    pub fn expects_answer(&self) -> bool {
        self.expects_answer
    }

    pub fn set_expects_answer(&mut self, expects_answer: bool) {
        self.expects_answer = expects_answer;
    }

    pub fn answer(&self) -> Option<&PmValue> {
        self.answer.as_ref()
    }

    pub fn submit(&mut self, answer: PmValue) {
        self.answer = Some(answer);
    }

    pub fn compiler_has_been_stopped(&self) -> bool {
        self.compiler_has_been_stopped
    }

    pub fn mark_compiler_stopped(&mut self) {
        self.compiler_has_been_stopped = true;
    }

    /// A finished run left the learner's answer missing.
    pub fn is_missing(&self) -> bool {
        self.expects_answer && self.answer.is_none()
    }

    /// Clears per-run state; whether the level expects an answer is kept.
    pub fn reset(&mut self) {
        *self = Self::expecting(self.expects_answer);
    }
}
