use pm_core::{Level, PmError};

/// Which case of the current level is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseHandler {
    case_count: usize,
    current: usize,
}

impl CaseHandler {
    pub fn new(case_count: usize) -> Self {
        Self {
            case_count,
            current: 0,
        }
    }

    /// A level with cases gets one entry per case, a level with neither cases nor a
    /// sandbox runs as a single implicit case, and a sandbox-only level has none.
    pub fn for_level(level: &Level) -> Option<Self> {
        if level.has_cases() {
            Some(Self::new(level.cases.len()))
        } else if level.has_sandbox() {
            None
        } else {
            Some(Self::new(1))
        }
    }

    pub fn case_count(&self) -> usize {
        self.case_count
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn select(&mut self, case_number: usize) -> Result<(), PmError> {
        if case_number >= self.case_count {
            return Err(PmError::precondition(format!(
                "case {} is out of range ({} cases)",
                case_number, self.case_count
            )));
        }
        self.current = case_number;
        Ok(())
    }
}
