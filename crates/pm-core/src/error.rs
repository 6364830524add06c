use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Scene,
    Level,
}

impl EntityKind {
    fn key_label(self) -> &'static str {
        match self {
            Self::Scene => "name",
            Self::Level => "id",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scene => f.write_str("scene"),
            Self::Level => f.write_str("level"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PmError {
    #[error("There is no {kind} with {} \"{key}\".", .kind.key_label())]
    NotFound { kind: EntityKind, key: String },
    #[error("There is more than one {kind} with {} \"{key}\".", .kind.key_label())]
    Ambiguous { kind: EntityKind, key: String },
    #[error("Scene with name \"{0}\" exists but is not registered with the host.")]
    UnboundScene(String),
    #[error("Error when trying to read available functions. Function name: \"{0}\" could not be found.")]
    UnknownFunction(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
    #[error("Precondition failed: {0}")]
    Precondition(String),
    #[error("A guide bubble for level with index {level_index} is missing target or text.")]
    InvalidGuide { level_index: usize },
    #[error("Function table error: {0}")]
    FunctionTable(String),
    #[error("Function \"{name}\" failed: {message}")]
    FunctionCall { name: String, message: String },
    #[error("Invalid game definition: {0}")]
    Definition(String),
}

impl PmError {
    pub fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn ambiguous(kind: EntityKind, key: impl Into<String>) -> Self {
        Self::Ambiguous {
            kind,
            key: key.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }

    pub fn function_call(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FunctionCall {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code, printed by the CLI as `ERROR_CODE:`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound {
                kind: EntityKind::Scene,
                ..
            } => "NAV_SCENE_NOT_FOUND",
            Self::NotFound {
                kind: EntityKind::Level,
                ..
            } => "NAV_LEVEL_NOT_FOUND",
            Self::Ambiguous {
                kind: EntityKind::Scene,
                ..
            } => "NAV_SCENE_AMBIGUOUS",
            Self::Ambiguous {
                kind: EntityKind::Level,
                ..
            } => "NAV_LEVEL_AMBIGUOUS",
            Self::UnboundScene(_) => "NAV_SCENE_UNBOUND",
            Self::UnknownFunction(_) => "FUNCTION_UNKNOWN",
            Self::Runtime(_) => "COMPILER_RUNTIME",
            Self::Precondition(_) => "SESSION_PRECONDITION",
            Self::InvalidGuide { .. } => "LEVEL_GUIDE_INVALID",
            Self::FunctionTable(_) => "FUNCTION_TABLE",
            Self::FunctionCall { .. } => "FUNCTION_CALL",
            Self::Definition(_) => "DEFINITION_INVALID",
        }
    }
}
