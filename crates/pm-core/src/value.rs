use serde::{Deserialize, Serialize};

/// A value passed to or returned from a function exposed to learner code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PmValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<PmValue>),
}

impl PmValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(value) => *value,
            Self::Int(value) => *value != 0,
            Self::Float(value) => *value != 0.0,
            Self::Str(value) => !value.is_empty(),
            Self::List(values) => !values.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
        }
    }
}

impl std::fmt::Display for PmValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(value) => write!(f, "{}", value),
            Self::Float(value) if value.fract() == 0.0 && value.is_finite() => {
                write!(f, "{:.1}", value)
            }
            Self::Float(value) => write!(f, "{}", value),
            Self::Str(value) => f.write_str(value),
            Self::List(values) => {
                f.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn display_matches_learner_facing_spelling() {
        assert_eq!(PmValue::Bool(true).to_string(), "True");
        assert_eq!(PmValue::Float(2.0).to_string(), "2.0");
        assert_eq!(PmValue::Float(2.5).to_string(), "2.5");
        assert_eq!(
            PmValue::List(vec![PmValue::Int(1), PmValue::Str("a".to_string())]).to_string(),
            "[1, a]"
        );
    }

    #[test]
    fn truthiness_follows_emptiness_and_zero() {
        assert!(!PmValue::Int(0).is_truthy());
        assert!(PmValue::Str("x".to_string()).is_truthy());
        assert!(!PmValue::List(Vec::new()).is_truthy());
        assert!(!PmValue::None.is_truthy());
    }
}
