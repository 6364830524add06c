use std::fmt;
use std::sync::Arc;

use pm_core::{PmError, PmValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(count: usize) -> Self {
        Self {
            min: count,
            max: Some(count),
        }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map(|max| count <= max).unwrap_or(true)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", self.min),
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{} or more", self.min),
        }
    }
}

/// A function implementation that learner code may call.
pub trait HostFunction: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;
    fn arity(&self) -> Arity;
    fn call(&self, args: &[PmValue]) -> Result<PmValue, PmError>;
}

/// A resolved function: the authored type name plus the implementation it produced.
///
/// Two descriptors are equal when they expose the same function name from the same
/// type, which is what the registry de-duplicates on.
#[derive(Clone)]
pub struct FunctionDescriptor {
    type_name: String,
    function: Arc<dyn HostFunction>,
}

impl FunctionDescriptor {
    pub fn new(type_name: impl Into<String>, function: Arc<dyn HostFunction>) -> Self {
        Self {
            type_name: type_name.into(),
            function,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn name(&self) -> &str {
        self.function.name()
    }

    pub fn arity(&self) -> Arity {
        self.function.arity()
    }

    pub fn call(&self, args: &[PmValue]) -> Result<PmValue, PmError> {
        let arity = self.arity();
        if !arity.accepts(args.len()) {
            return Err(PmError::function_call(
                self.name(),
                format!("expected {} argument(s), got {}", arity, args.len()),
            ));
        }
        self.function.call(args)
    }
}

impl PartialEq for FunctionDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.name() == other.name()
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("type_name", &self.type_name)
            .field("name", &self.name())
            .field("arity", &self.arity())
            .finish()
    }
}

/// Ordered, duplicate-free set of functions handed to the walker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionRegistry {
    functions: Vec<FunctionDescriptor>,
}

impl FunctionRegistry {
    pub(crate) fn push_unique(&mut self, descriptor: FunctionDescriptor) -> bool {
        if self.functions.contains(&descriptor) {
            return false;
        }
        self.functions.push(descriptor);
        true
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.functions.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions
            .iter()
            .find(|descriptor| descriptor.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions
            .iter()
            .map(|descriptor| descriptor.name())
            .collect()
    }
}
