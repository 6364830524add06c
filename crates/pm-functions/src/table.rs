use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use pm_core::PmError;
use tracing::debug;

use crate::builtins::{
    builtin_descriptors, AbsoluteValue, ConvertToBinary, ConvertToBoolean, ConvertToFloat,
    ConvertToHexadecimal, ConvertToInt, ConvertToString, Extremum, GetTime, LengthOf,
    RoundedValue,
};
use crate::{FunctionDescriptor, FunctionRegistry, HostFunction};

pub type FunctionFactory = Arc<dyn Fn() -> Arc<dyn HostFunction> + Send + Sync>;

fn factory<F>(make: fn() -> F) -> FunctionFactory
where
    F: HostFunction + 'static,
{
    Arc::new(move || -> Arc<dyn HostFunction> { Arc::new(make()) })
}

/// Maps authored type names (as written in `availableFunctions`) to constructors.
///
/// Built once at startup. Registration rejects empty and duplicate type names so that
/// authoring mistakes surface before any level is loaded.
#[derive(Clone)]
pub struct FunctionTable {
    factories: BTreeMap<String, FunctionFactory>,
    builtins: Vec<FunctionDescriptor>,
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTable")
            .field("type_names", &self.factories.keys().collect::<Vec<_>>())
            .field("builtins", &self.builtins)
            .finish()
    }
}

impl FunctionTable {
    pub fn with_builtins() -> Self {
        let mut factories: BTreeMap<String, FunctionFactory> = BTreeMap::new();
        factories.insert("AbsoluteValue".to_string(), factory(|| AbsoluteValue));
        factories.insert("ConvertToBinary".to_string(), factory(|| ConvertToBinary));
        factories.insert("ConvertToBoolean".to_string(), factory(|| ConvertToBoolean));
        factories.insert("ConvertToFloat".to_string(), factory(|| ConvertToFloat));
        factories.insert(
            "ConvertToHexadecimal".to_string(),
            factory(|| ConvertToHexadecimal),
        );
        factories.insert("ConvertToInt".to_string(), factory(ConvertToInt::default));
        factories.insert("ConvertToString".to_string(), factory(|| ConvertToString));
        factories.insert("LengthOf".to_string(), factory(|| LengthOf));
        factories.insert("RoundedValue".to_string(), factory(|| RoundedValue));
        factories.insert("MinimumValue".to_string(), factory(Extremum::min));
        factories.insert("MaximumValue".to_string(), factory(Extremum::max));
        factories.insert("GetTime".to_string(), factory(|| GetTime));

        Self {
            factories,
            builtins: builtin_descriptors(),
        }
    }

    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        factory: FunctionFactory,
    ) -> Result<(), PmError> {
        let type_name = type_name.into();
        if type_name.trim().is_empty() {
            return Err(PmError::FunctionTable(
                "function type name cannot be empty".to_string(),
            ));
        }
        if self.factories.contains_key(&type_name) {
            return Err(PmError::FunctionTable(format!(
                "function type \"{}\" is already registered",
                type_name
            )));
        }
        debug!(type_name = %type_name, "function_type_registered");
        self.factories.insert(type_name, factory);
        Ok(())
    }

    /// Registers a type whose implementation is a `Default` value.
    pub fn register_default<F>(&mut self, type_name: impl Into<String>) -> Result<(), PmError>
    where
        F: HostFunction + Default + 'static,
    {
        self.register(type_name, factory(F::default))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn builtins(&self) -> &[FunctionDescriptor] {
        &self.builtins
    }

    pub fn resolve(&self, type_name: &str) -> Result<FunctionDescriptor, PmError> {
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| PmError::UnknownFunction(type_name.to_string()))?;
        Ok(FunctionDescriptor::new(type_name, factory()))
    }

    /// Builds the registry for one settings application: built-ins first, then every
    /// named function in order. Fails on the first unknown name without returning a
    /// partial registry.
    pub fn build<S: AsRef<str>>(&self, names: &[S]) -> Result<FunctionRegistry, PmError> {
        let mut registry = FunctionRegistry::default();
        for descriptor in &self.builtins {
            registry.push_unique(descriptor.clone());
        }
        for name in names {
            let descriptor = self.resolve(name.as_ref())?;
            if !registry.push_unique(descriptor) {
                debug!(type_name = name.as_ref(), "function_already_present");
            }
        }
        Ok(registry)
    }
}
