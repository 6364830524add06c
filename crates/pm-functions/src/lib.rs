mod builtins;
mod descriptor;
mod table;

pub use builtins::{builtin_descriptors, BUILTIN_FUNCTION_NAMES};
pub use descriptor::{Arity, FunctionDescriptor, FunctionRegistry, HostFunction};
pub use table::{FunctionFactory, FunctionTable};
