pub mod config;
pub mod error;
pub mod model;
pub mod value;

pub use config::*;
pub use error::{EntityKind, PmError};
pub use model::*;
pub use value::*;
