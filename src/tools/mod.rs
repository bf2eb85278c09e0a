//! Tool surface: catalog metadata and the registry the protocol layer calls.

pub mod catalog;
pub mod registry;

pub use catalog::{ParamDef, ParamType, ToolCatalog, ToolEntry};
pub use registry::ToolRegistry;
