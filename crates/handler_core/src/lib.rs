//! Runtime resolution and handler descriptors for custom-resource providers.
//!
//! This crate owns the deterministic part of binding a handler to a runtime:
//! parsing runtime identifiers, ordering them, and picking the latest
//! compatible one. Code loading is reached only through [`handler::CodeLoader`];
//! the filesystem implementation lives in `handler_asset`.

pub mod catalog;
pub mod contract;
pub mod error;
pub mod handler;
pub mod resolver;
pub mod runtime;

pub use catalog::{RuntimeCatalog, RuntimeRegistry};
pub use error::{CatalogError, CodeLoadError, HandlerError, RuntimeError};
pub use handler::{CodeLoader, CodeReference, HandlerDescriptor, HandlerProps};
pub use resolver::{determine_latest_runtime, determine_latest_runtime_from_names};
pub use runtime::{RuntimeIdentifier, RuntimeVersion};
