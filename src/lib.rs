//! Resolve an Oracle Cloud Function by compartment, application and function
//! name, then invoke it.

pub mod config;
pub mod error;
pub mod oci;
pub mod resolver;

pub use error::{Error, ResourceKind, Result, TransportError};
pub use resolver::{FunctionPath, FunctionResolver};
