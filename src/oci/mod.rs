//! OCI API interaction module
//!
//! Thin bindings for the three Oracle Cloud Infrastructure services this tool
//! talks to: Identity, Functions management and Functions invoke.
//!
//! # Module Structure
//!
//! - [`auth`] - API signing key loading and HTTP request signing
//! - [`client`] - Endpoint construction and the per-run client set
//! - [`http`] - Signed HTTP transport and pagination
//! - [`identity`] - Compartment listing
//! - [`region`] - Region short keys and realm domains
//! - [`functions`] - Application and function listing, function invocation
//!
//! # Example
//!
//! ```ignore
//! use ocifn::config::ConfigSource;
//! use ocifn::oci::client::OciClients;
//!
//! async fn example() -> ocifn::Result<()> {
//!     let config = ConfigSource::from_env(None, None).load()?;
//!     let clients = OciClients::new(&config)?;
//!     let compartments = clients.identity.list_compartments(&clients.tenancy).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod functions;
pub mod http;
pub mod identity;
pub mod region;
