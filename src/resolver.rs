//! Resource Resolver
//!
//! Turns a compartment / application / function name path into the function
//! to invoke, then invokes it.
//!
//! Names are assumed unique within their parent. When they are not, the
//! first entry in listing order wins; duplicates are ignored, not reported.

use crate::error::{Error, ResourceKind, Result};
use crate::oci::client::OciClients;
use crate::oci::functions::{Application, Function, InvocationResult};
use crate::oci::identity::Compartment;
use tokio::sync::OnceCell;

/// Anything a name lookup can select
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Compartment {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Application {
    fn name(&self) -> &str {
        &self.display_name
    }
}

impl Named for Function {
    fn name(&self) -> &str {
        &self.display_name
    }
}

/// First item whose name equals `name` exactly
pub fn first_match<'a, T: Named>(items: &'a [T], name: &str) -> Option<&'a T> {
    items.iter().find(|item| item.name() == name)
}

fn select<T: Named + Clone>(items: &[T], name: &str, kind: ResourceKind) -> Result<T> {
    let matches = items.iter().filter(|item| item.name() == name).count();
    if matches > 1 {
        tracing::warn!("{} {} is ambiguous ({} matches), using the first", kind, name, matches);
    }

    first_match(items, name)
        .cloned()
        .ok_or_else(|| Error::not_found(kind, name))
}

/// Name path of the function to invoke
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionPath {
    pub compartment: String,
    pub application: String,
    pub function: String,
}

/// Resolver and invoker for one run
pub struct FunctionResolver {
    clients: OciClients,
    compartments: OnceCell<Vec<Compartment>>,
}

impl FunctionResolver {
    pub fn new(clients: OciClients) -> Self {
        Self {
            clients,
            compartments: OnceCell::new(),
        }
    }

    /// Every compartment in the tenancy, fetched once per run
    pub async fn list_compartments(&self) -> Result<&[Compartment]> {
        let compartments = self
            .compartments
            .get_or_try_init(|| self.clients.identity.list_compartments(&self.clients.tenancy))
            .await?;
        Ok(compartments)
    }

    pub async fn resolve_compartment(&self, name: &str) -> Result<Compartment> {
        let compartments = self.list_compartments().await?;
        let compartment = select(compartments, name, ResourceKind::Compartment)?;
        tracing::debug!("Compartment {} is {}", name, compartment.id);
        Ok(compartment)
    }

    pub async fn resolve_application(&self, name: &str, compartment: &Compartment) -> Result<Application> {
        let applications = self.clients.functions.list_applications(&compartment.id).await?;
        let application = select(&applications, name, ResourceKind::Application)?;
        tracing::debug!("Application {} is {}", name, application.id);
        Ok(application)
    }

    pub async fn resolve_function(&self, name: &str, application: &Application) -> Result<Function> {
        let functions = self.clients.functions.list_functions(&application.id).await?;
        let function = select(&functions, name, ResourceKind::Function)?;
        tracing::debug!("Function {} is {}", name, function.id);
        Ok(function)
    }

    /// Resolve the whole path, stopping at the first step that fails
    pub async fn resolve(&self, path: &FunctionPath) -> Result<Function> {
        let compartment = self.resolve_compartment(&path.compartment).await?;
        let application = self.resolve_application(&path.application, &compartment).await?;
        self.resolve_function(&path.function, &application).await
    }

    /// Send `payload` to the function's own invoke endpoint
    pub async fn invoke(&self, function: &Function, payload: Vec<u8>) -> Result<InvocationResult> {
        let client = self.clients.invoke_client(&function.invoke_endpoint)?;
        tracing::debug!("Invoke endpoint for {} is {}", function.display_name, client.base());
        client.invoke_function(&function.id, payload).await
    }

    pub async fn resolve_and_invoke(&self, path: &FunctionPath, payload: Vec<u8>) -> Result<InvocationResult> {
        let function = self.resolve(path).await?;
        self.invoke(&function, payload).await
    }
}
