//! OCI Functions
//!
//! Application and function listing through the management API, and the
//! per-function invocation client.

use super::client::build_url;
use super::http::{OciHttpClient, RequestBody};
use super::identity::LIST_LIMIT;
use crate::error::{Error, Result};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub display_name: String,
    pub compartment_id: String,
    #[serde(default)]
    pub lifecycle_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub id: String,
    pub display_name: String,
    pub application_id: String,
    pub invoke_endpoint: String,
    #[serde(default)]
    pub lifecycle_state: Option<String>,
}

/// What a function answered
#[derive(Debug, Clone)]
pub struct InvocationResult {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub data: Vec<u8>,
}

/// Functions management API client, used to search for applications and functions
#[derive(Clone, Debug)]
pub struct FunctionsManagementClient {
    http: OciHttpClient,
    base: Url,
}

impl FunctionsManagementClient {
    pub fn new(http: OciHttpClient, base: Url) -> Self {
        Self { http, base }
    }

    /// List the applications of a compartment
    pub async fn list_applications(&self, compartment_id: &str) -> Result<Vec<Application>> {
        let url = build_url(
            &self.base,
            &["applications"],
            &[("compartmentId", compartment_id), ("limit", LIST_LIMIT)],
        )?;

        let applications: Vec<Application> = self.http.get_all(url).await?;
        tracing::info!(
            "Loaded {} applications in {}",
            applications.len(),
            compartment_id
        );
        Ok(applications)
    }

    /// List the functions of an application
    pub async fn list_functions(&self, application_id: &str) -> Result<Vec<Function>> {
        let url = build_url(
            &self.base,
            &["functions"],
            &[("applicationId", application_id), ("limit", LIST_LIMIT)],
        )?;

        let functions: Vec<Function> = self.http.get_all(url).await?;
        tracing::info!("Loaded {} functions in {}", functions.len(), application_id);
        Ok(functions)
    }
}

/// Invocation client; each function has its own endpoint
#[derive(Clone, Debug)]
pub struct FunctionsInvokeClient {
    http: OciHttpClient,
    base: Url,
}

impl FunctionsInvokeClient {
    pub fn new(http: OciHttpClient, base: Url) -> Self {
        Self { http, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Invoke a function synchronously, once
    ///
    /// The body is sent as is and is not covered by the signature. A failure
    /// status is returned as [`Error::Invocation`] with the response body.
    pub async fn invoke_function(&self, function_id: &str, payload: Vec<u8>) -> Result<InvocationResult> {
        let url = build_url(&self.base, &["functions", function_id, "actions", "invoke"], &[])?;

        tracing::info!("Invoking {} with {} byte payload", function_id, payload.len());

        let body = RequestBody {
            bytes: payload,
            content_type: "application/octet-stream",
            sign_body: false,
        };
        let response = self
            .http
            .send(Method::POST, url, Some(body), &[("fn-invoke-type", "sync")])
            .await?;

        if !response.status.is_success() {
            tracing::error!(
                "Invocation of {} failed with status {}",
                function_id,
                response.status
            );
            return Err(Error::Invocation {
                status: response.status.as_u16(),
                body: response.body,
            });
        }

        Ok(InvocationResult {
            status: response.status,
            content_type: response.content_type(),
            request_id: response.request_id(),
            data: response.body,
        })
    }
}
