//! OCI Client
//!
//! Builds the service clients once per run from a config profile and hands
//! out per-function invocation clients.

use super::auth::RequestSigner;
use super::functions::{FunctionsInvokeClient, FunctionsManagementClient};
use super::http::OciHttpClient;
use super::identity::IdentityClient;
use super::region::Region;
use crate::config::OciConfig;
use crate::error::{Result, TransportError};
use url::Url;

pub const IDENTITY_API_VERSION: &str = "20160918";
pub const FUNCTIONS_API_VERSION: &str = "20181201";

/// Base URLs of the services used by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub identity: Url,
    pub functions: Url,
}

impl Endpoints {
    /// Public endpoints for a region, e.g. `us-phoenix-1` or `phx`
    pub fn for_region(region: &str) -> Result<Self> {
        let region = Region::parse(region);
        Ok(Self {
            identity: parse_endpoint(&format!(
                "https://{}/{IDENTITY_API_VERSION}",
                region.service_host("identity")
            ))?,
            functions: parse_endpoint(&format!(
                "https://{}/{FUNCTIONS_API_VERSION}",
                region.service_host("functions")
            ))?,
        })
    }

    /// Endpoints rooted at an arbitrary host, used against local mocks
    pub fn with_base(base: &str) -> Result<Self> {
        let base = base.trim_end_matches('/');
        Ok(Self {
            identity: parse_endpoint(&format!("{base}/{IDENTITY_API_VERSION}"))?,
            functions: parse_endpoint(&format!("{base}/{FUNCTIONS_API_VERSION}"))?,
        })
    }
}

/// Clients shared by every step of a run
#[derive(Clone, Debug)]
pub struct OciClients {
    pub tenancy: String,
    pub identity: IdentityClient,
    pub functions: FunctionsManagementClient,
    http: OciHttpClient,
}

impl OciClients {
    /// Create clients for the profile's region
    pub fn new(config: &OciConfig) -> Result<Self> {
        let signer = RequestSigner::from_config(config)?;
        let endpoints = Endpoints::for_region(&config.region)?;
        Self::with_endpoints(&config.tenancy, signer, endpoints)
    }

    pub fn with_endpoints(tenancy: &str, signer: RequestSigner, endpoints: Endpoints) -> Result<Self> {
        tracing::info!(
            "Using identity endpoint {} and functions endpoint {}",
            endpoints.identity,
            endpoints.functions
        );

        tracing::debug!("Signing requests with key {}", signer.key_id());

        let http = OciHttpClient::new(signer)?;

        Ok(Self {
            tenancy: tenancy.to_string(),
            identity: IdentityClient::new(http.clone(), endpoints.identity),
            functions: FunctionsManagementClient::new(http.clone(), endpoints.functions),
            http,
        })
    }

    /// Invocation client bound to one function's `invokeEndpoint`
    pub fn invoke_client(&self, invoke_endpoint: &str) -> Result<FunctionsInvokeClient> {
        let base = parse_endpoint(&format!(
            "{}/{FUNCTIONS_API_VERSION}",
            invoke_endpoint.trim_end_matches('/')
        ))?;
        Ok(FunctionsInvokeClient::new(self.http.clone(), base))
    }
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|_| TransportError::Endpoint(raw.to_string()))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(TransportError::Endpoint(raw.to_string()).into());
    }
    Ok(url)
}

/// Append path segments and query parameters to a service base URL
pub fn build_url(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| TransportError::Endpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}
