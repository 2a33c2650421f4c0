//! OCI Identity
//!
//! Compartment listing.

use super::client::build_url;
use super::http::OciHttpClient;
use crate::error::Result;
use serde::Deserialize;
use url::Url;

/// Page size used for list calls
pub const LIST_LIMIT: &str = "50";

/// Compartment information
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compartment {
    pub id: String,
    pub name: String,
    /// Parent compartment
    #[serde(default)]
    pub compartment_id: Option<String>,
    #[serde(default)]
    pub lifecycle_state: Option<String>,
}

/// Identity API client, used to search for compartments
#[derive(Clone, Debug)]
pub struct IdentityClient {
    http: OciHttpClient,
    base: Url,
}

impl IdentityClient {
    pub fn new(http: OciHttpClient, base: Url) -> Self {
        Self { http, base }
    }

    /// List every compartment in the tenancy, nested ones included
    pub async fn list_compartments(&self, tenancy: &str) -> Result<Vec<Compartment>> {
        let url = build_url(
            &self.base,
            &["compartments"],
            &[
                ("compartmentId", tenancy),
                ("compartmentIdInSubtree", "true"),
                ("limit", LIST_LIMIT),
            ],
        )?;

        let compartments: Vec<Compartment> = self.http.get_all(url).await?;
        tracing::info!("Loaded {} compartments", compartments.len());
        Ok(compartments)
    }
}
