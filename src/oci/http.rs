//! HTTP utilities for OCI REST API calls

use super::auth::{RequestSigner, SignedBody};
use crate::error::{Result, TransportError};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

pub const OPC_REQUEST_ID: &str = "opc-request-id";
pub const OPC_NEXT_PAGE: &str = "opc-next-page";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Error body returned by OCI services
#[derive(Debug, Deserialize)]
struct ServiceError {
    code: Option<String>,
    message: Option<String>,
}

/// Request body and whether it is covered by the signature
#[derive(Debug, Clone)]
pub struct RequestBody {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub sign_body: bool,
}

/// Response with status left for the caller to judge
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }

    pub fn request_id(&self) -> Option<String> {
        self.header(OPC_REQUEST_ID)
    }

    pub fn next_page(&self) -> Option<String> {
        self.header(OPC_NEXT_PAGE).filter(|p| !p.is_empty())
    }

    pub fn content_type(&self) -> Option<String> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Convert a failure status into a transport error carrying the service
    /// error code and message when the body has them
    fn into_status_error(self) -> TransportError {
        let service: Option<ServiceError> = serde_json::from_slice(&self.body).ok();
        let request_id = self.request_id();
        let (code, message) = service
            .map(|s| (s.code, s.message))
            .unwrap_or((None, None));

        TransportError::Status {
            status: self.status.as_u16(),
            code,
            message,
            request_id,
        }
    }
}

/// One page of a list call
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page: Option<String>,
}

/// HTTP client wrapper for signed OCI API calls
#[derive(Clone, Debug)]
pub struct OciHttpClient {
    client: Client,
    signer: RequestSigner,
}

impl OciHttpClient {
    /// Create a new HTTP client
    pub fn new(signer: RequestSigner) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ocifn/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| TransportError::Request {
                url: "<client builder>".to_string(),
                source,
            })?;

        Ok(Self { client, signer })
    }

    /// Send a signed request and return the response without judging its status
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<RequestBody>,
        extra_headers: &[(&'static str, &str)],
    ) -> Result<RawResponse> {
        let request_id = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
        tracing::debug!("{} {} ({}: {})", method, url, OPC_REQUEST_ID, request_id);

        let signed_body = body.as_ref().filter(|b| b.sign_body).map(|b| SignedBody {
            content_type: b.content_type,
            bytes: &b.bytes,
        });
        let auth_headers = self
            .signer
            .sign(&method, &url, signed_body, chrono::Utc::now())?;

        let mut request = self
            .client
            .request(method, url.clone())
            .header(OPC_REQUEST_ID, &request_id);
        for (name, value) in auth_headers {
            request = request.header(name, value);
        }
        for (name, value) in extra_headers {
            request = request.header(*name, *value);
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, body.content_type)
                .body(body.bytes);
        }

        let response = request
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?
            .to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// GET one page of a list endpoint and decode the JSON array body
    pub async fn get_page<T: DeserializeOwned>(&self, url: Url) -> Result<Page<T>> {
        let response = self.send(Method::GET, url.clone(), None, &[]).await?;

        if !response.status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!(
                "API error: {} - {}",
                response.status,
                sanitize_for_log(&String::from_utf8_lossy(&response.body))
            );
            return Err(response.into_status_error().into());
        }

        let items = serde_json::from_slice(&response.body).map_err(|source| {
            TransportError::Decode {
                url: url.to_string(),
                source,
            }
        })?;

        Ok(Page {
            items,
            next_page: response.next_page(),
        })
    }

    /// GET every page of a list endpoint, following `opc-next-page`
    pub async fn get_all<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let mut page_url = url.clone();
            if let Some(token) = &page {
                page_url.query_pairs_mut().append_pair("page", token);
            }

            let result = self.get_page::<T>(page_url).await?;
            all_items.extend(result.items);

            let Some(token) = result.next_page else {
                break;
            };
            if !seen_tokens.insert(token.clone()) {
                return Err(TransportError::Pagination {
                    url: url.to_string(),
                    token,
                }
                .into());
            }
            page = Some(token);
        }

        Ok(all_items)
    }
}
