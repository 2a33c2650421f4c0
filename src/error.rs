//! Error taxonomy
//!
//! Every failure the resolver and invoker can produce. The binary converts
//! these into the single-line `An error occurred: ...` report.

use std::fmt;
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Kind of resource a name failed to resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Compartment,
    Application,
    Function,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Compartment => "compartment",
            ResourceKind::Application => "application",
            ResourceKind::Function => "function",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Config file missing or unusable; nothing can proceed.
    #[error("{message} ({})", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Could not find {kind} {name}")]
    NotFound { kind: ResourceKind, name: String },

    /// An OCI API call failed before producing a usable response.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The function was reached but answered with a failure status.
    #[error("Function invocation failed with status {status}: {}", body_preview(.body))]
    Invocation { status: u16, body: Vec<u8> },
}

impl Error {
    pub(crate) fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(kind: ResourceKind, name: &str) -> Self {
        Error::NotFound {
            kind,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{}", service_message(.status, .code, .message, .request_id))]
    Status {
        status: u16,
        code: Option<String>,
        message: Option<String>,
        request_id: Option<String>,
    },

    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The service handed back a page token it already returned.
    #[error("Pagination of {url} repeated page token {token}")]
    Pagination { url: String, token: String },

    #[error("Invalid endpoint {0}")]
    Endpoint(String),

    #[error("Failed to sign request: {0}")]
    Signing(String),
}

fn service_message(
    status: &u16,
    code: &Option<String>,
    message: &Option<String>,
    request_id: &Option<String>,
) -> String {
    let mut out = format!("API request failed: {status}");
    if let Some(code) = code {
        out.push_str(&format!(" {code}"));
    }
    if let Some(message) = message {
        out.push_str(&format!(" - {message}"));
    }
    if let Some(request_id) = request_id {
        out.push_str(&format!(" (opc-request-id: {request_id})"));
    }
    out
}

fn body_preview(body: &[u8]) -> String {
    if body.is_empty() {
        return "<empty body>".to_string();
    }
    String::from_utf8_lossy(body).trim_end().to_string()
}
