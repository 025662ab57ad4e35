use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::{Document, DocumentId, UserId};

pub const MAX_URL_LENGTH: usize = 2048;
pub const DOCUMENTS_OVERVIEW_PATH: &str = "v1/documents_overview";

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointError {
    #[error("invalid endpoint '{url}': {reason}")]
    Invalid { url: String, reason: String },
}

/// Base URL of a deployment, normalized without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeploymentEndpoint {
    base: String,
    host: String,
}

impl DeploymentEndpoint {
    pub fn parse(raw: &str) -> Result<Self, EndpointError> {
        let invalid = |reason: &str| EndpointError::Invalid {
            url: Self::truncate_url(raw),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid("URL cannot be empty"));
        }
        if trimmed.len() > MAX_URL_LENGTH {
            return Err(invalid("URL is too long"));
        }

        let mut parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(invalid(&format!(
                    "invalid scheme '{other}', only 'http' and 'https' are allowed"
                )))
            }
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| invalid("URL must have a host"))?
            .to_lowercase();

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(invalid("credentials in URL are not allowed"));
        }

        parsed.set_query(None);
        parsed.set_fragment(None);

        Ok(Self {
            base: parsed.as_str().trim_end_matches('/').to_string(),
            host,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn documents_overview_url(&self, request: &DocumentsOverviewRequest) -> String {
        let mut url = format!("{}/{DOCUMENTS_OVERVIEW_PATH}", self.base);
        let pairs = request.query_pairs();
        if !pairs.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    fn truncate_url(url: &str) -> String {
        if url.chars().count() <= 100 {
            url.to_string()
        } else {
            let head: String = url.chars().take(100).collect();
            format!("{head}...")
        }
    }
}

/// Both filters are reserved by the list view and sent empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentsOverviewRequest {
    pub document_ids: Vec<DocumentId>,
    pub user_ids: Vec<UserId>,
}

impl DocumentsOverviewRequest {
    fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        self.document_ids
            .iter()
            .map(|id| ("document_ids", id.as_str()))
            .chain(self.user_ids.iter().map(|id| ("user_ids", id.as_str())))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentsOverviewResponse {
    #[serde(default)]
    pub results: Vec<Document>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchError {
    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("HTTP error {status}")]
    Status { status: u16 },

    #[error("response had no body")]
    EmptyBody,
}

/// crux_http reports 4xx and 5xx responses as `Error::Http`, never as an
/// `Ok` response.
impl From<crux_http::Error> for FetchError {
    fn from(e: crux_http::Error) -> Self {
        match e {
            crux_http::Error::Http(e) => Self::Status {
                status: u16::from(e.code),
            },
            other => Self::Transport {
                message: other.to_string(),
            },
        }
    }
}

/// Flattens a crux_http result into the documents or a [`FetchError`].
pub fn into_documents(
    result: crux_http::Result<crux_http::Response<DocumentsOverviewResponse>>,
) -> Result<Vec<Document>, FetchError> {
    let mut response = result?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: u16::from(status),
        });
    }

    response
        .take_body()
        .map(|body| body.results)
        .ok_or(FetchError::EmptyBody)
}
