//! Client seams to the two asynchronous boundaries: the catalog fetch and the
//! print-document request.
//!
//! Neither call is retried; recovery is always user-initiated.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::models::{GridSizeTier, SelectedEntry};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("invalid catalog payload: {0}")]
    Catalog(#[from] CatalogError),
}

/// Body of `POST /print`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    pub selected_chars: Vec<SelectedEntry>,
    pub grid_size: GridSizeTier,
    pub use_animals: bool,
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Catalog, ClientError>;
}

#[async_trait]
pub trait PrintService: Send + Sync {
    /// Returns the rendered HTML document.
    async fn render(&self, request: &PrintRequest) -> Result<String, ClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for a running practice-sheet server.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        warn!("Server returned {}: {}", status, message);
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn fetch_catalog(&self) -> Result<Catalog, ClientError> {
        let response = self
            .client
            .get(self.url("/api/chars"))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let body = Self::ensure_success(response).await?.text().await?;

        let values: Vec<String> = serde_json::from_str(&body).map_err(CatalogError::from)?;
        let catalog = Catalog::from_strings(&values)?;
        debug!("Fetched catalog with {} characters", catalog.len());
        Ok(catalog)
    }
}

#[async_trait]
impl PrintService for ApiClient {
    async fn render(&self, request: &PrintRequest) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.url("/print"))
            .json(request)
            .send()
            .await?;
        let html = Self::ensure_success(response).await?.text().await?;
        debug!("Received print document ({} bytes)", html.len());
        Ok(html)
    }
}
