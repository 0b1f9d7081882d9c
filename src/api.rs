use reqwest::blocking::Client;
use serde::Serialize;
use thiserror::Error;

use crate::session::SessionPlan;

/// Backend origin used when no server flag is given
pub const DEFAULT_SERVER: &str = "http://localhost:8000";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("backend request failed with status {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Validated setup input, sent verbatim as the session request body
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSettings {
    pub category: String,
    pub count: u32,
    pub duration: u32,
}

/// Blocking client for the practice backend
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(server: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: server.trim_end_matches('/').to_string(),
        }
    }

    pub fn categories(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/api/categories", self.base_url);
        let response = self.client.get(url).send()?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        Ok(response.json()?)
    }

    pub fn start_session(&self, settings: &SessionSettings) -> Result<SessionPlan, ApiError> {
        let url = format!("{}/api/session", self.base_url);
        let response = self.client.post(url).json(settings).send()?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        Ok(response.json()?)
    }

    /// Resolve an opaque image path against the backend origin
    pub fn image_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub fn fetch_image(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.client.get(self.image_url(path)).send()?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        Ok(response.bytes()?.to_vec())
    }
}
