//! Minimal REST client for the grading service.

use reqwest::{Url, header};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::Exercise;
use crate::prelude::*;

const AUTH_HEADER_PREFIX: &str = "Bearer ";

/// HTTP client for the few REST calls the results view needs.
pub struct ApiClient {
    url: Url,
    client: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for `url`, authenticating with `token` when given.
    pub fn new(url: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = token {
            let value = header::HeaderValue::from_str(&format!("{AUTH_HEADER_PREFIX}{token}"))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()?;
        let mut url = Url::parse(url)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self { url, client })
    }

    /// Resolves an endpoint or file reference against the base URL.
    pub fn path(&self, endpoint: &str) -> Result<Url> {
        Ok(self.url.join(endpoint.trim_start_matches('/'))?)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.path(endpoint)?;
        debug!("GET {url}");
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    pub async fn fetch_exercise(&self, exercise_id: i64) -> Result<Exercise> {
        self.get(&format!("api/exercise/{exercise_id}/")).await
    }

    /// Downloads a submitted file for the code preview.
    pub async fn fetch_file(&self, file: &str) -> Result<String> {
        let url = self.path(file)?;
        debug!("GET {url}");
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }
}
