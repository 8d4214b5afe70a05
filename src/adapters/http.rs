use crate::app::dto::{CreateRequest, CreateResponse};
use crate::domain::ports::ApiClient;
use crate::domain::resource::ResourceId;
use anyhow::{Context as _, Result, anyhow, bail};
use reqwest::Url;
use reqwest::blocking::{Client, Response};

/// Blocking HTTP client for a JSON resource API.
///
/// `create` is `POST {base}{path}` with `{"label"}`, answered by `{"id"}`.
/// `delete` is `DELETE {base}{path}`. Every path segment is percent-encoded,
/// so identifiers containing `?`, `#` or `%` address the right resource.
pub struct HttpApiClient {
    base_url: Url,
    http: Client,
}

impl HttpApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Self::with_client(base_url, http)
    }

    pub fn with_client(base_url: &str, http: Client) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            bail!("Base URL cannot carry a path: {base_url}");
        }
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }
}

fn ensure_success(response: Response, action: &str, url: &Url) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    bail!("{action} {url} returned {status}: {body}");
}

impl ApiClient for HttpApiClient {
    fn create(&self, path: &str, label: &str) -> Result<ResourceId> {
        let url = self.url(path)?;
        tracing::debug!(%url, label, "POST");
        let response = self
            .http
            .post(url.clone())
            .json(&CreateRequest {
                label: label.to_string(),
            })
            .send()
            .with_context(|| format!("POST {url} failed"))?;
        let body: CreateResponse = ensure_success(response, "POST", &url)?
            .json()
            .with_context(|| format!("Failed to parse create response from {url}"))?;
        Ok(body.id)
    }

    fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        tracing::debug!(%url, "DELETE");
        let response = self
            .http
            .delete(url.clone())
            .send()
            .with_context(|| format!("DELETE {url} failed"))?;
        ensure_success(response, "DELETE", &url)?;
        Ok(())
    }
}
