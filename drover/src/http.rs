//! Thin HTTP client wrapper handed to every simulated user.
use crate::error::DroverError;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(StatusCode),

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Issues requests against a single host. Cheap to clone; clones share a connection pool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    base: String,
    inner: Client,
}

impl HttpClient {
    pub fn new(host: &str) -> Result<Self, DroverError> {
        let url = Url::parse(host).map_err(|err| DroverError::InvalidHost {
            host: host.to_string(),
            reason: err.to_string(),
        })?;

        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(DroverError::InvalidHost {
                host: host.to_string(),
                reason: "expected an http(s) base URL".to_string(),
            });
        }

        let inner = Client::builder().build()?;
        Ok(Self {
            base: url.as_str().trim_end_matches('/').to_string(),
            inner,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Full URL for a path relative to the host, e.g. `/car/42`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base, path)
        } else {
            format!("{}/{}", self.base, path)
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.inner.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.inner.post(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.inner.delete(self.url(path))
    }

    /// Send the request and read the full body. Non-2xx statuses are not errors here; see
    /// [`Reply::error_for_status`].
    pub async fn send(&self, request: RequestBuilder) -> Result<Reply, HttpError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(Reply { status, body })
    }
}

/// A fully read response.
#[derive(Clone, Debug)]
pub struct Reply {
    status: StatusCode,
    body: Vec<u8>,
}

impl Reply {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// `true` for 2xx statuses.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.ok() {
            Ok(self)
        } else {
            Err(HttpError::Status(self.status))
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
