// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Single-shot HTTP submission.

use crate::config::RegistryConfig;
use crate::error::{Error, TransportError};
use async_trait::async_trait;
use reqwest::header;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Performs one POST and returns the raw response body.
///
/// Implementations must not retry; retry policy belongs to the caller.
#[async_trait]
pub trait HttpSubmitter: Send + Sync {
    async fn post(
        &self,
        url: &Url,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<Vec<u8>, TransportError>;
}

/// `reqwest`-backed submitter.
#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    client: reqwest::Client,
}

impl ReqwestSubmitter {
    /// Create a submitter whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, Error> {
        Self::new(config.timeout())
    }

    /// Wrap an existing client; its timeout settings are used as-is.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSubmitter for ReqwestSubmitter {
    async fn post(
        &self,
        url: &Url,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<Vec<u8>, TransportError> {
        debug!(%url, bytes = body.len(), "Submitting request");

        let response = self
            .client
            .post(url.clone())
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            debug!(%url, status = status.as_u16(), bytes = bytes.len(), "Request succeeded");
            Ok(bytes.to_vec())
        } else {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            warn!(%url, status = status.as_u16(), "Registry rejected request");
            Err(TransportError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
