// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Rate-governed registry client.

use crate::config::{AcquireMode, Config};
use crate::document::Document;
use crate::encoder::{encode_payload, DocumentEncoder, JsonEncoder};
use crate::envelope::SubmissionRequest;
use crate::error::{Error, Result};
use crate::governor::{Permit, RateGovernor};
use crate::submitter::{HttpSubmitter, ReqwestSubmitter};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const CREATE_PATH: &str = "lk/documents/create";
const CONTENT_TYPE_JSON: &str = "application/json";

/// Client for the document create endpoint.
///
/// Every call to [`create_document`](Self::create_document) takes one permit
/// from the client's [`RateGovernor`] before anything is encoded or sent.
#[derive(Debug)]
pub struct ApiClient<S = ReqwestSubmitter, E = JsonEncoder> {
    endpoint: Url,
    governor: RateGovernor,
    mode: AcquireMode,
    acquire_timeout: Option<Duration>,
    encoder: E,
    submitter: S,
}

impl ApiClient {
    /// Create a client with the JSON encoder and a `reqwest` submitter.
    pub fn new(config: Config) -> Result<Self> {
        let submitter = ReqwestSubmitter::from_config(&config.registry)?;
        Self::with_parts(&config, JsonEncoder, submitter)
    }
}

impl<S, E> ApiClient<S, E>
where
    S: HttpSubmitter,
    E: DocumentEncoder,
{
    /// Create a client with caller-supplied collaborators.
    pub fn with_parts(config: &Config, encoder: E, submitter: S) -> Result<Self> {
        let governor = RateGovernor::from_config(&config.rate_limit)?;
        let endpoint = create_endpoint(&config.registry.base_url)?;

        info!(
            %endpoint,
            capacity = governor.capacity(),
            window = ?governor.window(),
            mode = ?config.rate_limit.mode,
            "Registry client ready"
        );

        Ok(Self {
            endpoint,
            governor,
            mode: config.rate_limit.mode,
            acquire_timeout: config.rate_limit.acquire_timeout(),
            encoder,
            submitter,
        })
    }

    /// Submit a goods introduction document and return the raw response body.
    ///
    /// A denied permit is reported as [`Error::RateLimited`] and nothing is
    /// encoded or sent. Encoding and transport errors are returned unchanged.
    pub async fn create_document(&self, document: &Document, signature: &str) -> Result<Vec<u8>> {
        self.acquire().await?;

        let request = self.build_request(document, signature)?;
        let body = request.to_body()?;

        let response = self
            .submitter
            .post(&self.endpoint, body, CONTENT_TYPE_JSON)
            .await
            .map_err(|err| {
                warn!(doc_id = %document.doc_id, error = %err, "Document submission failed");
                Error::from(err)
            })?;

        info!(doc_id = %document.doc_id, bytes = response.len(), "Document submitted");
        Ok(response)
    }

    /// Build the envelope for a document without taking a permit.
    pub fn build_request(&self, document: &Document, signature: &str) -> Result<SubmissionRequest> {
        let payload = encode_payload(&self.encoder, document).map_err(|err| {
            warn!(doc_id = %document.doc_id, error = %err, "Document encoding failed");
            Error::from(err)
        })?;
        Ok(SubmissionRequest::new(
            self.encoder.format(),
            payload,
            signature,
        ))
    }

    pub fn governor(&self) -> &RateGovernor {
        &self.governor
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn acquire(&self) -> Result<()> {
        let permit = match (self.mode, self.acquire_timeout) {
            (AcquireMode::FailFast, _) => self.governor.try_acquire(),
            (AcquireMode::Blocking, Some(timeout)) => self.governor.acquire_timeout(timeout).await,
            (AcquireMode::Blocking, None) => Permit::Granted {
                remaining: self.governor.acquire().await,
            },
        };

        match permit {
            Permit::Granted { remaining } => {
                debug!(remaining, "Request permitted");
                Ok(())
            }
            Permit::Denied { retry_after } => {
                info!(
                    retry_after_ms = retry_after.as_millis() as u64,
                    "Request rate limited"
                );
                Err(Error::RateLimited { retry_after })
            }
        }
    }
}

fn create_endpoint(base_url: &str) -> Result<Url> {
    let mut endpoint = Url::parse(base_url)
        .map_err(|e| Error::config(format!("invalid registry base URL `{base_url}`: {e}")))?;
    endpoint
        .path_segments_mut()
        .map_err(|_| Error::config(format!("registry base URL `{base_url}` cannot carry a path")))?
        .pop_if_empty()
        .extend(CREATE_PATH.split('/'));
    Ok(endpoint)
}
