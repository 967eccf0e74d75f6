// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Wire envelope for the document create endpoint.

use crate::error::EncodingError;
use serde::{Deserialize, Serialize};

/// Payload format declared to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentFormat {
    /// JSON document
    Manual,
    Csv,
    Xml,
}

/// Registry document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    LpIntroduceGoods,
}

/// Request body for `POST /lk/documents/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub document_format: DocumentFormat,
    /// Base64 of the serialized document
    pub product_document: String,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub signature: String,
}

impl SubmissionRequest {
    pub fn new(
        document_format: DocumentFormat,
        product_document: String,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            document_format,
            product_document,
            document_type: DocumentType::LpIntroduceGoods,
            signature: signature.into(),
        }
    }

    /// Serialize the envelope as the JSON request body.
    pub fn to_body(&self) -> Result<Vec<u8>, EncodingError> {
        Ok(serde_json::to_vec(self)?)
    }
}
