// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Document encoding.
//!
//! An encoder turns a [`Document`] into serialized bytes; [`encode_payload`]
//! wraps those bytes in base64 for the `product_document` envelope field.
//! The JSON encoder checks required fields before serializing:
//! - identifiers and INNs are present
//! - every product carries a TN VED code and a UIT or UITU code
//!
//! Field contents are passed through as given.

use crate::document::{Document, Product};
use crate::envelope::DocumentFormat;
use crate::error::EncodingError;
use base64::Engine as _;
use tracing::debug;

/// Serializes documents into a transport payload.
pub trait DocumentEncoder: Send + Sync {
    /// Format the payload is declared as in the envelope.
    fn format(&self) -> DocumentFormat;

    fn encode(&self, document: &Document) -> Result<Vec<u8>, EncodingError>;
}

/// JSON document encoder (`MANUAL` format).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl DocumentEncoder for JsonEncoder {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Manual
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>, EncodingError> {
        check_document(document)?;
        let bytes = serde_json::to_vec(document)?;
        debug!(doc_id = %document.doc_id, bytes = bytes.len(), "Document serialized");
        Ok(bytes)
    }
}

/// Encode a document and return its base64 text.
pub fn encode_payload<E>(encoder: &E, document: &Document) -> Result<String, EncodingError>
where
    E: DocumentEncoder + ?Sized,
{
    let bytes = encoder.encode(document)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

fn check_document(document: &Document) -> Result<(), EncodingError> {
    require("doc_id", &document.doc_id)?;
    require("participant_inn", &document.participant_inn)?;
    require("producer_inn", &document.producer_inn)?;
    require("description.participantInn", &document.description.participant_inn)?;
    document.products.iter().try_for_each(check_product)
}

fn check_product(product: &Product) -> Result<(), EncodingError> {
    require("products.tnved_code", &product.tnved_code)?;
    require("products.owner_inn", &product.owner_inn)?;
    require("products.producer_inn", &product.producer_inn)?;

    let has_code = |code: &Option<String>| code.as_deref().is_some_and(|c| !c.trim().is_empty());
    if !has_code(&product.uit_code) && !has_code(&product.uitu_code) {
        return Err(EncodingError::MissingField("products.uit_code"));
    }
    Ok(())
}

fn require(field: &'static str, value: &str) -> Result<(), EncodingError> {
    if value.trim().is_empty() {
        return Err(EncodingError::MissingField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn document() -> Document {
        Document::new("doc-1", "7700000000", "7700000001", date()).with_product(
            Product::with_uit("0104611111111111", "6401", "7700000000", "7700000001", date()),
        )
    }

    #[test]
    fn test_payload_decodes_to_serialized_bytes() {
        let doc = document();
        let payload = encode_payload(&JsonEncoder, &doc).unwrap();

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap();
        assert_eq!(decoded, JsonEncoder.encode(&doc).unwrap());

        let back: Document = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_missing_doc_id() {
        let mut doc = document();
        doc.doc_id = "  ".to_string();
        assert!(matches!(
            JsonEncoder.encode(&doc),
            Err(EncodingError::MissingField("doc_id"))
        ));
    }

    #[test]
    fn test_missing_inn() {
        let mut doc = document();
        doc.participant_inn.clear();
        assert!(matches!(
            JsonEncoder.encode(&doc),
            Err(EncodingError::MissingField("participant_inn"))
        ));

        let mut doc = document();
        doc.products[0].owner_inn = " ".to_string();
        assert!(matches!(
            JsonEncoder.encode(&doc),
            Err(EncodingError::MissingField("products.owner_inn"))
        ));
    }

    #[test]
    fn test_product_needs_unit_code() {
        let mut doc = document();
        doc.products[0].uit_code = None;
        assert!(matches!(
            JsonEncoder.encode(&doc),
            Err(EncodingError::MissingField("products.uit_code"))
        ));

        doc.products[0].uitu_code = Some("046111111111111111".to_string());
        assert!(JsonEncoder.encode(&doc).is_ok());
    }

    #[test]
    fn test_present_fields_encode_verbatim() {
        let doc = Document::new("doc-1", "PARTICIPANT", "PRODUCER", date());
        let bytes = JsonEncoder.encode(&doc).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["participant_inn"], "PARTICIPANT");
        assert_eq!(value["producer_inn"], "PRODUCER");
        assert_eq!(JsonEncoder.format(), DocumentFormat::Manual);
    }
}
