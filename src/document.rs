// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Business document records for goods introduction.
//!
//! Field names on the wire follow the registry's JSON layout, which mixes
//! snake_case with a couple of camelCase keys.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Participant description block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "participantInn")]
    pub participant_inn: String,
}

/// A goods introduction document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub description: Description,
    pub doc_id: String,
    pub doc_status: String,
    pub doc_type: String,
    #[serde(rename = "importRequest")]
    pub import_request: bool,
    pub participant_inn: String,
    pub producer_inn: String,
    pub production_date: NaiveDate,
    pub production_type: String,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reg_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reg_number: Option<String>,
}

/// One product entry of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_document_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_document_number: Option<String>,
    pub owner_inn: String,
    pub producer_inn: String,
    pub production_date: NaiveDate,
    pub tnved_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uit_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uitu_code: Option<String>,
}

impl Document {
    /// Document type used for goods introduction.
    pub const INTRODUCE_GOODS: &'static str = "LP_INTRODUCE_GOODS";

    /// Start a goods introduction document.
    ///
    /// The description block is derived from `participant_inn`. The status
    /// starts out as `NEW`, production type as `OWN_PRODUCTION`.
    #[must_use]
    pub fn new(
        doc_id: impl Into<String>,
        participant_inn: impl Into<String>,
        producer_inn: impl Into<String>,
        production_date: NaiveDate,
    ) -> Self {
        let participant_inn = participant_inn.into();
        Self {
            description: Description {
                participant_inn: participant_inn.clone(),
            },
            doc_id: doc_id.into(),
            doc_status: "NEW".to_string(),
            doc_type: Self::INTRODUCE_GOODS.to_string(),
            import_request: false,
            participant_inn,
            producer_inn: producer_inn.into(),
            production_date,
            production_type: "OWN_PRODUCTION".to_string(),
            products: Vec::new(),
            reg_date: None,
            reg_number: None,
        }
    }

    #[must_use]
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.doc_status = status.into();
        self
    }

    #[must_use]
    pub fn with_production_type(mut self, production_type: impl Into<String>) -> Self {
        self.production_type = production_type.into();
        self
    }

    #[must_use]
    pub fn with_import_request(mut self, import_request: bool) -> Self {
        self.import_request = import_request;
        self
    }

    #[must_use]
    pub fn with_registration(mut self, reg_number: impl Into<String>, reg_date: NaiveDate) -> Self {
        self.reg_number = Some(reg_number.into());
        self.reg_date = Some(reg_date);
        self
    }
}

impl Product {
    /// Product identified by a unit code (UIT).
    #[must_use]
    pub fn with_uit(
        uit_code: impl Into<String>,
        tnved_code: impl Into<String>,
        owner_inn: impl Into<String>,
        producer_inn: impl Into<String>,
        production_date: NaiveDate,
    ) -> Self {
        Self {
            owner_inn: owner_inn.into(),
            producer_inn: producer_inn.into(),
            production_date,
            tnved_code: tnved_code.into(),
            uit_code: Some(uit_code.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_certificate(
        mut self,
        kind: impl Into<String>,
        number: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        self.certificate_document = Some(kind.into());
        self.certificate_document_number = Some(number.into());
        self.certificate_document_date = Some(date);
        self
    }
}
