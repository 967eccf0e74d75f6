// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test document generators.

use chrono::NaiveDate;
use registry_client::{Document, Product};

pub const PARTICIPANT_INN: &str = "7701234567";
pub const PRODUCER_INN: &str = "7707654321";

pub fn production_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
}

/// A valid document with `products` product entries.
pub fn document(index: usize, products: usize) -> Document {
    (0..products).fold(
        Document::new(
            format!("doc-{index:04}"),
            PARTICIPANT_INN,
            PRODUCER_INN,
            production_date(),
        ),
        |doc, p| {
            doc.with_product(Product::with_uit(
                format!("0104600000{index:04}{p:04}"),
                "6403",
                PARTICIPANT_INN,
                PRODUCER_INN,
                production_date(),
            ))
        },
    )
}

/// A pool of distinct valid documents.
pub fn documents(count: usize) -> Vec<Document> {
    (0..count).map(|i| document(i, 1 + i % 3)).collect()
}

/// A document the encoder must reject.
pub fn malformed_document() -> Document {
    let mut doc = document(0, 1);
    doc.participant_inn.clear();
    doc
}
