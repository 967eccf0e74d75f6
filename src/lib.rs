// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Registry Client
//!
//! This crate submits goods introduction documents to a product registry
//! API while keeping outbound traffic under a configured budget:
//!
//! - Fixed-window rate governor (one reset task per window)
//! - Fail-fast or blocking permit acquisition
//! - JSON document encoding with base64 envelope payload
//! - Single-shot HTTP submission with typed transport errors

pub mod client;
pub mod config;
pub mod document;
pub mod encoder;
pub mod envelope;
pub mod error;
pub mod governor;
pub mod submitter;

pub use client::ApiClient;
pub use config::{AcquireMode, Config, RateLimitConfig, RegistryConfig, TimeUnit};
pub use document::{Description, Document, Product};
pub use encoder::{encode_payload, DocumentEncoder, JsonEncoder};
pub use envelope::{DocumentFormat, DocumentType, SubmissionRequest};
pub use error::{EncodingError, Error, Result, Stage, TransportError};
pub use governor::{GovernorStats, Permit, RateGovernor};
pub use submitter::{HttpSubmitter, ReqwestSubmitter};
