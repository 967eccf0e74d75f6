// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for the registry client.
//!
//! Provides a local fake registry, document generators and outcome counters
//! for driving the client under load.

#![allow(dead_code)]

pub mod generators;
pub mod metrics;
pub mod registry;
