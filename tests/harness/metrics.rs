// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome counters for load simulation.

use registry_client::{Error, Stage};
use std::collections::HashMap;

/// Result of one submission, bucketed by pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Submitted,
    RateLimited,
    EncodingFailed,
    TransportFailed,
}

impl Outcome {
    pub fn of<T>(result: &Result<T, Error>) -> Self {
        match result {
            Ok(_) => Outcome::Submitted,
            Err(err) => match err.stage() {
                Stage::Acquire => Outcome::RateLimited,
                Stage::Encode => Outcome::EncodingFailed,
                Stage::Submit | Stage::Configuration => Outcome::TransportFailed,
            },
        }
    }
}

/// Collects outcomes during a simulated burst.
#[derive(Debug, Default)]
pub struct LoadMetrics {
    outcomes: HashMap<Outcome, usize>,
}

impl LoadMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }
}
