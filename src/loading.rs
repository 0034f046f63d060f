// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dashnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dashnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Debounced skeleton visibility for the tree view.
//!
//! The tree shows a loading skeleton only when a load outlasts a short debounce plus a
//! network-dependent delay, so fast responses never flash it. The gate is a pure state machine
//! over caller-supplied instants; the host decides when to poll it.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkeletonTimings {
    pub initial: Duration,
    pub fast_delay: Duration,
    pub slow_delay: Duration,
}

impl Default for SkeletonTimings {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(100),
            fast_delay: Duration::from_millis(500),
            slow_delay: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkClass {
    #[default]
    Fast,
    Slow,
}

impl NetworkClass {
    /// Classifies a Network Information API `effectiveType` (`slow-2g`, `2g`, `3g`, `4g`).
    pub fn from_effective_type(effective_type: &str) -> Self {
        match effective_type.trim() {
            "slow-2g" | "2g" => Self::Slow,
            _ => Self::Fast,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkeletonGate {
    timings: SkeletonTimings,
    network: NetworkClass,
    loading_since: Option<Instant>,
}

impl SkeletonGate {
    pub fn new(timings: SkeletonTimings) -> Self {
        Self {
            timings,
            network: NetworkClass::default(),
            loading_since: None,
        }
    }

    pub fn set_network(&mut self, network: NetworkClass) {
        self.network = network;
    }

    /// Feeds the current loading flag. Only the transition into loading restarts the clock.
    pub fn observe(&mut self, is_loading: bool, now: Instant) {
        match (is_loading, self.loading_since) {
            (true, None) => self.loading_since = Some(now),
            (false, _) => self.loading_since = None,
            (true, Some(_)) => {}
        }
    }

    /// Total time a load must last before the skeleton appears.
    pub fn threshold(&self) -> Duration {
        let delay = match self.network {
            NetworkClass::Fast => self.timings.fast_delay,
            NetworkClass::Slow => self.timings.slow_delay,
        };
        self.timings.initial + delay
    }

    /// When the skeleton will appear if loading continues; `None` while idle.
    pub fn show_at(&self) -> Option<Instant> {
        self.loading_since.map(|since| since + self.threshold())
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.show_at().is_some_and(|at| now >= at)
    }
}

impl Default for SkeletonGate {
    fn default() -> Self {
        Self::new(SkeletonTimings::default())
    }
}
