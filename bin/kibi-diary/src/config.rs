// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

/// Runtime configuration, read from the environment with defaults that make
/// `kibi-diary serve` work with no environment at all.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    /// Simulated latency of the classification collaborator, in ms.
    pub analysis_latency_ms: u64,
    /// Default square edge for rendered icons when a request gives no size.
    pub icon_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            analysis_latency_ms: 1500,
            icon_size: 100,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(addr) = env::var("KIBI_BIND_ADDR") {
            config.bind_addr = addr.parse().context("invalid KIBI_BIND_ADDR")?;
        }
        if let Ok(latency) = env::var("KIBI_ANALYSIS_LATENCY_MS") {
            config.analysis_latency_ms =
                latency.parse().context("invalid KIBI_ANALYSIS_LATENCY_MS")?;
        }
        if let Ok(size) = env::var("KIBI_ICON_SIZE") {
            config.icon_size = size.parse().context("invalid KIBI_ICON_SIZE")?;
        }
        Ok(config)
    }
}
