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

use crate::analysis::AnalysisJobs;
use crate::config::ServiceConfig;
use crate::store::{AnalysisStore, DiaryStore};
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub config: ServiceConfig,
    pub diaries: DiaryStore,
    pub analyses: AnalysisStore,
    pub jobs: AnalysisJobs,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn shared(config: ServiceConfig) -> SharedState {
        Arc::new(Self {
            diaries: DiaryStore::default(),
            analyses: AnalysisStore::default(),
            jobs: AnalysisJobs::new(Duration::from_millis(config.analysis_latency_ms)),
            config,
        })
    }
}
