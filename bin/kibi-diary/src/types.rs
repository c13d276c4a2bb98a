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

use chrono::{DateTime, Utc};
use glyph::{EmotionScores, IconModel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiaryRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDiaryRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// A stored analysis result: the diary it belongs to, the flattened eight
/// emotion scores and the completion timestamp. Replaced wholesale on every
/// re-analysis, together with any icon derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionAnalysis {
    pub diary_id: String,
    #[serde(flatten)]
    pub scores: EmotionScores,
    pub analyzed_at: DateTime<Utc>,
}

/// Read-model returned by the diary endpoints: the entry joined with its
/// analysis and a freshly regenerated icon, when an analysis exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryView {
    #[serde(flatten)]
    pub entry: DiaryEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_analysis: Option<EmotionAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_data: Option<IconModel>,
}
