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

use crate::types::{CreateDiaryRequest, DiaryEntry, EmotionAnalysis, UpdateDiaryRequest};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory diary store keyed by entry id. The interface mirrors the
/// external key-value persistence boundary (get/put/update/delete/list);
/// nothing outside this module depends on the backing representation.
#[derive(Default)]
pub struct DiaryStore {
    entries: RwLock<HashMap<String, DiaryEntry>>,
}

impl DiaryStore {
    pub async fn create(&self, request: CreateDiaryRequest) -> DiaryEntry {
        let now = Utc::now();
        let entry = DiaryEntry {
            id: Uuid::new_v4().to_string(),
            user_id: "anonymous".to_string(),
            title: request.title,
            content: request.content,
            created_at: now,
            updated_at: now,
        };
        self.entries
            .write()
            .await
            .insert(entry.id.clone(), entry.clone());
        entry
    }

    pub async fn get(&self, id: &str) -> Option<DiaryEntry> {
        self.entries.read().await.get(id).cloned()
    }

    pub async fn update(&self, id: &str, request: UpdateDiaryRequest) -> Option<DiaryEntry> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(id)?;
        if let Some(title) = request.title {
            entry.title = title;
        }
        if let Some(content) = request.content {
            entry.content = content;
        }
        entry.updated_at = Utc::now();
        Some(entry.clone())
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.entries.write().await.remove(id).is_some()
    }

    /// All entries, newest first.
    pub async fn list(&self) -> Vec<DiaryEntry> {
        let mut entries: Vec<DiaryEntry> = self.entries.read().await.values().cloned().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }
}

/// Analysis results keyed by diary id. Replace-on-write: a re-analysis
/// always overwrites the previous record in full.
#[derive(Default)]
pub struct AnalysisStore {
    analyses: RwLock<HashMap<String, EmotionAnalysis>>,
}

impl AnalysisStore {
    pub async fn save(&self, analysis: EmotionAnalysis) {
        self.analyses
            .write()
            .await
            .insert(analysis.diary_id.clone(), analysis);
    }

    pub async fn get(&self, diary_id: &str) -> Option<EmotionAnalysis> {
        self.analyses.read().await.get(diary_id).cloned()
    }

    pub async fn delete(&self, diary_id: &str) -> bool {
        self.analyses.write().await.remove(diary_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph::EmotionScores;

    fn request(title: &str, content: &str) -> CreateDiaryRequest {
        CreateDiaryRequest {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = DiaryStore::default();
        let created = store.create(request("first", "hello")).await;
        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.user_id, "anonymous");
    }

    #[tokio::test]
    async fn update_is_partial_and_bumps_timestamp() {
        let store = DiaryStore::default();
        let created = store.create(request("title", "content")).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let updated = store
            .update(
                &created.id,
                UpdateDiaryRequest {
                    title: Some("renamed".to_string()),
                    content: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.content, "content");
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn update_missing_entry_is_none() {
        let store = DiaryStore::default();
        assert!(store.update("missing", UpdateDiaryRequest::default()).await.is_none());
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let store = DiaryStore::default();
        let created = store.create(request("t", "c")).await;
        assert!(store.delete(&created.id).await);
        assert!(!store.delete(&created.id).await);
        assert!(store.get(&created.id).await.is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = DiaryStore::default();
        let first = store.create(request("old", "a")).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = store.create(request("new", "b")).await;
        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn analysis_save_replaces_previous_record() {
        let store = AnalysisStore::default();
        let mut analysis = EmotionAnalysis {
            diary_id: "d1".to_string(),
            scores: EmotionScores {
                joy: 0.2,
                ..EmotionScores::default()
            },
            analyzed_at: Utc::now(),
        };
        store.save(analysis.clone()).await;
        analysis.scores.joy = 0.9;
        store.save(analysis.clone()).await;
        let stored = store.get("d1").await.unwrap();
        assert_eq!(stored.scores.joy, 0.9);
    }
}
