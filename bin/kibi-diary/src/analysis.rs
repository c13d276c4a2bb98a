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
use glyph::{Emotion, EmotionScores};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle of an asynchronous classification job, with the coarse progress
/// percentage reported to polling clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Submitted,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn progress(self) -> u8 {
        match self {
            JobStatus::Submitted => 10,
            JobStatus::InProgress => 50,
            JobStatus::Completed => 100,
            JobStatus::Failed => 0,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub id: String,
    pub diary_id: String,
    pub status: JobStatus,
    pub scores: Option<EmotionScores>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct EmotionPattern {
    emotion: Emotion,
    keywords: &'static [&'static str],
    confidence: f64,
}

const EXTRA_HIT_BONUS: f64 = 0.08;
const SCORE_CEILING: f64 = 0.95;

/// Keyword-pattern emotion classifier. Each emotion carries a keyword list
/// and a base confidence; additional keyword hits raise the score towards a
/// ceiling. Content matching nothing at all falls back to bounded noise so
/// an icon is never pinned to a single degenerate shape.
#[derive(Debug, Clone)]
pub struct EmotionAnalyser {
    patterns: Vec<EmotionPattern>,
}

impl Default for EmotionAnalyser {
    fn default() -> Self {
        Self::new()
    }
}

impl EmotionAnalyser {
    pub fn new() -> Self {
        let patterns = vec![
            EmotionPattern {
                emotion: Emotion::Joy,
                keywords: &["happy", "joy", "glad", "delighted", "wonderful", "laughed", "fun"],
                confidence: 0.65,
            },
            EmotionPattern {
                emotion: Emotion::Trust,
                keywords: &["trust", "friend", "safe", "reliable", "supported", "honest"],
                confidence: 0.6,
            },
            EmotionPattern {
                emotion: Emotion::Fear,
                keywords: &["afraid", "scared", "fear", "terrified", "anxious", "worried"],
                confidence: 0.6,
            },
            EmotionPattern {
                emotion: Emotion::Surprise,
                keywords: &["surprised", "sudden", "unexpected", "astonished", "shocked"],
                confidence: 0.55,
            },
            EmotionPattern {
                emotion: Emotion::Sadness,
                keywords: &["sad", "cried", "lonely", "grief", "missed", "heartbroken"],
                confidence: 0.65,
            },
            EmotionPattern {
                emotion: Emotion::Disgust,
                keywords: &["disgust", "gross", "awful", "nasty", "revolting"],
                confidence: 0.55,
            },
            EmotionPattern {
                emotion: Emotion::Anger,
                keywords: &["angry", "furious", "rage", "annoyed", "unfair", "irritated"],
                confidence: 0.6,
            },
            EmotionPattern {
                emotion: Emotion::Anticipation,
                keywords: &["excited", "hope", "tomorrow", "soon", "planning", "looking forward"],
                confidence: 0.6,
            },
        ];
        Self { patterns }
    }

    pub fn classify(&self, text: &str) -> EmotionScores {
        let haystack = text.to_lowercase();
        let mut scores = EmotionScores::default();
        let mut matched = false;

        for pattern in &self.patterns {
            let hits = pattern
                .keywords
                .iter()
                .filter(|keyword| haystack.contains(**keyword))
                .count();
            if hits > 0 {
                matched = true;
                let score =
                    (pattern.confidence + EXTRA_HIT_BONUS * (hits as f64 - 1.0)).min(SCORE_CEILING);
                scores.set(pattern.emotion, score);
            }
        }

        if !matched {
            debug!("no emotion keywords matched; falling back to noise scores");
            return Self::fallback_scores();
        }
        scores
    }

    // Bounded random scores, used only when no keyword matches. Ranges keep
    // every emotion above zero and joy/trust/anticipation slightly favoured.
    fn fallback_scores() -> EmotionScores {
        let mut rng = rand::thread_rng();
        EmotionScores {
            joy: rng.gen::<f64>() * 0.8 + 0.1,
            trust: rng.gen::<f64>() * 0.7 + 0.1,
            fear: rng.gen::<f64>() * 0.6 + 0.05,
            surprise: rng.gen::<f64>() * 0.5 + 0.05,
            sadness: rng.gen::<f64>() * 0.6 + 0.05,
            disgust: rng.gen::<f64>() * 0.4 + 0.05,
            anger: rng.gen::<f64>() * 0.5 + 0.05,
            anticipation: rng.gen::<f64>() * 0.7 + 0.1,
        }
    }
}

/// Registry of running and finished analysis jobs. Submission returns a job
/// id immediately; classification completes on a background task after a
/// configurable simulated latency, mimicking the asynchronous document-
/// classification collaborator this replaces.
pub struct AnalysisJobs {
    jobs: Arc<RwLock<HashMap<String, AnalysisJob>>>,
    analyser: EmotionAnalyser,
    latency: Duration,
}

impl AnalysisJobs {
    pub fn new(latency: Duration) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            analyser: EmotionAnalyser::new(),
            latency,
        }
    }

    pub async fn start(&self, diary_id: &str, content: &str) -> String {
        let job_id = Uuid::new_v4().to_string();
        let job = AnalysisJob {
            id: job_id.clone(),
            diary_id: diary_id.to_string(),
            status: JobStatus::Submitted,
            scores: None,
            submitted_at: Utc::now(),
        };
        self.jobs.write().await.insert(job_id.clone(), job);
        info!(diary_id = %diary_id, job_id = %job_id, "analysis job submitted");

        let jobs = Arc::clone(&self.jobs);
        let analyser = self.analyser.clone();
        let latency = self.latency;
        let content = content.to_string();
        let key = job_id.clone();
        tokio::spawn(async move {
            set_status(&jobs, &key, JobStatus::InProgress, None).await;
            tokio::time::sleep(latency).await;

            // The route guards against empty content; this is a defensive
            // terminal state, not an expected path.
            if content.trim().is_empty() {
                warn!(job_id = %key, "refusing to classify empty content");
                set_status(&jobs, &key, JobStatus::Failed, None).await;
                return;
            }

            let scores = analyser.classify(&content);
            set_status(&jobs, &key, JobStatus::Completed, Some(scores)).await;
            info!(job_id = %key, "analysis job completed");
        });

        job_id
    }

    pub async fn status(&self, job_id: &str) -> Option<AnalysisJob> {
        self.jobs.read().await.get(job_id).cloned()
    }
}

async fn set_status(
    jobs: &RwLock<HashMap<String, AnalysisJob>>,
    job_id: &str,
    status: JobStatus,
    scores: Option<EmotionScores>,
) {
    if let Some(job) = jobs.write().await.get_mut(job_id) {
        job.status = status;
        if scores.is_some() {
            job.scores = scores;
        }
    }
}
