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

use crate::analysis::JobStatus;
use crate::state::{AppState, SharedState};
use crate::types::{
    CreateDiaryRequest, DiaryEntry, DiaryView, EmotionAnalysis, UpdateDiaryRequest,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use glyph::{generate_icon, render_svg, IconError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub request_id: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
            request_id: Uuid::new_v4().to_string(),
            status,
        }
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn diary_not_found(id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "DIARY_NOT_FOUND",
            format!("diary '{id}' does not exist"),
        )
    }

    fn analysis_not_found(id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "ANALYSIS_NOT_FOUND",
            format!("diary '{id}' has no stored emotion analysis"),
        )
    }

    fn job_not_found(job_id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "JOB_NOT_FOUND",
            format!("analysis job '{job_id}' does not exist"),
        )
    }

    fn empty_content() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "EMPTY_CONTENT",
            "cannot analyse an empty diary",
        )
    }

    fn internal(details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "an unexpected error occurred",
        )
        .with_details(details)
    }
}

impl From<IconError> for ApiError {
    // A composer postcondition failure is a broken algorithm or colour
    // table, never bad request data; it surfaces as an unrecoverable 500.
    fn from(err: IconError) -> Self {
        error!(error = %err, "icon generation invariant violated");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "ICON_INVARIANT_VIOLATION",
            "icon generation failed",
        )
        .with_details(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartAnalysisResponse {
    job_id: String,
    status: JobStatus,
    message: String,
}

#[derive(Debug, Serialize)]
struct PendingStatusResponse {
    status: JobStatus,
    progress: u8,
}

#[derive(Debug, Serialize)]
struct CompletedStatusResponse {
    status: JobStatus,
    diary: DiaryView,
}

#[derive(Debug, Deserialize)]
struct IconQuery {
    width: Option<u32>,
    height: Option<u32>,
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/diaries", get(list_diaries).post(create_diary))
        .route(
            "/diaries/{id}",
            get(get_diary).put(update_diary).delete(delete_diary),
        )
        .route("/diaries/{id}/analyze", post(start_analysis))
        .route("/diaries/{id}/analyze/status/{job_id}", get(analysis_status))
        .route("/diaries/{id}/icon.svg", get(diary_icon))
        .with_state(state)
}

/// Reproducible per-diary icon seed: the integer value of the identifier's
/// last six hex digits. Identifiers too short or non-hex fall back to a
/// random seed (non-reproducible, still valid).
pub fn icon_seed_for(id: &str) -> Option<u32> {
    id.get(id.len().saturating_sub(6)..)
        .and_then(|tail| u32::from_str_radix(tail, 16).ok())
}

async fn view_with_analysis(state: &AppState, entry: DiaryEntry) -> Result<DiaryView, ApiError> {
    let analysis = state.analyses.get(&entry.id).await;
    let icon_data = match &analysis {
        Some(analysis) => Some(generate_icon(&analysis.scores, icon_seed_for(&entry.id))?),
        None => None,
    };
    Ok(DiaryView {
        entry,
        emotion_analysis: analysis,
        icon_data,
    })
}

async fn list_diaries(
    State(state): State<SharedState>,
) -> Result<Json<Vec<DiaryView>>, ApiError> {
    let entries = state.diaries.list().await;
    let mut views = Vec::with_capacity(entries.len());
    for entry in entries {
        views.push(view_with_analysis(&state, entry).await?);
    }
    Ok(Json(views))
}

async fn get_diary(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<DiaryView>, ApiError> {
    let entry = state
        .diaries
        .get(&id)
        .await
        .ok_or_else(|| ApiError::diary_not_found(&id))?;
    Ok(Json(view_with_analysis(&state, entry).await?))
}

async fn create_diary(
    State(state): State<SharedState>,
    Json(request): Json<CreateDiaryRequest>,
) -> impl IntoResponse {
    let entry = state.diaries.create(request).await;
    info!(diary_id = %entry.id, "diary created");
    (StatusCode::CREATED, Json(entry))
}

async fn update_diary(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateDiaryRequest>,
) -> Result<Json<DiaryEntry>, ApiError> {
    let entry = state
        .diaries
        .update(&id, request)
        .await
        .ok_or_else(|| ApiError::diary_not_found(&id))?;
    Ok(Json(entry))
}

async fn delete_diary(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.diaries.delete(&id).await {
        return Err(ApiError::diary_not_found(&id));
    }
    state.analyses.delete(&id).await;
    info!(diary_id = %id, "diary deleted");
    Ok(Json(json!({ "message": "Diary deleted successfully" })))
}

async fn start_analysis(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<StartAnalysisResponse>, ApiError> {
    let entry = state
        .diaries
        .get(&id)
        .await
        .ok_or_else(|| ApiError::diary_not_found(&id))?;

    if entry.content.trim().is_empty() {
        warn!(diary_id = %id, "refusing analysis of empty diary");
        return Err(ApiError::empty_content());
    }

    let job_id = state.jobs.start(&id, &entry.content).await;
    Ok(Json(StartAnalysisResponse {
        job_id,
        status: JobStatus::Submitted,
        message: format!(
            "Analysis job started. Poll /diaries/{id}/analyze/status/{{jobId}} for progress"
        ),
    }))
}

async fn analysis_status(
    State(state): State<SharedState>,
    Path((id, job_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let job = state
        .jobs
        .status(&job_id)
        .await
        .ok_or_else(|| ApiError::job_not_found(&job_id))?;

    if job.status != JobStatus::Completed {
        return Ok(Json(PendingStatusResponse {
            status: job.status,
            progress: job.status.progress(),
        })
        .into_response());
    }

    // Completed: persist the result, then hand back the fully joined diary
    // so a single poll response is enough to refresh the client.
    let scores = job
        .scores
        .ok_or_else(|| ApiError::internal("completed job carries no scores"))?;
    state
        .analyses
        .save(EmotionAnalysis {
            diary_id: id.clone(),
            scores,
            analyzed_at: Utc::now(),
        })
        .await;
    info!(diary_id = %id, job_id = %job_id, "analysis stored");

    let entry = state
        .diaries
        .get(&id)
        .await
        .ok_or_else(|| ApiError::diary_not_found(&id))?;
    let diary = view_with_analysis(&state, entry).await?;

    Ok(Json(CompletedStatusResponse {
        status: JobStatus::Completed,
        diary,
    })
    .into_response())
}

async fn diary_icon(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<IconQuery>,
) -> Result<Response, ApiError> {
    let analysis = state
        .analyses
        .get(&id)
        .await
        .ok_or_else(|| ApiError::analysis_not_found(&id))?;

    let icon = generate_icon(&analysis.scores, icon_seed_for(&id))?;
    let width = query.width.unwrap_or(state.config.icon_size);
    let height = query.height.unwrap_or(state.config.icon_size);
    let svg = render_svg(&icon, width, height);

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}
