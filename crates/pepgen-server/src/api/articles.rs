//! Trigger endpoints for the generation pipeline.
//!
//! Manual trigger: bearer credential → `api_tokens` lookup → `user_roles`
//! admin check, then a (by default forced) pipeline run. Scheduled trigger:
//! constant-time cron-secret check, then a regular due-checked run — the
//! same code path the in-process cron tick uses.

use axum::{extract::State, http::HeaderMap, Extension, Json};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use pepgen_pipeline::{Caller, PipelineError, RunOutcome, Trigger};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::{extract_bearer_token, RequestId};
use crate::stores::build_pipeline;

#[derive(Debug, Deserialize)]
pub(super) struct GenerateBody {
    /// Manual triggers default to forced: an administrator pressing the
    /// button expects an article, not a due-date check.
    #[serde(default = "default_force")]
    pub force_generate: bool,
}

fn default_force() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(super) struct ScheduledBody {
    #[serde(default)]
    pub force_generate: bool,
    /// Internal marker some cron providers attach; accepted and ignored.
    #[serde(default)]
    #[allow(dead_code)]
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerateData {
    pub generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<ArticleData>,
}

#[derive(Debug, Serialize)]
pub(super) struct ArticleData {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub featured_image: bool,
    pub content_image_count: usize,
}

pub(super) async fn generate_article(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Option<Json<GenerateBody>>,
) -> Result<Json<ApiResponse<GenerateData>>, ApiError> {
    let force = body.map_or(true, |Json(b)| b.force_generate);

    let caller = match resolve_caller(&state, &headers).await {
        Ok(caller) => caller,
        Err(e) => {
            tracing::error!(error = %e, "bearer token lookup failed");
            return Err(ApiError::new(
                req_id.0,
                "internal_error",
                "article generation failed",
            ));
        }
    };

    run_pipeline(state, req_id, Trigger::Manual { caller, force }).await
}

pub(super) async fn run_scheduled(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Option<Json<ScheduledBody>>,
) -> Result<Json<ApiResponse<GenerateData>>, ApiError> {
    if let Some(expected) = &state.cron_secret {
        let provided = headers
            .get("x-cron-secret")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !constant_time_eq(provided, expected) {
            return Err(ApiError::new(
                req_id.0,
                "unauthorized",
                "missing or invalid cron secret",
            ));
        }
    }

    let force = body.is_some_and(|Json(b)| b.force_generate);
    run_pipeline(state, req_id, Trigger::Scheduled { force }).await
}

async fn run_pipeline(
    state: AppState,
    req_id: RequestId,
    trigger: Trigger,
) -> Result<Json<ApiResponse<GenerateData>>, ApiError> {
    let pipeline = build_pipeline(
        state.pool.clone(),
        state.genai.clone(),
        state.storage.clone(),
        state.pipeline_config.clone(),
    );

    match pipeline.run(trigger).await {
        Ok(RunOutcome::Published(published)) => Ok(Json(ApiResponse {
            data: GenerateData {
                generated: true,
                reason: None,
                article: Some(ArticleData {
                    id: published.article_id,
                    title: published.title,
                    slug: published.slug,
                    category: published.category,
                    featured_image: published.featured_image,
                    content_image_count: published.content_image_count,
                }),
            },
            meta: ResponseMeta::new(req_id.0),
        })),
        Ok(RunOutcome::NotDue { reason }) => Ok(Json(ApiResponse {
            data: GenerateData {
                generated: false,
                reason: Some(reason.to_owned()),
                article: None,
            },
            meta: ResponseMeta::new(req_id.0),
        })),
        Err(PipelineError::Unauthorized) => Err(ApiError::new(
            req_id.0,
            "unauthorized",
            "missing or invalid bearer token",
        )),
        Err(PipelineError::Forbidden) => Err(ApiError::new(
            req_id.0,
            "forbidden",
            "administrative role required",
        )),
        Err(e) => {
            tracing::error!(error = %e, "pipeline run failed");
            Err(ApiError::new(req_id.0, "internal_error", e.to_string()))
        }
    }
}

/// Resolve the bearer credential to a caller, if the token is known.
/// `Ok(None)` (no header, unknown token) becomes `Unauthorized` inside the
/// pipeline's gate.
async fn resolve_caller(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Caller>, pepgen_db::DbError> {
    let Some(token) = extract_bearer_token(headers.get(axum::http::header::AUTHORIZATION)) else {
        return Ok(None);
    };
    let hash = pepgen_db::hash_token(&state.token_salt, token);
    let user = pepgen_db::find_user_by_token_hash(&state.pool, &hash).await?;
    Ok(user.map(|user_id| Caller { user_id }))
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}
