use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::PgPool;

use crate::ai::{AiService, ChatClient, scoring, summarize};
use crate::auth::validate;
use crate::errors::AppError;
use crate::models::{idea, setting};

/// The caller's prompt when non-blank, otherwise the stored rubric
/// (installing the default on first use).
async fn resolve_prompt(pool: &PgPool, requested: Option<&str>) -> Result<String, AppError> {
    if let Some(prompt) = requested.map(str::trim).filter(|p| !p.is_empty()) {
        return Ok(prompt.to_string());
    }
    let stored = setting::get_or_create(
        pool,
        scoring::SYSTEM_PROMPT_CODE,
        scoring::DEFAULT_SCORING_PROMPT,
        scoring::DEFAULT_PROMPT_DESCRIPTION,
    )
    .await?;
    if stored.set_value.trim().is_empty() {
        return Ok(scoring::DEFAULT_SCORING_PROMPT.to_string());
    }
    Ok(stored.set_value)
}

fn require_client(ai: &AiService) -> Result<&dyn ChatClient, AppError> {
    ai.client().ok_or(AppError::AiUnavailable)
}

/// Name and detail of a stored idea, or why it cannot be scored.
fn scorable(row: &idea::Idea) -> Result<(&str, &str), String> {
    let name = row.idea_name.as_deref().unwrap_or("").trim();
    let detail = row.idea_detail.as_deref().unwrap_or("").trim();
    if detail.is_empty() {
        return Err(format!("Idea {}: idea_detail is empty", row.idea_seq));
    }
    Ok((name, detail))
}

/// POST /ideas/score - score text without storing anything
pub async fn score(
    ai: web::Data<AiService>,
    body: web::Json<idea::ScoreRequest>,
) -> Result<HttpResponse, AppError> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_required(&body.system_prompt, "system_prompt", 50_000));
    errors.extend(validate::validate_required(&body.idea_name, "idea_name", 1000));
    errors.extend(validate::validate_required(&body.idea_detail, "idea_detail", 50_000));
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let client = require_client(&ai)?;
    let result = scoring::score_idea(client, &body.system_prompt, &body.idea_name, &body.idea_detail).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /ideas/{idea_seq}/score - score and persist one idea
pub async fn score_one(
    pool: web::Data<PgPool>,
    ai: web::Data<AiService>,
    path: web::Path<i32>,
    body: Option<web::Json<idea::ScoreOneRequest>>,
) -> Result<HttpResponse, AppError> {
    let client = require_client(&ai)?;
    let row = idea::find_by_seq(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound("Idea"))?;
    let (name, detail) = scorable(&row).map_err(AppError::BadRequest)?;

    let requested = body.as_ref().and_then(|b| b.system_prompt.as_deref());
    let prompt = resolve_prompt(&pool, requested).await?;

    let result = scoring::score_idea(client, &prompt, name, detail).await?;
    let update = idea::ScoreUpdate {
        idea_seq: row.idea_seq,
        score: result.overall_score,
        comment: result.to_comment(),
    };
    idea::save_scores(&pool, std::slice::from_ref(&update)).await?;
    log::info!("Idea {} scored {}", row.idea_seq, result.overall_score);

    Ok(HttpResponse::Ok().json(json!({
        "idea_seq": row.idea_seq,
        "idea_score": update.score,
        "idea_score_comment": update.comment,
        "scores": result.scores,
        "overall_score": result.overall_score,
        "overall_feedback": result.overall_feedback,
    })))
}

/// POST /ideas/batch-score
///
/// Scores unscored ideas one after another. Failures are collected and do
/// not stop the batch; all successful scores are committed together at the
/// end, so errored ideas stay unscored and are picked up by the next run.
pub async fn batch_score(
    pool: web::Data<PgPool>,
    ai: web::Data<AiService>,
    body: web::Json<idea::BatchScoreRequest>,
) -> Result<HttpResponse, AppError> {
    if matches!(body.limit, Some(n) if n <= 0) {
        return Err(AppError::validation("limit", "limit must be a positive number"));
    }
    let client = require_client(&ai)?;
    let prompt = resolve_prompt(&pool, body.system_prompt.as_deref()).await?;

    if body.clear_scores {
        let cleared = idea::clear_scores(&pool).await?;
        log::info!("Cleared {cleared} scores before batch run");
    }

    let pending = idea::find_unscored(&pool, body.limit).await?;
    let mut outcome = idea::BatchScoreResult {
        processed_count: pending.len(),
        ..Default::default()
    };
    let mut updates = Vec::new();

    for row in &pending {
        let (name, detail) = match scorable(row) {
            Ok(text) => text,
            Err(msg) => {
                outcome.errors.push(msg);
                continue;
            }
        };
        match scoring::score_idea(client, &prompt, name, detail).await {
            Ok(result) => updates.push(idea::ScoreUpdate {
                idea_seq: row.idea_seq,
                score: result.overall_score,
                comment: result.to_comment(),
            }),
            Err(e) => {
                log::warn!("Scoring idea {} failed: {e}", row.idea_seq);
                outcome.errors.push(format!("Idea {}: {e}", row.idea_seq));
            }
        }
    }

    idea::save_scores(&pool, &updates).await?;
    outcome.success_count = updates.len();
    outcome.error_count = outcome.errors.len();
    log::info!(
        "Batch scoring: {} processed, {} scored, {} failed",
        outcome.processed_count,
        outcome.success_count,
        outcome.error_count
    );
    Ok(HttpResponse::Ok().json(outcome))
}

/// POST /ideas/clear-scores
pub async fn clear_scores(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let cleared_count = idea::clear_scores(&pool).await?;
    Ok(HttpResponse::Ok().json(idea::ScoresCleared {
        message: format!("Cleared scores of {cleared_count} ideas"),
        cleared_count,
    }))
}

/// POST /ideas/{idea_seq}/summarize
pub async fn summarize(
    pool: web::Data<PgPool>,
    ai: web::Data<AiService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let row = idea::find_by_seq(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound("Idea"))?;
    let detail = row.idea_detail.as_deref().unwrap_or("");

    let summary = if summarize::is_blank_detail(detail) {
        summarize::EMPTY_SUMMARY.to_string()
    } else {
        summarize::summarize(require_client(&ai)?, detail).await?
    };
    idea::set_summary(&pool, row.idea_seq, &summary).await?;

    Ok(HttpResponse::Ok().json(idea::IdeaSummary {
        idea_seq: row.idea_seq,
        idea_summary_byai: summary,
    }))
}
