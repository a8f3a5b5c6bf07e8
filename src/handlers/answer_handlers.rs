use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::ai::{AiService, classifier};
use crate::auth::validate;
use crate::errors::AppError;
use crate::handlers::KeywordBackfill;
use crate::models::{answer, question};

const MAX_ANSWER: usize = 5000;
const MAX_SUBMITTER_FIELD: usize = 200;

/// POST /answers - classify, extract keywords, store
pub async fn create(
    pool: web::Data<PgPool>,
    ai: web::Data<AiService>,
    body: web::Json<answer::AnswerCreate>,
) -> Result<HttpResponse, AppError> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_required(&body.question_id, "question_id", 100));
    errors.extend(validate::validate_required(&body.answer_text, "answer_text", MAX_ANSWER));
    errors.extend(validate::validate_optional(body.submitter_name.as_deref(), "submitter_name", MAX_SUBMITTER_FIELD));
    errors.extend(validate::validate_optional(body.submitter_code.as_deref(), "submitter_code", MAX_SUBMITTER_FIELD));
    errors.extend(validate::validate_optional(
        body.submitter_department.as_deref(),
        "submitter_department",
        MAX_SUBMITTER_FIELD,
    ));
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // The question is optional: answers may reference ids that do not exist.
    let categories = question::find_by_id(&pool, body.question_id.trim())
        .await?
        .map(|q| q.categories())
        .unwrap_or_default();

    let text = body.answer_text.trim();
    let category = classifier::classify(ai.client(), text, &categories).await;
    let keywords = classifier::extract_keywords(ai.client(), text).await;

    let created = answer::create(
        &pool,
        &answer::NewAnswer { input: &body.0, category, keywords },
    )
    .await?;
    log::info!("Answer {} stored as '{}'", created.answer_id, created.category);
    Ok(HttpResponse::Created().json(created))
}

/// GET /answers - newest first
pub async fn list(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let rows = answer::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /answers/{answer_id}
pub async fn read(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let found = answer::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound("Answer"))?;
    Ok(HttpResponse::Ok().json(found))
}

/// DELETE /answers/{answer_id}
pub async fn delete(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let answer_id = path.into_inner();
    if !answer::delete(&pool, answer_id).await? {
        return Err(AppError::NotFound("Answer"));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Answer deleted successfully",
        "answer_id": answer_id,
    })))
}

/// POST /answers/generate-keywords - backfill answers stored without keywords
pub async fn generate_keywords(
    pool: web::Data<PgPool>,
    ai: web::Data<AiService>,
) -> Result<HttpResponse, AppError> {
    let pending = answer::find_missing_keywords(&pool).await?;
    let mut result = KeywordBackfill::default();

    for a in pending {
        let keywords = classifier::extract_keywords(ai.client(), &a.answer_text).await;
        let Some(joined) = answer::join_keywords(&keywords) else {
            result.skipped_count += 1;
            continue;
        };
        match answer::set_keywords(&pool, a.answer_id, &joined).await {
            Ok(()) => result.processed_count += 1,
            Err(e) => {
                log::warn!("Keyword update for answer {} failed: {e}", a.answer_id);
                result.errors.push(format!("Answer {}: could not be updated", a.answer_id));
            }
        }
    }

    result.message = format!("Generated keywords for {} answers", result.processed_count);
    Ok(HttpResponse::Ok().json(result))
}
