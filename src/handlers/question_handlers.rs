use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::validate;
use crate::errors::AppError;
use crate::models::{answer, question};

const MAX_TITLE: usize = 500;
const MAX_DESCRIPTION: usize = 5000;
const MAX_CATEGORY: usize = 100;

/// POST /questions
pub async fn create(
    pool: web::Data<PgPool>,
    body: web::Json<question::QuestionCreate>,
) -> Result<HttpResponse, AppError> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_required(&body.question_title, "question_title", MAX_TITLE));
    errors.extend(validate::validate_optional(
        body.question_description.as_deref(),
        "question_description",
        MAX_DESCRIPTION,
    ));
    for cat in body.question_categories.iter().flatten() {
        errors.extend(validate::validate_optional(Some(cat.as_str()), "question_categories", MAX_CATEGORY));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let created = question::create(&pool, &body).await?;
    log::info!("Question {} created", created.question_id);
    Ok(HttpResponse::Created().json(created))
}

/// GET /questions - newest first
pub async fn list(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let questions = question::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(questions))
}

/// GET /questions/{question_id}
pub async fn read(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let found = question::find_by_id(&pool, &path)
        .await?
        .ok_or(AppError::NotFound("Question"))?;
    Ok(HttpResponse::Ok().json(found))
}

/// DELETE /questions/{question_id} - also removes its answers
pub async fn delete(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let question_id = path.into_inner();
    let deleted_answers = question::delete_with_answers(&pool, &question_id)
        .await?
        .ok_or(AppError::NotFound("Question"))?;

    log::info!("Question {question_id} deleted with {deleted_answers} answers");
    Ok(HttpResponse::Ok().json(question::QuestionDeleted {
        message: "Question deleted successfully".to_string(),
        deleted_answers,
    }))
}

/// GET /questions/{question_id}/answers
pub async fn answers(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let rows = answer::find_by_question(&pool, &path).await?;
    Ok(HttpResponse::Ok().json(rows))
}
