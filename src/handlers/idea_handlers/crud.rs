use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::validate;
use crate::errors::{AppError, FieldError};
use crate::models::idea;

const MAX_NAME: usize = 1000;

fn validate_name(value: Option<&str>, required: bool) -> Option<FieldError> {
    match value {
        Some(name) => validate::validate_required(name, "idea_name", MAX_NAME),
        None if required => Some(FieldError::new("idea_name", "idea_name is required")),
        None => None,
    }
}

/// POST /ideas
pub async fn create(
    pool: web::Data<PgPool>,
    body: web::Json<idea::IdeaInput>,
) -> Result<HttpResponse, AppError> {
    if let Some(err) = validate_name(body.idea_name.as_deref(), true) {
        return Err(AppError::Validation(vec![err]));
    }
    let created = idea::create(&pool, &body).await?;
    log::info!("Idea {} created", created.idea_seq);
    Ok(HttpResponse::Created().json(created))
}

/// GET /ideas?keyword=
pub async fn list(
    pool: web::Data<PgPool>,
    query: web::Query<idea::IdeaSearch>,
) -> Result<HttpResponse, AppError> {
    let ideas = idea::search(&pool, query.keyword.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ideas))
}

/// GET /ideas/random
pub async fn random(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let found = idea::find_random(&pool)
        .await?
        .ok_or(AppError::NotFound("Idea"))?;
    Ok(HttpResponse::Ok().json(found))
}

/// GET /ideas/code/{idea_code}
pub async fn read_by_code(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let found = idea::find_by_code(&pool, &path)
        .await?
        .ok_or(AppError::NotFound("Idea"))?;
    Ok(HttpResponse::Ok().json(found))
}

/// GET /ideas/{idea_seq}
pub async fn read(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let found = idea::find_by_seq(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound("Idea"))?;
    Ok(HttpResponse::Ok().json(found))
}

/// PUT /ideas/{idea_seq} - replaces every free-text field
pub async fn replace(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    body: web::Json<idea::IdeaInput>,
) -> Result<HttpResponse, AppError> {
    if let Some(err) = validate_name(body.idea_name.as_deref(), true) {
        return Err(AppError::Validation(vec![err]));
    }
    let updated = idea::replace(&pool, path.into_inner(), &body)
        .await?
        .ok_or(AppError::NotFound("Idea"))?;
    Ok(HttpResponse::Ok().json(updated))
}

/// PATCH /ideas/{idea_seq} - only the fields present in the body
pub async fn patch(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    body: web::Json<idea::IdeaInput>,
) -> Result<HttpResponse, AppError> {
    if let Some(err) = validate_name(body.idea_name.as_deref(), false) {
        return Err(AppError::Validation(vec![err]));
    }
    let updated = idea::patch(&pool, path.into_inner(), &body)
        .await?
        .ok_or(AppError::NotFound("Idea"))?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /ideas/{idea_seq}
pub async fn delete(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let idea_seq = path.into_inner();
    if !idea::delete(&pool, idea_seq).await? {
        return Err(AppError::NotFound("Idea"));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Idea deleted successfully",
        "idea_seq": idea_seq,
    })))
}
