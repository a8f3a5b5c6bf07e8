use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::ai::scoring;
use crate::auth::validate;
use crate::errors::{AppError, is_unique_violation};
use crate::models::setting;

const MAX_CODE: usize = 100;
const MAX_DESCRIPTION: usize = 1000;

/// GET /settings/system-prompt - installs the default rubric on first read
pub async fn get_system_prompt(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let prompt = setting::get_or_create(
        &pool,
        scoring::SYSTEM_PROMPT_CODE,
        scoring::DEFAULT_SCORING_PROMPT,
        scoring::DEFAULT_PROMPT_DESCRIPTION,
    )
    .await?;
    Ok(HttpResponse::Ok().json(prompt))
}

/// PUT /settings/system-prompt
pub async fn put_system_prompt(
    pool: web::Data<PgPool>,
    body: web::Json<setting::SettingUpdate>,
) -> Result<HttpResponse, AppError> {
    if let Some(err) = validate::validate_required(&body.set_value, "set_value", usize::MAX) {
        return Err(AppError::Validation(vec![err]));
    }
    let saved = setting::upsert(&pool, scoring::SYSTEM_PROMPT_CODE, &body).await?;
    log::info!("Scoring system prompt updated");
    Ok(HttpResponse::Ok().json(saved))
}

/// GET /settings
pub async fn list(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let settings = setting::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(settings))
}

/// GET /settings/{set_code}
pub async fn read(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let found = setting::find_by_code(&pool, &path)
        .await?
        .ok_or(AppError::NotFound("Setting"))?;
    Ok(HttpResponse::Ok().json(found))
}

/// POST /settings
pub async fn create(
    pool: web::Data<PgPool>,
    body: web::Json<setting::SettingCreate>,
) -> Result<HttpResponse, AppError> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_required(&body.set_code, "set_code", MAX_CODE));
    errors.extend(validate::validate_optional(
        body.set_description.as_deref(),
        "set_description",
        MAX_DESCRIPTION,
    ));
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let duplicate = || AppError::BadRequest(format!("Setting '{}' already exists", body.set_code.trim()));
    if setting::find_by_code(&pool, body.set_code.trim()).await?.is_some() {
        return Err(duplicate());
    }
    match setting::create(&pool, &body).await {
        Ok(created) => Ok(HttpResponse::Created().json(created)),
        Err(AppError::Db(e)) if is_unique_violation(&e) => Err(duplicate()),
        Err(e) => Err(e),
    }
}

/// PUT /settings/{set_code}
pub async fn update(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    body: web::Json<setting::SettingUpdate>,
) -> Result<HttpResponse, AppError> {
    if let Some(err) = validate::validate_optional(
        body.set_description.as_deref(),
        "set_description",
        MAX_DESCRIPTION,
    ) {
        return Err(AppError::Validation(vec![err]));
    }
    let updated = setting::update(&pool, &path, &body)
        .await?
        .ok_or(AppError::NotFound("Setting"))?;
    Ok(HttpResponse::Ok().json(updated))
}
