use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::token::Claims;
use crate::auth::{password, validate};
use crate::config::AuthConfig;
use crate::errors::{AppError, FieldError, is_unique_violation};
use crate::models::user;

const MAX_NAME: usize = 100;

/// Checks shared by registration and update.
pub fn validate_user_fields(fname: &str, lname: &str, login: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_required(fname, "user_fname", MAX_NAME));
    errors.extend(validate::validate_required(lname, "user_lname", MAX_NAME));
    errors.extend(validate::validate_login(login));
    errors
}

/// GET /users
pub async fn list(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let users: Vec<user::UserOut> = user::find_all(&pool)
        .await?
        .into_iter()
        .map(user::UserOut::from)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

/// GET /users/{user_code}
pub async fn read(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let u = user::find_by_code(&pool, &path)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(HttpResponse::Ok().json(user::UserOut::from(u)))
}

/// PUT /users/{user_code} - password only changes when supplied
pub async fn update(
    pool: web::Data<PgPool>,
    auth: web::Data<AuthConfig>,
    path: web::Path<String>,
    body: web::Json<user::UserUpdate>,
) -> Result<HttpResponse, AppError> {
    let user_code = path.into_inner();

    let errors = validate_user_fields(&body.user_fname, &body.user_lname, &body.user_login);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if user::find_by_code(&pool, &user_code).await?.is_none() {
        return Err(AppError::NotFound("User"));
    }
    let login = body.user_login.trim();
    if user::login_taken(&pool, login, Some(&user_code)).await? {
        return Err(AppError::BadRequest("Login already exists".to_string()));
    }

    let new_password = match body.user_password.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(pw) => Some(password::prepare_password(pw, auth.password_scheme).map_err(AppError::Hash)?),
        None => None,
    };

    let updated = match user::update(
        &pool,
        &user_code,
        body.user_fname.trim(),
        body.user_lname.trim(),
        login,
        new_password.as_deref(),
    )
    .await
    {
        Ok(Some(u)) => u,
        Ok(None) => return Err(AppError::NotFound("User")),
        Err(AppError::Db(e)) if is_unique_violation(&e) => {
            return Err(AppError::BadRequest("Login already exists".to_string()));
        }
        Err(e) => return Err(e),
    };
    Ok(HttpResponse::Ok().json(user::UserOut::from(updated)))
}

/// DELETE /users/{user_code} - users cannot delete themselves
pub async fn delete(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_code = path.into_inner();
    let target = user::find_by_code(&pool, &user_code)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    if target.user_code == claims.user_code {
        return Err(AppError::BadRequest("You cannot delete your own account".to_string()));
    }

    user::delete(&pool, &user_code).await?;
    log::info!("User {user_code} deleted by {}", claims.sub);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User deleted successfully",
        "user_code": user_code,
    })))
}

/// POST /users/generate-code
pub async fn generate_code(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let user_code = user::next_code(&pool).await?;
    Ok(HttpResponse::Ok().json(user::GeneratedCode { user_code }))
}
