use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::{password, validate};
use crate::auth::token::{self, Claims};
use crate::config::AuthConfig;
use crate::errors::{AppError, is_unique_violation};
use crate::handlers::user_handlers::validate_user_fields;
use crate::models::user;

const MAX_CODE: usize = 20;

/// POST /auth/register
pub async fn register(
    pool: web::Data<PgPool>,
    auth: web::Data<AuthConfig>,
    body: web::Json<user::UserCreate>,
) -> Result<HttpResponse, AppError> {
    let mut errors = validate_user_fields(&body.user_fname, &body.user_lname, &body.user_login);
    errors.extend(validate::validate_password(&body.user_password));
    if let Some(code) = body.user_code.as_deref() {
        errors.extend(validate::validate_required(code, "user_code", MAX_CODE));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let login = body.user_login.trim();
    if user::login_taken(&pool, login, None).await? {
        return Err(AppError::BadRequest("Login already exists".to_string()));
    }
    let code = match body.user_code.as_deref().map(str::trim) {
        Some(code) => {
            if user::code_exists(&pool, code).await? {
                return Err(AppError::BadRequest("User code already exists".to_string()));
            }
            code.to_string()
        }
        None => user::next_code(&pool).await?,
    };

    let stored = password::prepare_password(&body.user_password, auth.password_scheme)
        .map_err(AppError::Hash)?;
    let new_user = user::NewUser {
        user_code: code,
        user_fname: body.user_fname.trim().to_string(),
        user_lname: body.user_lname.trim().to_string(),
        user_login: login.to_string(),
        user_password: stored,
    };

    // A concurrent registration can still win the race; the unique index catches it.
    let created = match user::create(&pool, &new_user).await {
        Ok(u) => u,
        Err(AppError::Db(e)) if is_unique_violation(&e) => {
            return Err(AppError::BadRequest("Login or user code already exists".to_string()));
        }
        Err(e) => return Err(e),
    };

    log::info!("User {} registered", created.user_code);
    Ok(HttpResponse::Created().json(user::UserOut::from(created)))
}

/// POST /auth/login
pub async fn login(
    pool: web::Data<PgPool>,
    auth: web::Data<AuthConfig>,
    body: web::Json<user::LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let invalid = || AppError::Unauthorized("Invalid login or password".to_string());

    let found = user::find_by_login(&pool, body.user_login.trim()).await?;
    let u = match found {
        Some(u) if password::verify_password(&body.user_password, &u.user_password) => u,
        _ => {
            log::warn!("Failed login for '{}'", body.user_login.trim());
            return Err(invalid());
        }
    };

    let token = token::issue_token(&auth, &u.user_login, &u.user_code)?;
    Ok(HttpResponse::Ok().json(user::LoginResponse {
        user_code: u.user_code,
        user_fname: u.user_fname,
        user_lname: u.user_lname,
        user_login: u.user_login,
        token,
    }))
}

/// GET /auth/me
pub async fn me(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let u = user::find_by_code(&pool, &claims.user_code)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;
    Ok(HttpResponse::Ok().json(user::UserOut::from(u)))
}
