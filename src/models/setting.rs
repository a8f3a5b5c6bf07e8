use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::AppError;

/// A key/value setting row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Setting {
    pub set_code: String,
    pub set_value: String,
    pub set_description: Option<String>,
    pub set_createdate: NaiveDateTime,
    pub set_updatedate: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingCreate {
    pub set_code: String,
    pub set_value: String,
    pub set_description: Option<String>,
}

/// Body of `PUT /settings/{code}` and `PUT /settings/system-prompt`.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingUpdate {
    pub set_value: String,
    pub set_description: Option<String>,
}

const SELECT_SETTING: &str = "\
    SELECT set_code, set_value, set_description, set_createdate, set_updatedate \
    FROM settings";

const RETURNING_SETTING: &str =
    " RETURNING set_code, set_value, set_description, set_createdate, set_updatedate";

/// All settings ordered by code.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Setting>, AppError> {
    let sql = format!("{SELECT_SETTING} ORDER BY set_code");
    let rows = sqlx::query_as::<_, Setting>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_code(pool: &PgPool, set_code: &str) -> Result<Option<Setting>, AppError> {
    let sql = format!("{SELECT_SETTING} WHERE set_code = $1");
    let row = sqlx::query_as::<_, Setting>(&sql)
        .bind(set_code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a new setting. A duplicate code surfaces as a unique violation.
pub async fn create(pool: &PgPool, new: &SettingCreate) -> Result<Setting, AppError> {
    let sql = format!(
        "INSERT INTO settings (set_code, set_value, set_description) VALUES ($1, $2, $3){RETURNING_SETTING}"
    );
    let row = sqlx::query_as::<_, Setting>(&sql)
        .bind(new.set_code.trim())
        .bind(&new.set_value)
        .bind(new.set_description.as_deref())
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Update value (and description when given). `None` when the code is unknown.
pub async fn update(
    pool: &PgPool,
    set_code: &str,
    change: &SettingUpdate,
) -> Result<Option<Setting>, AppError> {
    let sql = format!(
        "UPDATE settings \
         SET set_value = $1, set_description = COALESCE($2, set_description), \
             set_updatedate = CURRENT_TIMESTAMP \
         WHERE set_code = $3{RETURNING_SETTING}"
    );
    let row = sqlx::query_as::<_, Setting>(&sql)
        .bind(&change.set_value)
        .bind(change.set_description.as_deref())
        .bind(set_code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert or update by code.
pub async fn upsert(pool: &PgPool, set_code: &str, change: &SettingUpdate) -> Result<Setting, AppError> {
    let sql = format!(
        "INSERT INTO settings (set_code, set_value, set_description) VALUES ($1, $2, $3) \
         ON CONFLICT (set_code) DO UPDATE \
         SET set_value = EXCLUDED.set_value, \
             set_description = COALESCE(EXCLUDED.set_description, settings.set_description), \
             set_updatedate = CURRENT_TIMESTAMP{RETURNING_SETTING}"
    );
    let row = sqlx::query_as::<_, Setting>(&sql)
        .bind(set_code)
        .bind(&change.set_value)
        .bind(change.set_description.as_deref())
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Return the setting, creating it with the given default first if absent.
/// Concurrent first reads both end up with the same stored row.
pub async fn get_or_create(
    pool: &PgPool,
    set_code: &str,
    default_value: &str,
    description: &str,
) -> Result<Setting, AppError> {
    let inserted = sqlx::query(
        "INSERT INTO settings (set_code, set_value, set_description) VALUES ($1, $2, $3) \
         ON CONFLICT (set_code) DO NOTHING",
    )
    .bind(set_code)
    .bind(default_value)
    .bind(description)
    .execute(pool)
    .await?
    .rows_affected();
    if inserted > 0 {
        log::info!("Created default setting '{set_code}'");
    }

    find_by_code(pool, set_code)
        .await?
        .ok_or(AppError::NotFound("Setting"))
}
