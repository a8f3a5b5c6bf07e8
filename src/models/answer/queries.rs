use sqlx::PgPool;

use crate::errors::AppError;
use super::types::*;

const SELECT_ANSWER: &str = "\
    SELECT answer_id, question_id, answer_text, category, submitter_name, submitter_code, \
           submitter_department, answer_keywords, created_at \
    FROM answers";

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Join keywords for storage; `None` when there are none.
pub fn join_keywords(keywords: &[String]) -> Option<String> {
    (!keywords.is_empty()).then(|| keywords.join(", "))
}

pub async fn create(pool: &PgPool, new: &NewAnswer<'_>) -> Result<Answer, AppError> {
    let answer = sqlx::query_as::<_, Answer>(
        "INSERT INTO answers (question_id, answer_text, category, submitter_name, submitter_code, \
                              submitter_department, answer_keywords) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING answer_id, question_id, answer_text, category, submitter_name, submitter_code, \
                   submitter_department, answer_keywords, created_at",
    )
    .bind(new.input.question_id.trim())
    .bind(new.input.answer_text.trim())
    .bind(&new.category)
    .bind(blank_to_none(new.input.submitter_name.as_deref()))
    .bind(blank_to_none(new.input.submitter_code.as_deref()))
    .bind(blank_to_none(new.input.submitter_department.as_deref()))
    .bind(join_keywords(&new.keywords))
    .fetch_one(pool)
    .await?;
    Ok(answer)
}

/// All answers, newest first.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Answer>, AppError> {
    let sql = format!("{SELECT_ANSWER} ORDER BY created_at DESC, answer_id DESC");
    let rows = sqlx::query_as::<_, Answer>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Answers of one question, newest first.
pub async fn find_by_question(pool: &PgPool, question_id: &str) -> Result<Vec<Answer>, AppError> {
    let sql = format!("{SELECT_ANSWER} WHERE question_id = $1 ORDER BY created_at DESC, answer_id DESC");
    let rows = sqlx::query_as::<_, Answer>(&sql)
        .bind(question_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, answer_id: i32) -> Result<Option<Answer>, AppError> {
    let sql = format!("{SELECT_ANSWER} WHERE answer_id = $1");
    let row = sqlx::query_as::<_, Answer>(&sql)
        .bind(answer_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Returns false when nothing was deleted.
pub async fn delete(pool: &PgPool, answer_id: i32) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM answers WHERE answer_id = $1")
        .bind(answer_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Answers whose keywords were never computed, oldest first.
pub async fn find_missing_keywords(pool: &PgPool) -> Result<Vec<Answer>, AppError> {
    let sql = format!(
        "{SELECT_ANSWER} WHERE answer_keywords IS NULL OR btrim(answer_keywords) = '' ORDER BY answer_id"
    );
    let rows = sqlx::query_as::<_, Answer>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn set_keywords(pool: &PgPool, answer_id: i32, keywords: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE answers SET answer_keywords = $1 WHERE answer_id = $2")
        .bind(keywords)
        .bind(answer_id)
        .execute(pool)
        .await?;
    Ok(())
}
