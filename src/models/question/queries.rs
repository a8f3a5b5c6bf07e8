use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use super::types::*;

const SELECT_QUESTION: &str = "\
    SELECT question_id, question_title, question_description, question_categories, \
           qrcode_url, created_at \
    FROM questions";

/// Insert a question under a fresh UUID. Title and description are stored
/// exactly as given.
pub async fn create(pool: &PgPool, new: &QuestionCreate) -> Result<Question, AppError> {
    let id = Uuid::new_v4().to_string();
    let categories: Option<Vec<String>> = new
        .question_categories
        .as_ref()
        .map(|cats| {
            cats.iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|cats| !cats.is_empty());

    let question = sqlx::query_as::<_, Question>(
        "INSERT INTO questions (question_id, question_title, question_description, question_categories) \
         VALUES ($1, $2, $3, $4) \
         RETURNING question_id, question_title, question_description, question_categories, \
                   qrcode_url, created_at",
    )
    .bind(&id)
    .bind(&new.question_title)
    .bind(new.question_description.as_deref())
    .bind(categories)
    .fetch_one(pool)
    .await?;
    Ok(question)
}

/// All questions, newest first.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Question>, AppError> {
    let sql = format!("{SELECT_QUESTION} ORDER BY created_at DESC, question_id");
    let rows = sqlx::query_as::<_, Question>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, question_id: &str) -> Result<Option<Question>, AppError> {
    let sql = format!("{SELECT_QUESTION} WHERE question_id = $1");
    let row = sqlx::query_as::<_, Question>(&sql)
        .bind(question_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Delete a question together with its answers in one transaction.
/// Returns `None` (and changes nothing) when the question does not exist.
pub async fn delete_with_answers(pool: &PgPool, question_id: &str) -> Result<Option<u64>, AppError> {
    let mut tx = pool.begin().await?;

    let exists: Option<(String,)> =
        sqlx::query_as("SELECT question_id FROM questions WHERE question_id = $1 FOR UPDATE")
            .bind(question_id)
            .fetch_optional(&mut *tx)
            .await?;
    if exists.is_none() {
        return Ok(None);
    }

    let answers = sqlx::query("DELETE FROM answers WHERE question_id = $1")
        .bind(question_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    sqlx::query("DELETE FROM questions WHERE question_id = $1")
        .bind(question_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(answers))
}
