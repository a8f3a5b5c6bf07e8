use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::errors::AppError;
use super::types::*;

const IDEA_COLUMNS: &str = "\
    idea_seq, idea_code, category_idea_type1, idea_inno_type, idea_name, idea_subject, \
    idea_source, customer_target, idea_detail, idea_finance_impact, idea_nonfinance_impact, \
    idea_status, idea_owner_empcode, idea_owner_empname, idea_owner_deposit, idea_owner_contacts, \
    idea_keywords, idea_comment, idea_summary_byai, idea_score, idea_score_comment, \
    create_datetime, update_datetime";

/// Trim, and store blanks as NULL.
fn clean(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

/// Escape LIKE wildcards so a search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

pub async fn create(pool: &PgPool, input: &IdeaInput) -> Result<Idea, AppError> {
    let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO idea_tank (");
    let mut cols = qb.separated(", ");
    for name in TEXT_FIELDS {
        cols.push(name);
    }
    qb.push(") VALUES (");
    let mut vals = qb.separated(", ");
    for (_, value) in input.fields() {
        vals.push_bind(clean(value));
    }
    qb.push(") RETURNING ");
    qb.push(IDEA_COLUMNS);

    let idea = qb.build_query_as::<Idea>().fetch_one(pool).await?;
    Ok(idea)
}

/// List ideas in sequence order, optionally filtered by a case-insensitive
/// substring of keywords, name or detail.
pub async fn search(pool: &PgPool, keyword: Option<&str>) -> Result<Vec<Idea>, AppError> {
    match keyword.map(str::trim).filter(|k| !k.is_empty()) {
        Some(term) => {
            let sql = format!(
                "SELECT {IDEA_COLUMNS} FROM idea_tank \
                 WHERE idea_keywords ILIKE $1 OR idea_name ILIKE $1 OR idea_detail ILIKE $1 \
                 ORDER BY idea_seq"
            );
            let rows = sqlx::query_as::<_, Idea>(&sql)
                .bind(like_pattern(term))
                .fetch_all(pool)
                .await?;
            Ok(rows)
        }
        None => {
            let sql = format!("SELECT {IDEA_COLUMNS} FROM idea_tank ORDER BY idea_seq");
            let rows = sqlx::query_as::<_, Idea>(&sql).fetch_all(pool).await?;
            Ok(rows)
        }
    }
}

pub async fn find_by_seq(pool: &PgPool, idea_seq: i32) -> Result<Option<Idea>, AppError> {
    let sql = format!("SELECT {IDEA_COLUMNS} FROM idea_tank WHERE idea_seq = $1");
    let row = sqlx::query_as::<_, Idea>(&sql)
        .bind(idea_seq)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// First idea carrying the given code. Codes are not unique.
pub async fn find_by_code(pool: &PgPool, idea_code: &str) -> Result<Option<Idea>, AppError> {
    let sql = format!(
        "SELECT {IDEA_COLUMNS} FROM idea_tank WHERE idea_code = $1 ORDER BY idea_seq LIMIT 1"
    );
    let row = sqlx::query_as::<_, Idea>(&sql)
        .bind(idea_code.trim())
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// One random idea that has a non-empty detail.
pub async fn find_random(pool: &PgPool) -> Result<Option<Idea>, AppError> {
    let sql = format!(
        "SELECT {IDEA_COLUMNS} FROM idea_tank \
         WHERE idea_detail IS NOT NULL AND btrim(idea_detail) <> '' \
         ORDER BY random() LIMIT 1"
    );
    let row = sqlx::query_as::<_, Idea>(&sql).fetch_optional(pool).await?;
    Ok(row)
}

/// Replace every free-text field. Absent fields become NULL.
pub async fn replace(pool: &PgPool, idea_seq: i32, input: &IdeaInput) -> Result<Option<Idea>, AppError> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE idea_tank SET ");
    let mut sets = qb.separated(", ");
    for (name, value) in input.fields() {
        sets.push(format!("{name} = "));
        sets.push_bind_unseparated(clean(value));
    }
    sets.push("update_datetime = CURRENT_TIMESTAMP");
    qb.push(" WHERE idea_seq = ");
    qb.push_bind(idea_seq);
    qb.push(" RETURNING ");
    qb.push(IDEA_COLUMNS);

    let idea = qb.build_query_as::<Idea>().fetch_optional(pool).await?;
    Ok(idea)
}

/// Update only the fields present in `input`.
pub async fn patch(pool: &PgPool, idea_seq: i32, input: &IdeaInput) -> Result<Option<Idea>, AppError> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE idea_tank SET ");
    let mut sets = qb.separated(", ");
    for (name, value) in input.fields() {
        if value.is_some() {
            sets.push(format!("{name} = "));
            sets.push_bind_unseparated(clean(value));
        }
    }
    sets.push("update_datetime = CURRENT_TIMESTAMP");
    qb.push(" WHERE idea_seq = ");
    qb.push_bind(idea_seq);
    qb.push(" RETURNING ");
    qb.push(IDEA_COLUMNS);

    let idea = qb.build_query_as::<Idea>().fetch_optional(pool).await?;
    Ok(idea)
}

pub async fn delete(pool: &PgPool, idea_seq: i32) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM idea_tank WHERE idea_seq = $1")
        .bind(idea_seq)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ── Scoring ────────────────────────────────────────────────────────

/// Null every stored score. Returns how many ideas had one.
pub async fn clear_scores(pool: &PgPool) -> Result<u64, AppError> {
    let result = sqlx::query(
        "UPDATE idea_tank SET idea_score = NULL, idea_score_comment = NULL \
         WHERE idea_score IS NOT NULL OR idea_score_comment IS NOT NULL",
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Unscored ideas in sequence order; `limit = None` returns all of them.
pub async fn find_unscored(pool: &PgPool, limit: Option<i64>) -> Result<Vec<Idea>, AppError> {
    let sql = format!(
        "SELECT {IDEA_COLUMNS} FROM idea_tank WHERE idea_score IS NULL ORDER BY idea_seq LIMIT $1"
    );
    let rows = sqlx::query_as::<_, Idea>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Write a batch of scores in one transaction.
pub async fn save_scores(pool: &PgPool, updates: &[ScoreUpdate]) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for u in updates {
        sqlx::query(
            "UPDATE idea_tank SET idea_score = $1, idea_score_comment = $2, \
                    update_datetime = CURRENT_TIMESTAMP \
             WHERE idea_seq = $3",
        )
        .bind(u.score)
        .bind(&u.comment)
        .bind(u.idea_seq)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

pub async fn set_summary(pool: &PgPool, idea_seq: i32, summary: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE idea_tank SET idea_summary_byai = $1, update_datetime = CURRENT_TIMESTAMP \
         WHERE idea_seq = $2",
    )
    .bind(summary)
    .bind(idea_seq)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

// ── Keywords ───────────────────────────────────────────────────────

/// Ideas without keywords, in sequence order.
pub async fn find_missing_keywords(pool: &PgPool) -> Result<Vec<Idea>, AppError> {
    let sql = format!(
        "SELECT {IDEA_COLUMNS} FROM idea_tank \
         WHERE idea_keywords IS NULL OR btrim(idea_keywords) = '' \
         ORDER BY idea_seq"
    );
    let rows = sqlx::query_as::<_, Idea>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn set_keywords(pool: &PgPool, idea_seq: i32, keywords: &str) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE idea_tank SET idea_keywords = $1, update_datetime = CURRENT_TIMESTAMP \
         WHERE idea_seq = $2",
    )
    .bind(keywords)
    .bind(idea_seq)
    .execute(pool)
    .await?;
    Ok(())
}
