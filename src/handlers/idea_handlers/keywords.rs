use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::ai::{AiService, classifier};
use crate::errors::AppError;
use crate::handlers::KeywordBackfill;
use crate::models::{answer, idea};

/// POST /ideas/generate-keywords - fill in keywords for ideas that have none
pub async fn generate_keywords(
    pool: web::Data<PgPool>,
    ai: web::Data<AiService>,
) -> Result<HttpResponse, AppError> {
    let pending = idea::find_missing_keywords(&pool).await?;
    let mut result = KeywordBackfill::default();

    for row in pending {
        let text = [row.idea_name.as_deref(), row.idea_detail.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if text.is_empty() {
            result.skipped_count += 1;
            continue;
        }

        let keywords = classifier::extract_keywords(ai.client(), &text).await;
        let Some(joined) = answer::join_keywords(&keywords) else {
            result.skipped_count += 1;
            continue;
        };
        match idea::set_keywords(&pool, row.idea_seq, &joined).await {
            Ok(()) => result.processed_count += 1,
            Err(e) => {
                log::warn!("Keyword update for idea {} failed: {e}", row.idea_seq);
                result.errors.push(format!("Idea {}: could not be updated", row.idea_seq));
            }
        }
    }

    result.message = format!("Generated keywords for {} ideas", result.processed_count);
    Ok(HttpResponse::Ok().json(result))
}
