use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::idea::import;

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const UPLOAD_FIELD: &str = "file";

fn is_spreadsheet(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    lower.ends_with(".xlsx") || lower.ends_with(".xls")
}

/// Read the `file` part of a multipart upload into memory.
async fn read_upload(mut payload: Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(format!("Invalid upload: {e}")))?;
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        if !is_spreadsheet(&filename) {
            return Err(AppError::BadRequest(
                "Only .xlsx and .xls files are supported".to_string(),
            ));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(format!("Invalid upload: {e}")))?;
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::BadRequest("Uploaded file is too large".to_string()));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(bytes);
    }
    Err(AppError::BadRequest(format!("Missing '{UPLOAD_FIELD}' field")))
}

/// POST /ideas/bulk-import (multipart, field `file`)
pub async fn bulk_import(
    pool: web::Data<PgPool>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let bytes = read_upload(payload).await?;

    let sheet = web::block(move || import::read_workbook(bytes))
        .await
        .map_err(|e| AppError::Import(format!("Spreadsheet parsing was interrupted: {e}")))??;
    let parsed = import::parse_rows(&sheet)?;

    let result = import::import_rows(&pool, parsed).await;
    log::info!(
        "Bulk import: {} ideas imported, {} rows rejected",
        result.imported_count,
        result.errors.len()
    );
    Ok(HttpResponse::Ok().json(result))
}
