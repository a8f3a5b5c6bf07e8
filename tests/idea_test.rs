/// Integration tests for the idea tank: CRUD, partial updates, search,
/// lookup by code, random pick and spreadsheet import.
use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use eventcategorize::ai::AiService;
use eventcategorize::models::idea::{self, IdeaInput, import};

mod common;
use common::{setup_test_db, test_app};

fn input(code: &str, name: &str, detail: Option<&str>) -> IdeaInput {
    IdeaInput {
        idea_code: Some(code.to_string()),
        idea_name: Some(name.to_string()),
        idea_detail: detail.map(String::from),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_create_read_replace_patch_delete() {
    let db = setup_test_db().await;
    let app = test::init_service(test_app(db.pool().clone(), AiService::disabled())).await;

    let req = test::TestRequest::post()
        .uri("/ideas")
        .set_json(json!({
            "idea_code": "IDX-001",
            "idea_name": "Farmer credit kiosk",
            "idea_detail": "Self-service kiosk for loan repayment",
            "idea_status": "new",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let seq = created["idea_seq"].as_i64().unwrap();
    assert!(created["idea_score"].is_null());

    // PATCH keeps untouched fields.
    let req = test::TestRequest::patch()
        .uri(&format!("/ideas/{seq}"))
        .set_json(json!({ "idea_status": "reviewed" }))
        .to_request();
    let patched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(patched["idea_status"], "reviewed");
    assert_eq!(patched["idea_name"], "Farmer credit kiosk");
    assert_eq!(patched["idea_code"], "IDX-001");

    // PUT replaces every free-text field.
    let req = test::TestRequest::put()
        .uri(&format!("/ideas/{seq}"))
        .set_json(json!({ "idea_name": "Renamed" }))
        .to_request();
    let replaced: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(replaced["idea_name"], "Renamed");
    assert!(replaced["idea_code"].is_null());
    assert!(replaced["idea_status"].is_null());

    let req = test::TestRequest::delete().uri(&format!("/ideas/{seq}")).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&format!("/ideas/{seq}")).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_requires_name_and_patch_rejects_blank_name() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone(), AiService::disabled())).await;

    let req = test::TestRequest::post()
        .uri("/ideas")
        .set_json(json!({ "idea_detail": "no name" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let created = idea::create(pool, &input("C1", "Named", None)).await.unwrap();
    let req = test::TestRequest::patch()
        .uri(&format!("/ideas/{}", created.idea_seq))
        .set_json(json!({ "idea_name": "  " }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_missing_idea_is_404() {
    let db = setup_test_db().await;
    let app = test::init_service(test_app(db.pool().clone(), AiService::disabled())).await;

    let req = test::TestRequest::patch()
        .uri("/ideas/999999")
        .set_json(json!({ "idea_status": "x" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_search_matches_keywords_name_and_detail_case_insensitively() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let mut tagged = input("A", "Alpha", Some("plain"));
    tagged.idea_keywords = Some("Blockchain, ledger".to_string());
    idea::create(pool, &tagged).await.unwrap();
    idea::create(pool, &input("B", "BLOCKCHAIN wallet", None)).await.unwrap();
    idea::create(pool, &input("C", "Gamma", Some("uses a blockchain backend"))).await.unwrap();
    idea::create(pool, &input("D", "Delta", Some("unrelated"))).await.unwrap();

    let found = idea::search(pool, Some("blockchain")).await.unwrap();
    let codes: Vec<_> = found.iter().filter_map(|i| i.idea_code.as_deref()).collect();
    assert_eq!(codes, vec!["A", "B", "C"]);

    assert_eq!(idea::search(pool, Some("  ")).await.unwrap().len(), 4);
    assert_eq!(idea::search(pool, Some("100%")).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_random_only_returns_ideas_with_detail() {
    let db = setup_test_db().await;
    let pool = db.pool();

    assert!(idea::find_random(pool).await.unwrap().is_none());

    idea::create(pool, &input("E", "Empty", None)).await.unwrap();
    idea::create(pool, &input("W", "Whitespace", Some("   "))).await.unwrap();
    assert!(idea::find_random(pool).await.unwrap().is_none());

    idea::create(pool, &input("F", "Full", Some("has detail"))).await.unwrap();
    for _ in 0..5 {
        let picked = idea::find_random(pool).await.unwrap().expect("an idea");
        assert_eq!(picked.idea_code.as_deref(), Some("F"));
    }
}

#[actix_web::test]
async fn test_random_and_code_endpoints() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone(), AiService::disabled())).await;

    let req = test::TestRequest::get().uri("/ideas/random").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    idea::create(pool, &input("IDX-9", "Nine", Some("detail"))).await.unwrap();

    let req = test::TestRequest::get().uri("/ideas/random").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["idea_code"], "IDX-9");

    let req = test::TestRequest::get().uri("/ideas/code/IDX-9").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["idea_name"], "Nine");

    let req = test::TestRequest::get().uri("/ideas/code/NOPE").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

fn header() -> Vec<String> {
    import::REQUIRED_COLUMNS
        .iter()
        .chain(import::OPTIONAL_COLUMNS.iter())
        .map(|c| c.to_string())
        .collect()
}

fn row(code: &str, name: &str, detail: &str) -> Vec<String> {
    let mut r = vec![String::new(); 17];
    r[0] = code.to_string();
    r[3] = name.to_string();
    r[7] = detail.to_string();
    r
}

#[tokio::test]
async fn test_import_keeps_good_rows_and_reports_bad_ones() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let sheet = import::SheetRows {
        first_row: 1,
        rows: vec![
            header(),
            row("I-1", "One", "first detail"),
            row("I-2", "", "nameless"),
            vec![String::new(); 17],
            row("I-3", "Three", "third detail"),
        ],
    };
    let parsed = import::parse_rows(&sheet).expect("valid header");
    let result = import::import_rows(pool, parsed).await;

    assert_eq!(result.imported_count, 2);
    assert_eq!(result.errors, vec!["Row 3: idea_name is required".to_string()]);

    let stored = idea::search(pool, None).await.unwrap();
    let codes: Vec<_> = stored.iter().filter_map(|i| i.idea_code.as_deref()).collect();
    assert_eq!(codes, vec!["I-1", "I-3"]);
}

#[tokio::test]
async fn test_import_missing_column_writes_nothing() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let mut h = header();
    h.retain(|c| c != "idea_owner_contacts");
    let sheet = import::SheetRows {
        first_row: 1,
        rows: vec![h, row("I-1", "One", "detail")],
    };
    assert!(import::parse_rows(&sheet).is_err());
    assert!(idea::search(pool, None).await.unwrap().is_empty());
}

fn multipart(field: &str, filename: &str, content: &[u8]) -> (String, Vec<u8>) {
    let boundary = "----ideaboundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

#[actix_web::test]
async fn test_bulk_import_rejects_non_spreadsheet_and_garbage() {
    let db = setup_test_db().await;
    let app = test::init_service(test_app(db.pool().clone(), AiService::disabled())).await;

    let (content_type, body) = multipart("file", "ideas.csv", b"a,b,c");
    let req = test::TestRequest::post()
        .uri("/ideas/bulk-import")
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let (content_type, body) = multipart("file", "ideas.xlsx", b"not really a workbook");
    let req = test::TestRequest::post()
        .uri("/ideas/bulk-import")
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let (content_type, body) = multipart("other", "ideas.xlsx", b"x");
    let req = test::TestRequest::post()
        .uri("/ideas/bulk-import")
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["details"].as_str().unwrap().contains("'file'"));
}

#[actix_web::test]
async fn test_bulk_import_real_workbook() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone(), AiService::disabled())).await;

    let (content_type, body) = multipart("file", "ideas.xlsx", include_bytes!("fixtures/ideas.xlsx"));
    let req = test::TestRequest::post()
        .uri("/ideas/bulk-import")
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["imported_count"], 2);
    assert_eq!(body["errors"], json!(["Row 4: idea_detail is required"]));

    // Numeric cells come back without a decimal point.
    let stored = idea::find_by_code(pool, "IMP-1").await.unwrap().unwrap();
    assert_eq!(stored.idea_owner_empcode.as_deref(), Some("1001"));
    assert_eq!(stored.idea_keywords.as_deref(), Some("fintech"));
    assert!(idea::find_by_code(pool, "IMP-2").await.unwrap().is_none());
    assert!(idea::find_by_code(pool, "IMP-3").await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Summaries and keywords
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_summarize_blank_detail_stores_dash_without_ai() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone(), AiService::disabled())).await;

    let blank = idea::create(pool, &input("S1", "Blank", None)).await.unwrap();
    let req = test::TestRequest::post()
        .uri(&format!("/ideas/{}/summarize", blank.idea_seq))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["idea_summary_byai"], "-");

    let stored = idea::find_by_seq(pool, blank.idea_seq).await.unwrap().unwrap();
    assert_eq!(stored.idea_summary_byai.as_deref(), Some("-"));

    // Real text needs the model.
    let full = idea::create(pool, &input("S2", "Full", Some("long text"))).await.unwrap();
    let req = test::TestRequest::post()
        .uri(&format!("/ideas/{}/summarize", full.idea_seq))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_summarize_stores_model_output() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let chat = std::sync::Arc::new(common::ScriptedChat::new(vec![Ok("สรุปสั้นๆ".to_string())]));
    let app = test::init_service(test_app(pool.clone(), AiService::with_client(chat))).await;

    let created = idea::create(pool, &input("S3", "Summarized", Some("detail text"))).await.unwrap();
    let req = test::TestRequest::post()
        .uri(&format!("/ideas/{}/summarize", created.idea_seq))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["idea_summary_byai"], "สรุปสั้นๆ");

    let stored = idea::find_by_seq(pool, created.idea_seq).await.unwrap().unwrap();
    assert_eq!(stored.idea_summary_byai.as_deref(), Some("สรุปสั้นๆ"));
}

#[actix_web::test]
async fn test_generate_idea_keywords_from_name_and_detail() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let app = test::init_service(test_app(pool.clone(), AiService::disabled())).await;

    let created = idea::create(pool, &input("K1", "Cashless market", Some("QR payments"))).await.unwrap();
    let mut tagged = input("K2", "Tagged", Some("x"));
    tagged.idea_keywords = Some("kept".to_string());
    let kept = idea::create(pool, &tagged).await.unwrap();

    let req = test::TestRequest::post().uri("/ideas/generate-keywords").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["processed_count"], 1);

    let stored = idea::find_by_seq(pool, created.idea_seq).await.unwrap().unwrap();
    let keywords = stored.idea_keywords.unwrap();
    assert!(keywords.contains("cashless") || keywords.contains("Cashless"));

    let untouched = idea::find_by_seq(pool, kept.idea_seq).await.unwrap().unwrap();
    assert_eq!(untouched.idea_keywords.as_deref(), Some("kept"));
}
