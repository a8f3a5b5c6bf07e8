pub mod answer_handlers;
pub mod auth_handlers;
pub mod health;
pub mod idea_handlers;
pub mod question_handlers;
pub mod settings_handlers;
pub mod user_handlers;

use actix_web::{middleware::from_fn, web};
use serde::Serialize;

use crate::auth::middleware::require_auth;
use idea_handlers::{crud, import, keywords, scoring};

/// Response of the keyword backfill endpoints.
#[derive(Debug, Default, Serialize)]
pub struct KeywordBackfill {
    pub message: String,
    pub processed_count: usize,
    pub skipped_count: usize,
    pub errors: Vec<String>,
}

/// Register every route. Literal segments are registered before the
/// `{param}` routes they would otherwise be captured by.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health));

    cfg.service(
        web::scope("/questions")
            .route("", web::post().to(question_handlers::create))
            .route("", web::get().to(question_handlers::list))
            .route("/{question_id}", web::get().to(question_handlers::read))
            .route("/{question_id}", web::delete().to(question_handlers::delete))
            .route("/{question_id}/answers", web::get().to(question_handlers::answers)),
    );
    cfg.service(
        web::scope("/answers")
            .route("", web::post().to(answer_handlers::create))
            .route("", web::get().to(answer_handlers::list))
            .route("/generate-keywords", web::post().to(answer_handlers::generate_keywords))
            .route("/{answer_id}", web::get().to(answer_handlers::read))
            .route("/{answer_id}", web::delete().to(answer_handlers::delete)),
    );
    cfg.service(
        web::scope("/ideas")
            .route("", web::post().to(crud::create))
            .route("", web::get().to(crud::list))
            .route("/random", web::get().to(crud::random))
            .route("/code/{idea_code}", web::get().to(crud::read_by_code))
            .route("/bulk-import", web::post().to(import::bulk_import))
            .route("/score", web::post().to(scoring::score))
            .route("/batch-score", web::post().to(scoring::batch_score))
            .route("/clear-scores", web::post().to(scoring::clear_scores))
            .route("/generate-keywords", web::post().to(keywords::generate_keywords))
            .route("/{idea_seq}", web::get().to(crud::read))
            .route("/{idea_seq}", web::put().to(crud::replace))
            .route("/{idea_seq}", web::patch().to(crud::patch))
            .route("/{idea_seq}", web::delete().to(crud::delete))
            .route("/{idea_seq}/score", web::post().to(scoring::score_one))
            .route("/{idea_seq}/summarize", web::post().to(scoring::summarize)),
    );
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth_handlers::register))
            .route("/login", web::post().to(auth_handlers::login))
            .service(
                web::resource("/me")
                    .wrap(from_fn(require_auth))
                    .route(web::get().to(auth_handlers::me)),
            ),
    );
    cfg.service(
        web::scope("/users")
            .wrap(from_fn(require_auth))
            .route("", web::get().to(user_handlers::list))
            .route("/generate-code", web::post().to(user_handlers::generate_code))
            .route("/{user_code}", web::get().to(user_handlers::read))
            .route("/{user_code}", web::put().to(user_handlers::update))
            .route("/{user_code}", web::delete().to(user_handlers::delete)),
    );
    cfg.service(
        web::scope("/settings")
            .route("/system-prompt", web::get().to(settings_handlers::get_system_prompt))
            .route("/system-prompt", web::put().to(settings_handlers::put_system_prompt))
            .route("", web::get().to(settings_handlers::list))
            .route("", web::post().to(settings_handlers::create))
            .route("/{set_code}", web::get().to(settings_handlers::read))
            .route("/{set_code}", web::put().to(settings_handlers::update)),
    );
}
