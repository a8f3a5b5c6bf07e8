use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

use eventcategorize::ai::AiService;
use eventcategorize::config::Config;
use eventcategorize::errors::{self, ApiErrorResponse};
use eventcategorize::{db, handlers};

fn cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);
    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }
    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();

    let pool = match db::init_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {e}");
            return Err(std::io::Error::other(e));
        }
    };
    if let Err(e) = db::run_migrations(&pool).await {
        log::error!("Failed to run migrations: {e}");
        return Err(std::io::Error::other(e));
    }

    let ai = AiService::from_config(&config.openai);
    let auth = web::Data::new(config.auth.clone());
    let ai = web::Data::new(ai);
    let pool = web::Data::new(pool);
    let origins = config.cors_origins.clone();

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&origins))
            .wrap(middleware::Logger::default())
            .app_data(web::JsonConfig::default().error_handler(errors::json_error_handler))
            .app_data(web::PathConfig::default().error_handler(errors::path_error_handler))
            .app_data(pool.clone())
            .app_data(auth.clone())
            .app_data(ai.clone())
            .configure(handlers::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound().json(ApiErrorResponse {
                    error: "Not found".to_string(),
                    details: None,
                })
            }))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
