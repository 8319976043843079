use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use user_crud::{
    api,
    config::{self, AllowedOrigins, ServerConfig, StoreBackend},
    database::MongoDB,
    middleware::RequestMetrics,
    services::{MemoryUserStore, MongoUserStore, UserStore},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn startup_error(e: impl std::fmt::Display) -> io::Error {
    log::error!("❌ {}", e);
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

async fn build_store(config: &ServerConfig) -> io::Result<Arc<dyn UserStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            log::warn!("⚠️  Using in-memory store - data is lost on restart");
            Ok(Arc::new(MemoryUserStore::new()))
        }
        StoreBackend::Mongo => {
            log::info!("📊 Database: {}", config.mongodb_uri);
            let db = MongoDB::new(&config.mongodb_uri)
                .await
                .map_err(|e| startup_error(format!("Failed to connect to MongoDB: {}", e)))?;
            log::info!("✅ MongoDB connected successfully");
            Ok(Arc::new(MongoUserStore::new(db)))
        }
    }
}

fn cors(origins: &AllowedOrigins) -> Cors {
    let cors = match origins {
        AllowedOrigins::Any => Cors::default().allow_any_origin(),
        AllowedOrigins::List(list) => list
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin)),
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    config::load_env_files();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env().map_err(startup_error)?;

    log::info!("🚀 Starting User CRUD service...");

    let store = build_store(&config).await?;
    let store_data: web::Data<dyn UserStore> = web::Data::from(store);

    let bind_address = config.bind_address();
    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    let allowed_origins = config.allowed_origins.clone();

    HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .wrap(cors(&allowed_origins))
            .wrap(RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi),
            )
            .route("/", web::get().to(api::health::welcome))
            .route("/health", web::get().to(api::health::health_check))
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            .configure(api::users::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
