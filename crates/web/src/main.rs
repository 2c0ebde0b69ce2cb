use std::time::Duration;

use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;

use config::Config;
use features::{catches, leaderboard};
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        leaderboard::handlers::get_leaderboard,
        leaderboard::handlers::get_my_rank,
        catches::handlers::create_catch,
        catches::handlers::update_catch_status,
    ),
    components(
        schemas(
            storage::dto::leaderboard::LeaderboardResponse,
            storage::dto::leaderboard::LeaderboardRowResponse,
            storage::dto::leaderboard::MyRankResponse,
            storage::dto::catch::CreateCatchRequest,
            storage::dto::catch::UpdateCatchStatusRequest,
            storage::dto::catch::CatchResponse,
            scoring::ScoringPolicy,
            scoring::ExpertWeights,
            scoring::LeaderboardColumns,
            scoring::SpeciesColumn,
            scoring::MyRank,
            scoring::ContestStatus,
            scoring::CatchStatus,
            scoring::SubType,
        )
    ),
    tags(
        (name = "leaderboard", description = "Contest rankings"),
        (name = "catches", description = "Catch logging and moderation"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

fn app(db: Database, api_keys: ApiKeys) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let contests = leaderboard::routes::routes()
        .merge(catches::routes::contest_routes(api_keys.clone()));

    Router::new()
        .nest("/api/contests", contests)
        .nest("/api/catches", catches::routes::routes(api_keys))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(db)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting contest leaderboard API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.key_count() == 0 {
        tracing::warn!("API_KEYS is empty, catch submission and moderation will reject every request");
    }

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app(db, api_keys))
        .await
        .context("Server error")?;

    Ok(())
}
