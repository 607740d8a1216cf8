use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use todo_auth::{JwksVerifier, JwksVerifierConfig};
use todo_server::adapter::handler::{self, AppState};
use todo_server::adapter::middleware::auth::AuthState;
use todo_server::adapter::repository::memory::{InMemoryTodoRepository, InMemoryUserRepository};
use todo_server::adapter::repository::todo_postgres::TodoPostgresRepository;
use todo_server::adapter::repository::user_postgres::UserPostgresRepository;
use todo_server::domain::repository::{TodoRepository, UserRepository};
use todo_server::infrastructure::config::Config;
use todo_server::infrastructure::JwksVerifierAdapter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();

    // Config
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let mut cfg = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path)?
    } else {
        info!(path = %config_path, "config file not found, using defaults");
        Config::default()
    };
    cfg.apply_env_overrides();

    info!(
        app_name = %cfg.app.name,
        version = %cfg.app.version,
        environment = %cfg.app.environment,
        "starting todo server"
    );

    // Database pool (optional)
    let db_pool = if let Ok(url) = std::env::var("DATABASE_URL") {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(cfg.database.as_ref().map_or(25, |db| db.max_open_conns))
            .connect(&url)
            .await?;
        info!("database connection pool established from DATABASE_URL");
        Some(pool)
    } else if let Some(ref db_config) = cfg.database {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(db_config.max_open_conns)
            .connect(&db_config.connection_url())
            .await?;
        info!("database connection pool established");
        Some(pool)
    } else {
        None
    };

    // Repositories (PostgreSQL or in-memory)
    let (todo_repo, user_repo): (Arc<dyn TodoRepository>, Arc<dyn UserRepository>) =
        if let Some(ref pool) = db_pool {
            (
                Arc::new(TodoPostgresRepository::new(pool.clone())),
                Arc::new(UserPostgresRepository::new(pool.clone())),
            )
        } else {
            info!("no database configured, using in-memory repositories");
            (
                Arc::new(InMemoryTodoRepository::new()),
                Arc::new(InMemoryUserRepository::new()),
            )
        };

    // Token verifier (issuer と audience が揃っている場合のみ有効化)
    let auth = match cfg.auth.credentials() {
        Some((issuer, audience)) => {
            let mut verifier_cfg = JwksVerifierConfig::new(issuer, audience);
            verifier_cfg.jwks_url = cfg.auth.jwks_url.clone();
            verifier_cfg.cache_ttl = Duration::from_secs(cfg.auth.jwks_cache_ttl_secs);
            verifier_cfg.fetch_timeout = Duration::from_secs(cfg.auth.fetch_timeout_secs);

            info!(
                issuer = %issuer,
                jwks_url = ?cfg.auth.jwks_url,
                cache_ttl_secs = cfg.auth.jwks_cache_ttl_secs,
                "JWKS verifier initialized"
            );

            let verifier = Arc::new(JwksVerifier::new(verifier_cfg));
            Some(AuthState {
                verifier: Arc::new(JwksVerifierAdapter::new(verifier)),
            })
        }
        None => {
            warn!("OIDC issuer/audience not configured, authenticated endpoints will return 501");
            None
        }
    };

    let state = AppState::new(todo_repo, user_repo, auth, db_pool);

    let app = handler::router(state).layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = SocketAddr::new(cfg.server.host.parse()?, cfg.server.port);
    info!("REST server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
