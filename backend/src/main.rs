use std::{net::SocketAddr, sync::Arc, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use legitidevs_backend::{
    app::build_router,
    config::Config,
    db::connection::{create_pool, run_migrations},
    middleware::rate_limit::create_ip_rate_limiter,
    repositories::{
        InMemoryProfileAuthStore, InMemoryWorldStore, PgProfileAuthStore, PgWorldStore,
        ProfileAuthStore, WorldStore,
    },
    services::HttpIdentityProvider,
    state::AppState,
    utils::time::SystemClock,
};

fn mask_database_url(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => "<unparseable>".to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "legitidevs_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url.as_deref().map(mask_database_url).unwrap_or_else(|| "<unset>".into()),
        identity_provider_url = %config.identity_provider_url,
        session_token_ttl_seconds = config.session_token_ttl_seconds,
        refresh_token_ttl_seconds = config.refresh_token_ttl_seconds,
        legacy_bearer_auth = config.legacy_bearer_auth_enabled,
        "Loaded configuration from environment/.env"
    );

    let (profile_auth, worlds): (Arc<dyn ProfileAuthStore>, Arc<dyn WorldStore>) =
        match config.database_url.as_deref() {
            Some(database_url) => {
                let pool = create_pool(database_url).await?;
                run_migrations(&pool).await?;
                (
                    Arc::new(PgProfileAuthStore::new(pool.clone())),
                    Arc::new(PgWorldStore::new(pool)),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL is not set; using in-memory stores");
                (
                    Arc::new(InMemoryProfileAuthStore::new()),
                    Arc::new(InMemoryWorldStore::new()),
                )
            }
        };

    let identity = Arc::new(HttpIdentityProvider::new(
        config.identity_provider_url.clone(),
        Duration::from_secs(config.identity_provider_timeout_seconds),
    )?);

    let rate_limiter = create_ip_rate_limiter(&config)?;
    let port = config.port;
    let state = AppState::new(
        config,
        profile_auth,
        worlds,
        identity,
        Arc::new(SystemClock),
    );
    let app = build_router(state).layer(rate_limiter);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
