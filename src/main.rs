use anyhow::anyhow;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use relay::app::auth::Credentials;
use relay::app::records::PgRecordStore;
use relay::app::upload::Moderation;
use relay::config::AppConfig;
use relay::infra::{
    client, db::Db, moderation::NsfwApiClient, provider::TelegraphClient, wallpaper::BingClient,
};
use relay::{http, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let db = Db::connect(&config).await?;
    db.migrate().await?;
    db.ping().await?;

    let http_client = client::build(config.upstream_timeout_seconds)?;
    let telegraph = Arc::new(TelegraphClient::new(
        http_client.clone(),
        config.provider_upload_url.clone(),
        config.provider_origin_host.clone(),
    ));

    let moderation = match config.nsfw_api_url {
        Some(ref endpoint) => {
            tracing::info!(endpoint = %endpoint, threshold = config.nsfw_threshold, "moderation enabled");
            Some(Moderation {
                scorer: Arc::new(NsfwApiClient::new(http_client.clone(), endpoint.clone())),
                threshold: config.nsfw_threshold,
            })
        }
        None => {
            tracing::info!("moderation disabled");
            None
        }
    };

    let bing_url = Url::parse(&config.bing_api_url)
        .map_err(|err| anyhow!("invalid BING_API_URL: {}", err))?;

    let state = AppState {
        records: Arc::new(PgRecordStore::new(db)),
        forwarder: telegraph.clone(),
        origin: telegraph,
        moderation,
        wallpapers: Arc::new(BingClient::new(http_client, bing_url)),
        credentials: Credentials::new(config.username.clone(), config.password.clone()),
        enable_auth: config.enable_auth,
        domain: config.domain.clone(),
        admin_path: config.admin_path.clone(),
        provider_origin_host: config.provider_origin_host.clone(),
        upload_max_bytes: config.upload_max_bytes,
    };

    let app = http::router(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(domain = %config.domain, "listening on {}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
