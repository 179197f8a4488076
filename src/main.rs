use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_http::cors::CorsLayer;

use callmed::auth::{AuthClient, AuthRouteState, TokenStore, auth_routes};
use callmed::config::Config;
use callmed::onboarding::sessions::spawn_expiry_task;
use callmed::onboarding::{DashboardRedirect, WizardRouteState, WizardSessions, wizard_routes};
use callmed::submission::HttpSubmissionGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env();

    eprintln!("CallMed onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", config.api_base_url);
    eprintln!("   Session dir: {}", config.session_dir.display());
    eprintln!("   Uploads: {}", config.upload_dir.display());
    eprintln!(
        "   Wizard API: http://{}:{}/api/wizards",
        config.bind_addr, config.http_port
    );

    let gateway = Arc::new(
        HttpSubmissionGateway::from_config(&config).context("building submission client")?,
    );
    let sessions = WizardSessions::new(gateway, Arc::new(DashboardRedirect));
    let _expiry_handle = spawn_expiry_task(
        Arc::clone(&sessions),
        config.session_ttl,
        Duration::from_secs(60),
    );

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("creating {}", config.upload_dir.display()))?;

    let auth_client = Arc::new(AuthClient::from_config(&config).context("building auth client")?);
    let tokens = Arc::new(TokenStore::new(config.session_dir.clone()));

    match tokens.load().await {
        Ok(Some(_)) => tracing::info!("Found a saved session token"),
        Ok(None) => tracing::info!("No saved session, sign in to start onboarding"),
        Err(e) => tracing::warn!("Could not read saved session token: {}", e),
    }

    let app = wizard_routes(WizardRouteState {
        sessions: Arc::clone(&sessions),
        upload_root: config.upload_dir.clone(),
    })
    .merge(auth_routes(AuthRouteState {
        client: auth_client,
        tokens,
        sessions,
    }))
    .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.bind_addr, config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(port = config.http_port, "Wizard server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .context("wizard server")?;

    Ok(())
}
