use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use simcal::{
    config::Config,
    model::app::{AppState, AuthKeys},
    router, scheduler, startup,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let db = startup::connect_to_database(&config).await?;
    let notifier = startup::build_notifier(&config)?;

    scheduler::Scheduler::new(db.clone(), notifier.clone())
        .await?
        .start()
        .await?;

    let state = AppState {
        db,
        notifier,
        auth_keys: AuthKeys::from_secret(config.jwt_secret.as_bytes()),
        frontend_url: config.frontend_url.clone(),
        reminder_lead_minutes: config.reminder_lead_minutes,
    };

    let app = router::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.listen_port));

    info!("SimCal listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
