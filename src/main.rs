mod config;
mod desk;
mod registry;
mod routes;
mod services;
mod state;
mod view;

use rand::rngs::StdRng;
use rand::SeedableRng;
use time::OffsetDateTime;

use crate::config::DeskwatchConfig;
use crate::services::desk_api::DeskApiClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match DeskwatchConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let mut rng = StdRng::from_os_rng();
    let mut state = state::AppState::new(&config, &mut rng, OffsetDateTime::now_utc());

    // Background engines stop when their guards drop at shutdown.
    let _simulator = state.simulator.spawn();
    let _live = match &config.live {
        Some(live) => match DeskApiClient::new(live, config.scheme) {
            Ok(client) => {
                tracing::info!(url = %client.url(), desk_id = client.desk_id(), "live status polling enabled");
                Some(state.live.spawn(client))
            }
            Err(e) => {
                tracing::warn!(error = %e, "live status client not configured; live desk stays static");
                state.live_polling = false;
                None
            }
        },
        None => {
            tracing::info!("LIVE_STATUS_URL unset; live desk stays static");
            None
        }
    };

    let app = routes::app(state, config.dashboard_dir.as_deref());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "deskwatch listening");
    axum::serve(listener, app).await.expect("server failed");
}
