use std::{net::SocketAddr, process::ExitCode, time::Duration};

use earthlings::server::{config::Config, error::Error, metrics, router, startup};

/// Upper bound for closing each store on shutdown
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    startup::init_tracing(config.log_format);
    metrics::init_metrics();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Error> {
    let upstream = startup::build_upstream_client(&config)?;
    let cache = startup::connect_to_cache(&config).await?;
    let audit = startup::connect_to_database(&config).await;

    let state = startup::build_state(&config, cache.clone(), audit.clone(), upstream);
    let app = router::routes(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(startup::shutdown_signal())
    .await;

    startup::close_stores(&cache, &audit, SHUTDOWN_TIMEOUT).await;

    served?;

    Ok(())
}
