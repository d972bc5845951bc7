use tax_engine::api::{AppState, create_router};
use tax_engine::config::{ConfigLoader, ServerSettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = ServerSettings::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let loader = ConfigLoader::load(&settings.rates_dir)?;

    let app = create_router(AppState::new(loader));
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;

    tracing::info!("Server started at http://{}", settings.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
