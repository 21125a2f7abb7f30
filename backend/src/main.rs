//! Crop Yield Advisor - Backend Server
//!
//! Loads the model artifact and district table once, then serves the
//! prediction form and JSON API.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crop_advisor::{
    create_app,
    external::OpenWeatherClient,
    ml::Pipeline,
    services::{AdvisoryService, DistrictRegistry},
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "crop_advisor=debug,crop_advisor_server=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Crop Yield Advisor Server");
    tracing::info!("Environment: {}", config.environment);

    if config.weather.api_key.is_empty() {
        tracing::warn!("No weather API key configured, every request will use fallback weather");
    }

    // Load model artifact
    tracing::info!("Loading model from {}", config.model.path);
    let pipeline = Pipeline::load(&config.model.path)
        .with_context(|| format!("loading model artifact {}", config.model.path))?;
    tracing::info!(
        model = %pipeline.name,
        trees = pipeline.regressor.trees.len(),
        features = pipeline.preprocessor.output_width(),
        "Model loaded"
    );

    // Load district table
    let districts = DistrictRegistry::from_csv_path(&config.districts.path)?;
    tracing::info!("Loaded {} districts", districts.len());
    let district_count = districts.len();

    let service = AdvisoryService::new(
        Arc::new(pipeline),
        Arc::new(districts),
        Arc::new(OpenWeatherClient::new(&config.weather)),
        &config.prediction,
    );

    // Create application state
    let state = AppState {
        service: Arc::new(service),
        config: Arc::new(config.clone()),
        district_count,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid server address {}", config.server.host))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
