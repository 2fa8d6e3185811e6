use anyhow::Context;
use dotenv::dotenv;
use econ_forecast_api::config::AppConfig;
use econ_forecast_api::routes;
use econ_forecast_api::services::dataset::DatasetCache;
use econ_forecast_api::services::model_store::ModelStore;
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env()?;
    let dataset = Arc::new(DatasetCache::new(&config.dataset_path));

    // Models must be ready before the listener binds.
    let model_path = config.model_path.clone();
    let params = config.forest;
    let training_source = dataset.clone();
    let models = tokio::task::spawn_blocking(move || {
        ModelStore::load_or_train(
            &model_path,
            || training_source.records().map(|records| records.to_vec()),
            &params,
        )
    })
    .await
    .context("model initialization task panicked")?
    .context("failed to initialize model store")?;
    if models.is_empty() {
        warn!("Model store holds no countries; every prediction will report missing data");
    }
    info!("Model store ready for {} countries", models.len());

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let cors = routes::cors(&config.allowed_origin);
    let api = routes::routes(Arc::new(models), dataset).with(cors);
    info!("Routes configured successfully with CORS for {}", config.allowed_origin);

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
