// src/bin/retrain_models.rs
use anyhow::Context;
use dotenv::dotenv;
use econ_forecast_api::config::AppConfig;
use econ_forecast_api::services::{dataset, model_store};
use log::info;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;
    info!(
        "Retraining models from {} into {}",
        config.dataset_path.display(),
        config.model_path.display()
    );

    let records = dataset::load(&config.dataset_path).context("failed to read dataset")?;
    let store = model_store::train(&records, &config.forest).context("training failed")?;
    store.save(&config.model_path)?;

    println!(
        "Retrained models for {} countries: {}",
        store.len(),
        store.countries().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}
