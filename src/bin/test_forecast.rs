// src/bin/test_forecast.rs
use dotenv::dotenv;
use econ_forecast_api::config::AppConfig;
use econ_forecast_api::handlers::predict::run_prediction;
use econ_forecast_api::models::PredictRequest;
use econ_forecast_api::services::dataset::DatasetCache;
use econ_forecast_api::services::model_store::ModelStore;
use log::{error, info};
use std::env;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let mut args = env::args().skip(1);
    let country = args.next().unwrap_or_else(|| "USA".to_string());
    let prediction_months: i64 = match args.next() {
        Some(raw) => raw.parse()?,
        None => 3,
    };

    let config = AppConfig::from_env()?;
    let dataset = DatasetCache::new(&config.dataset_path);
    let models = ModelStore::load_or_train(
        &config.model_path,
        || dataset.records().map(|records| records.to_vec()),
        &config.forest,
    )?;

    info!("Forecasting {} months for {}", prediction_months, country);
    let request = PredictRequest {
        country: country.clone(),
        prediction_months,
    };
    match run_prediction(&models, &dataset, &request) {
        Ok(response) => {
            for step in &response.predictions {
                println!("{}", serde_json::to_string(step)?);
            }
            println!("Status: {:?}", response.analysis.status);
            for rec in &response.analysis.recommendations {
                println!("  - {}", rec);
            }
        }
        Err(e) => {
            error!("✗ Forecast for {} failed: {}", country, e);
            return Err(e.into());
        }
    }
    Ok(())
}
