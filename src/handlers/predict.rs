// src/handlers/predict.rs
use log::{error, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::error::Result;
use crate::models::{PredictRequest, PredictResponse};
use crate::services::dataset::DatasetCache;
use crate::services::forecast::forecast;
use crate::services::model_store::{ModelStore, Predictor};
use crate::services::policy::analyze;

/// Refresh the dataset, roll the forecast forward and analyze its last month.
pub fn run_prediction<P: Predictor>(
    models: &ModelStore<P>,
    dataset: &DatasetCache,
    request: &PredictRequest,
) -> Result<PredictResponse> {
    let records = dataset.records()?;
    let predictions = forecast(models, &records, &request.country, request.prediction_months)?;
    let analysis = analyze(&predictions)?;
    Ok(PredictResponse {
        predictions,
        analysis,
    })
}

// Failures are reported in the body with a 200 so clients only need to
// check for the `error` key.
pub async fn predict(
    request: PredictRequest,
    models: Arc<ModelStore>,
    dataset: Arc<DatasetCache>,
) -> std::result::Result<Json, Rejection> {
    info!(
        "Handling prediction request for {} ({} months)",
        request.country, request.prediction_months
    );
    let country = request.country.clone();

    let outcome =
        tokio::task::spawn_blocking(move || run_prediction(&*models, &*dataset, &request)).await;

    match outcome {
        Ok(Ok(response)) => {
            info!(
                "Forecast for {} ready: {} steps, status {:?}",
                country,
                response.predictions.len(),
                response.analysis.status
            );
            Ok(warp::reply::json(&response))
        }
        Ok(Err(e)) => {
            error!("Prediction for {} failed [{}]: {}", country, e.kind(), e);
            Ok(warp::reply::json(&ApiError::from(e)))
        }
        Err(e) => {
            error!("Forecast task for {} did not complete: {}", country, e);
            Ok(warp::reply::json(&ApiError::new("Internal error while forecasting")))
        }
    }
}
