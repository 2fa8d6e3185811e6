// src/routes.rs
use log::{info, warn};
use std::convert::Infallible;
use std::sync::Arc;
use warp::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::reject::{
    LengthRequired, MethodNotAllowed, PayloadTooLarge, Rejection, UnsupportedMediaType,
};
use warp::{Filter, Reply};

use crate::handlers::countries::{health, list_countries};
use crate::handlers::error::ApiError;
use crate::handlers::predict::predict;
use crate::services::dataset::DatasetCache;
use crate::services::model_store::ModelStore;

const MAX_BODY_BYTES: u64 = 16 * 1024;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, body) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, ApiError::new("Not Found"))
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        // Same contract as forecast failures: 200 with an error body.
        warn!("Rejected prediction body: {}", e);
        (StatusCode::OK, ApiError::new(format!("Invalid request body: {}", e)))
    } else if err.find::<UnsupportedMediaType>().is_some() {
        warn!("Rejected prediction body with unsupported content type");
        (StatusCode::OK, ApiError::new("Request body must be JSON (content-type: application/json)"))
    } else if err.find::<MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, ApiError::new("Method Not Allowed"))
    } else if err.find::<PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, ApiError::new("Request body too large"))
    } else if err.find::<LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, ApiError::new("Content-Length required"))
    } else {
        warn!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new("Internal Server Error"))
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), code))
}

pub fn cors(allowed_origin: &str) -> warp::cors::Builder {
    warp::cors()
        .allow_origin(allowed_origin)
        .allow_credentials(true)
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
}

pub fn routes(
    models: Arc<ModelStore>,
    dataset: Arc<DatasetCache>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let models_filter = warp::any().map(move || models.clone());
    let dataset_filter = warp::any().map(move || dataset.clone());

    let predict_route = warp::path!("predict")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(models_filter.clone())
        .and(dataset_filter)
        .and_then(predict);

    let countries_route = warp::path!("countries")
        .and(warp::get())
        .and(models_filter.clone())
        .and_then(list_countries);

    let health_route = warp::path!("health")
        .and(warp::get())
        .and(models_filter)
        .and_then(health);

    info!("All routes configured successfully.");

    predict_route
        .or(countries_route)
        .or(health_route)
        .recover(handle_rejection)
}
