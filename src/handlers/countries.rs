// src/handlers/countries.rs
use log::info;
use serde_json::json;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::services::model_store::ModelStore;

pub async fn list_countries(models: Arc<ModelStore>) -> Result<Json, Rejection> {
    info!("Handling request to list forecastable countries");
    let countries: Vec<&str> = models.countries().collect();
    Ok(warp::reply::json(&json!({ "countries": countries })))
}

pub async fn health(models: Arc<ModelStore>) -> Result<Json, Rejection> {
    Ok(warp::reply::json(&json!({
        "status": "ok",
        "countries": models.len(),
    })))
}
