use econ_forecast_api::routes::routes;
use econ_forecast_api::services::dataset::{self, DatasetCache};
use econ_forecast_api::services::forest::ForestParams;
use econ_forecast_api::services::model_store;
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use warp::http::StatusCode;
use warp::{Filter, Reply};

const HEADER: &str = "Date,Country,Inflation Rate (%),GDP Growth Rate (%),Unemployment Rate (%),Interest Rate (%),Stock Index Value";

fn write_dataset(dir: &TempDir) -> std::path::PathBuf {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for (country, base) in [("USA", 2.0), ("Japan", 0.4)] {
        for year in 2021..=2022 {
            for month in 1..=12 {
                let t = (year - 2021) * 12 + month;
                writeln!(
                    csv,
                    "{}-{:02}-01,{},{:.2},{:.2},{:.2},{:.2},{:.1}",
                    year,
                    month,
                    country,
                    base + t as f64 * 0.05,
                    2.5 - t as f64 * 0.02,
                    4.0 + (t % 3) as f64 * 0.1,
                    1.5 + t as f64 * 0.03,
                    3000.0 + t as f64 * 25.0
                )
                .unwrap();
            }
        }
    }
    let path = dir.path().join("indicators.csv");
    fs::write(&path, csv).unwrap();
    path
}

fn api(dir: &TempDir) -> impl Filter<Extract = impl Reply, Error = std::convert::Infallible> + Clone {
    let path = write_dataset(dir);
    let records = dataset::load(&path).unwrap();
    let store = model_store::train(&records, &ForestParams { n_trees: 5, seed: 42 }).unwrap();
    routes(Arc::new(store), Arc::new(DatasetCache::new(path)))
}

async fn post_predict<F>(api: &F, body: Value) -> (StatusCode, Value)
where
    F: Filter + 'static,
    F::Extract: Reply + Send,
{
    let resp = warp::test::request()
        .method("POST")
        .path("/predict")
        .json(&body)
        .reply(api)
        .await;
    let status = resp.status();
    (status, serde_json::from_slice(resp.body()).unwrap())
}

#[tokio::test]
async fn predict_returns_forecast_and_analysis() {
    let dir = TempDir::new().unwrap();
    let api = api(&dir);

    let (status, body) = post_predict(&api, json!({ "country": "USA", "prediction_months": 3 })).await;
    assert_eq!(status, StatusCode::OK);

    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 3);
    let dates: Vec<&str> = predictions.iter().map(|p| p["Date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2022-12-31", "2023-01-31", "2023-02-28"]);
    for p in predictions {
        assert_eq!(p["Country"], "USA");
        for key in [
            "Inflation Rate (%)",
            "GDP Growth Rate (%)",
            "Unemployment Rate (%)",
            "Interest Rate (%)",
            "Stock Index Value",
        ] {
            assert!(p[key].is_number(), "missing {key}");
        }
    }

    let status_label = body["analysis"]["status"].as_str().unwrap();
    assert!(status_label == "Good" || status_label == "Warning");
    assert!(!body["analysis"]["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn prediction_months_defaults_to_one() {
    let dir = TempDir::new().unwrap();
    let api = api(&dir);

    let (_, body) = post_predict(&api, json!({ "country": "Japan" })).await;
    assert_eq!(body["predictions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_country_is_reported_in_the_body() {
    let dir = TempDir::new().unwrap();
    let api = api(&dir);

    let (status, body) = post_predict(&api, json!({ "country": "Atlantis", "prediction_months": 2 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": "No data available for Atlantis" }));
}

#[tokio::test]
async fn zero_months_is_an_error_body() {
    let dir = TempDir::new().unwrap();
    let api = api(&dir);

    let (status, body) = post_predict(&api, json!({ "country": "USA", "prediction_months": 0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].as_str().unwrap().contains("prediction_months"));
}

#[tokio::test]
async fn missing_dataset_is_an_error_body() {
    let dir = TempDir::new().unwrap();
    let api = api(&dir);
    fs::remove_file(dir.path().join("indicators.csv")).unwrap();

    let (status, body) = post_predict(&api, json!({ "country": "USA" })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].as_str().unwrap().starts_with("Failed to load dataset"));
}

#[tokio::test]
async fn malformed_body_is_an_error_body() {
    let dir = TempDir::new().unwrap();
    let api = api(&dir);

    let (status, body) = post_predict(&api, json!({ "prediction_months": 2 })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn countries_lists_trained_models() {
    let dir = TempDir::new().unwrap();
    let api = api(&dir);

    let resp = warp::test::request().method("GET").path("/countries").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body, json!({ "countries": ["Japan", "USA"] }));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let dir = TempDir::new().unwrap();
    let api = api(&dir);

    let resp = warp::test::request().method("GET").path("/forecast").reply(&api).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_model_count() {
    let dir = TempDir::new().unwrap();
    let api = api(&dir);

    let resp = warp::test::request().method("GET").path("/health").reply(&api).await;
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body, json!({ "status": "ok", "countries": 2 }));
}

#[tokio::test]
async fn non_json_content_type_is_an_error_body() {
    let dir = TempDir::new().unwrap();
    let api = api(&dir);

    let resp = warp::test::request()
        .method("POST")
        .path("/predict")
        .header("content-type", "text/plain")
        .body(r#"{"country":"USA"}"#)
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert!(body["error"].as_str().unwrap().contains("JSON"));
}
