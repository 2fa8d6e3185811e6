// src/services/model_store.rs
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{ForecastError, Result};
use crate::models::{FeatureVector, HistoricalRecord, Indicator};
use crate::services::forest::{ForestParams, RandomForestRegressor, Sample};

/// Anything that maps a feature vector to a single indicator value.
pub trait Predictor {
    fn predict(&self, features: &FeatureVector) -> f64;
}

impl Predictor for RandomForestRegressor {
    fn predict(&self, features: &FeatureVector) -> f64 {
        self.predict_sample(&features.to_array())
    }
}

pub type CountryModels<P> = BTreeMap<Indicator, P>;

/// One predictor per (country, indicator). Read-only once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStore<P = RandomForestRegressor> {
    countries: BTreeMap<String, CountryModels<P>>,
}

impl<P> Default for ModelStore<P> {
    fn default() -> Self {
        ModelStore {
            countries: BTreeMap::new(),
        }
    }
}

impl<P: Predictor> ModelStore<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, country: impl Into<String>, indicator: Indicator, predictor: P) {
        self.countries
            .entry(country.into())
            .or_default()
            .insert(indicator, predictor);
    }

    pub fn get(&self, country: &str) -> Result<&CountryModels<P>> {
        self.countries
            .get(country)
            .ok_or_else(|| ForecastError::NotFound(country.to_string()))
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// Fit all five indicator models for one country.
///
/// Every model sees the indicator's own current value among its features,
/// including the model that predicts that indicator.
pub fn train_country(
    country: &str,
    rows: &[&HistoricalRecord],
    params: &ForestParams,
) -> Result<CountryModels<RandomForestRegressor>> {
    if rows.is_empty() {
        return Err(ForecastError::InsufficientData(country.to_string()));
    }

    let x: Vec<Sample> = rows
        .iter()
        .map(|r| FeatureVector::from_record(r).to_array())
        .collect();

    let mut models = BTreeMap::new();
    for indicator in Indicator::ALL {
        let y: Vec<f64> = rows.iter().map(|r| r.values.get(indicator)).collect();
        let forest = RandomForestRegressor::fit(&x, &y, params)?;
        models.insert(indicator, forest);
    }
    info!("Trained {} models for {} on {} rows", models.len(), country, rows.len());
    Ok(models)
}

/// Train a store for `countries` from `records`. A country with no rows
/// fails the whole run.
pub fn train_for(
    records: &[HistoricalRecord],
    countries: &[String],
    params: &ForestParams,
) -> Result<ModelStore> {
    let mut store = ModelStore::new();
    for country in countries {
        let rows: Vec<&HistoricalRecord> =
            records.iter().filter(|r| &r.country == country).collect();
        let models = train_country(country, &rows, params)?;
        store.countries.insert(country.clone(), models);
    }
    Ok(store)
}

/// Train a store covering every country that appears in `records`.
pub fn train(records: &[HistoricalRecord], params: &ForestParams) -> Result<ModelStore> {
    if records.is_empty() {
        return Err(ForecastError::InsufficientData("an empty dataset".to_string()));
    }
    let mut countries: Vec<String> = Vec::new();
    for record in records {
        if !countries.contains(&record.country) {
            countries.push(record.country.clone());
        }
    }
    info!(
        "Training models for {} countries ({} trees, seed {})",
        countries.len(),
        params.n_trees,
        params.seed
    );
    train_for(records, &countries, params)
}

impl ModelStore<RandomForestRegressor> {
    pub fn save(&self, path: &Path) -> Result<()> {
        let encoded =
            serde_json::to_vec(self).map_err(|e| ForecastError::Persistence(e.to_string()))?;
        fs::write(path, encoded)
            .map_err(|e| ForecastError::Persistence(format!("{}: {}", path.display(), e)))?;
        info!("Saved model store to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path)
            .map_err(|e| ForecastError::Persistence(format!("{}: {}", path.display(), e)))?;
        let store: ModelStore =
            serde_json::from_slice(&raw).map_err(|e| ForecastError::Persistence(e.to_string()))?;
        info!(
            "Loaded model store for {} countries from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Reuse the persisted store when present, otherwise train from the
    /// dataset and persist the result.
    pub fn load_or_train(
        model_path: &Path,
        records: impl FnOnce() -> Result<Vec<HistoricalRecord>>,
        params: &ForestParams,
    ) -> Result<Self> {
        if model_path.exists() {
            return Self::load(model_path);
        }
        warn!(
            "No model store at {}, training from dataset",
            model_path.display()
        );
        let store = train(&records()?, params)?;
        store.save(model_path)?;
        Ok(store)
    }
}
