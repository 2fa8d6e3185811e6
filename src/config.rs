// src/config.rs
use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::env;
use std::path::PathBuf;

use crate::services::forest::ForestParams;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub allowed_origin: String,
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub forest: ForestParams,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        warn!("${} not set, defaulting to {}", name, default);
        default.to_string()
    })
}

fn parse_var<T>(name: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = var_or(name, default);
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{} must be a number, got '{}'", name, raw))
}

impl AppConfig {
    /// Read settings from the environment. Call `dotenv().ok()` first so a
    /// local `.env` file is honoured.
    pub fn from_env() -> Result<Self> {
        let port: u16 = parse_var("PORT", "3030")?;
        let allowed_origin = var_or("CORS_ALLOWED_ORIGIN", "http://localhost:3000");
        if !(allowed_origin.starts_with("http://") || allowed_origin.starts_with("https://")) {
            bail!("CORS_ALLOWED_ORIGIN must be an http(s) origin, got '{}'", allowed_origin);
        }

        let n_trees: usize = parse_var("FOREST_TREES", "100")?;
        if n_trees == 0 {
            bail!("FOREST_TREES must be at least 1");
        }
        let seed: u64 = parse_var("FOREST_SEED", "42")?;

        let config = AppConfig {
            port,
            allowed_origin,
            dataset_path: PathBuf::from(var_or(
                "DATASET_PATH",
                "economic_indicators_dataset_2010_2023.csv",
            )),
            model_path: PathBuf::from(var_or("MODEL_PATH", "models.json")),
            forest: ForestParams { n_trees, seed },
        };
        info!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}
