// src/services/dataset.rs
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use crate::error::{ForecastError, Result};
use crate::models::{HistoricalRecord, Indicator, IndicatorValues};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Inflation Rate (%)")]
    inflation_rate: f64,
    #[serde(rename = "GDP Growth Rate (%)")]
    gdp_growth_rate: f64,
    #[serde(rename = "Unemployment Rate (%)")]
    unemployment_rate: f64,
    #[serde(rename = "Interest Rate (%)")]
    interest_rate: f64,
    #[serde(rename = "Stock Index Value")]
    stock_index: f64,
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parse historical rows from any CSV source, in file order.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<HistoricalRecord>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut records = Vec::new();

    for (line, result) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        let date = parse_date(&row.date).ok_or_else(|| {
            ForecastError::Data(format!("Unparseable date '{}' on data row {}", row.date, line + 1))
        })?;
        let values = IndicatorValues {
            inflation_rate: row.inflation_rate,
            gdp_growth_rate: row.gdp_growth_rate,
            unemployment_rate: row.unemployment_rate,
            interest_rate: row.interest_rate,
            stock_index: row.stock_index,
        };
        if let Some(indicator) = Indicator::ALL
            .into_iter()
            .find(|&i| !values.get(i).is_finite())
        {
            return Err(ForecastError::Data(format!(
                "Non-finite {} '{}' on data row {}",
                indicator.column_name(),
                values.get(indicator),
                line + 1
            )));
        }
        records.push(HistoricalRecord::new(date, row.country, values));
    }

    Ok(records)
}

pub fn load(path: &Path) -> Result<Vec<HistoricalRecord>> {
    info!("Loading historical dataset from {}", path.display());
    let file = File::open(path)
        .map_err(|e| ForecastError::Data(format!("{}: {}", path.display(), e)))?;
    let records = load_from_reader(file)?;
    info!("Loaded {} historical records", records.len());
    Ok(records)
}

struct Snapshot {
    modified: Option<SystemTime>,
    records: Arc<Vec<HistoricalRecord>>,
}

/// Keeps the last parsed dataset and re-reads it whenever the file on disk
/// changes, so every request sees the current contents without re-parsing
/// an unchanged file.
pub struct DatasetCache {
    path: PathBuf,
    snapshot: RwLock<Option<Snapshot>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatasetCache {
            path: path.into(),
            snapshot: RwLock::new(None),
        }
    }

    pub fn records(&self) -> Result<Arc<Vec<HistoricalRecord>>> {
        let metadata = fs::metadata(&self.path)
            .map_err(|e| ForecastError::Data(format!("{}: {}", self.path.display(), e)))?;
        // Some filesystems do not report mtimes; treat those as always stale.
        let modified = metadata.modified().ok();

        if modified.is_some() {
            let guard = self
                .snapshot
                .read()
                .map_err(|_| ForecastError::Data("dataset cache lock poisoned".to_string()))?;
            if let Some(snapshot) = guard.as_ref() {
                if snapshot.modified == modified {
                    debug!("Serving cached dataset snapshot");
                    return Ok(Arc::clone(&snapshot.records));
                }
            }
        }

        let records = Arc::new(load(&self.path)?);
        let mut guard = self
            .snapshot
            .write()
            .map_err(|_| ForecastError::Data("dataset cache lock poisoned".to_string()))?;
        *guard = Some(Snapshot {
            modified,
            records: Arc::clone(&records),
        });
        Ok(records)
    }

    /// Drop the cached snapshot; the next call to `records` re-reads the file.
    pub fn invalidate(&self) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => {
                warn!("Dataset cache lock was poisoned, clearing anyway");
                *poisoned.into_inner() = None;
            }
        }
    }
}
