// src/services/forecast.rs
use chrono::{Datelike, NaiveDate};
use log::{debug, info};

use crate::error::{ForecastError, Result};
use crate::models::{FeatureVector, ForecastStep, HistoricalRecord, Indicator, IndicatorValues};
use crate::services::model_store::{ModelStore, Predictor};

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Roll forward to the next month end. A date inside a month lands on that
/// month's last day; a month-end date lands on the following month's.
pub fn next_month_end(date: NaiveDate) -> Result<NaiveDate> {
    let out_of_range = || ForecastError::Configuration(format!("date out of range after {}", date));

    let this_end = last_day_of_month(date.year(), date.month()).ok_or_else(out_of_range)?;
    if date < this_end {
        return Ok(this_end);
    }
    let next = this_end.succ_opt().ok_or_else(out_of_range)?;
    last_day_of_month(next.year(), next.month()).ok_or_else(out_of_range)
}

/// Roll the country's models forward `horizon` months from its most recent
/// record. Each step's four non-stock predictions become the next step's
/// inputs; the stock index prediction is reported but never fed back.
pub fn forecast<P: Predictor>(
    store: &ModelStore<P>,
    records: &[HistoricalRecord],
    country: &str,
    horizon: i64,
) -> Result<Vec<ForecastStep>> {
    if horizon < 1 {
        return Err(ForecastError::Configuration(format!(
            "prediction_months must be at least 1, got {}",
            horizon
        )));
    }

    let models = store.get(country)?;

    let mut history: Vec<&HistoricalRecord> =
        records.iter().filter(|r| r.country == country).collect();
    history.sort_by_key(|r| r.date);
    let anchor = history
        .last()
        .ok_or_else(|| ForecastError::NotFound(country.to_string()))?;

    info!(
        "Forecasting {} months for {} from anchor {}",
        horizon, country, anchor.date
    );

    let mut inputs: IndicatorValues = anchor.values;
    let mut current_date = anchor.date;
    let mut steps = Vec::new();

    for _ in 0..horizon {
        current_date = next_month_end(current_date)?;
        let features = FeatureVector::new(current_date, &inputs);

        let mut predicted = IndicatorValues::default();
        for indicator in Indicator::ALL {
            let predictor = models.get(&indicator).ok_or_else(|| {
                ForecastError::NotFound(format!("{} ({})", country, indicator.column_name()))
            })?;
            predicted.set(indicator, predictor.predict(&features));
        }
        debug!("{} {}: {:?}", country, current_date, predicted);

        for indicator in Indicator::FEEDBACK {
            inputs.set(indicator, predicted.get(indicator));
        }

        steps.push(ForecastStep {
            date: current_date,
            country: country.to_string(),
            values: predicted,
        });
    }

    Ok(steps)
}
