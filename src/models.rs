// src/models.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The five forecast targets, named after their dataset columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Indicator {
    #[serde(rename = "Inflation Rate (%)")]
    InflationRate,
    #[serde(rename = "GDP Growth Rate (%)")]
    GdpGrowthRate,
    #[serde(rename = "Unemployment Rate (%)")]
    UnemploymentRate,
    #[serde(rename = "Interest Rate (%)")]
    InterestRate,
    #[serde(rename = "Stock Index Value")]
    StockIndex,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::InflationRate,
        Indicator::GdpGrowthRate,
        Indicator::UnemploymentRate,
        Indicator::InterestRate,
        Indicator::StockIndex,
    ];

    /// Indicators whose predictions are fed back as the next step's inputs.
    pub const FEEDBACK: [Indicator; 4] = [
        Indicator::InflationRate,
        Indicator::GdpGrowthRate,
        Indicator::UnemploymentRate,
        Indicator::InterestRate,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Indicator::InflationRate => "Inflation Rate (%)",
            Indicator::GdpGrowthRate => "GDP Growth Rate (%)",
            Indicator::UnemploymentRate => "Unemployment Rate (%)",
            Indicator::InterestRate => "Interest Rate (%)",
            Indicator::StockIndex => "Stock Index Value",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValues {
    #[serde(rename = "Inflation Rate (%)")]
    pub inflation_rate: f64,
    #[serde(rename = "GDP Growth Rate (%)")]
    pub gdp_growth_rate: f64,
    #[serde(rename = "Unemployment Rate (%)")]
    pub unemployment_rate: f64,
    #[serde(rename = "Interest Rate (%)")]
    pub interest_rate: f64,
    #[serde(rename = "Stock Index Value")]
    pub stock_index: f64,
}

impl IndicatorValues {
    pub fn get(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::InflationRate => self.inflation_rate,
            Indicator::GdpGrowthRate => self.gdp_growth_rate,
            Indicator::UnemploymentRate => self.unemployment_rate,
            Indicator::InterestRate => self.interest_rate,
            Indicator::StockIndex => self.stock_index,
        }
    }

    pub fn set(&mut self, indicator: Indicator, value: f64) {
        match indicator {
            Indicator::InflationRate => self.inflation_rate = value,
            Indicator::GdpGrowthRate => self.gdp_growth_rate = value,
            Indicator::UnemploymentRate => self.unemployment_rate = value,
            Indicator::InterestRate => self.interest_rate = value,
            Indicator::StockIndex => self.stock_index = value,
        }
    }
}

/// One row of the historical dataset with its calendar features attached.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRecord {
    pub date: NaiveDate,
    pub country: String,
    pub month: u32,
    pub year: i32,
    pub values: IndicatorValues,
}

impl HistoricalRecord {
    pub fn new(date: NaiveDate, country: impl Into<String>, values: IndicatorValues) -> Self {
        HistoricalRecord {
            date,
            country: country.into(),
            month: date.month(),
            year: date.year(),
            values,
        }
    }
}

/// Model inputs: calendar month/year plus the four feedback indicators.
/// Stock index is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub month: u32,
    pub year: i32,
    pub inflation_rate: f64,
    pub gdp_growth_rate: f64,
    pub unemployment_rate: f64,
    pub interest_rate: f64,
}

impl FeatureVector {
    pub const LEN: usize = 6;

    pub fn new(date: NaiveDate, inputs: &IndicatorValues) -> Self {
        FeatureVector {
            month: date.month(),
            year: date.year(),
            inflation_rate: inputs.inflation_rate,
            gdp_growth_rate: inputs.gdp_growth_rate,
            unemployment_rate: inputs.unemployment_rate,
            interest_rate: inputs.interest_rate,
        }
    }

    pub fn from_record(record: &HistoricalRecord) -> Self {
        FeatureVector {
            month: record.month,
            year: record.year,
            inflation_rate: record.values.inflation_rate,
            gdp_growth_rate: record.values.gdp_growth_rate,
            unemployment_rate: record.values.unemployment_rate,
            interest_rate: record.values.interest_rate,
        }
    }

    pub fn to_array(&self) -> [f64; FeatureVector::LEN] {
        [
            self.month as f64,
            self.year as f64,
            self.inflation_rate,
            self.gdp_growth_rate,
            self.unemployment_rate,
            self.interest_rate,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastStep {
    #[serde(rename = "Date", with = "step_date")]
    pub date: NaiveDate,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(flatten)]
    pub values: IndicatorValues,
}

mod step_date {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EconomicStatus {
    Good,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub status: EconomicStatus,
    pub recommendations: Vec<String>,
}

fn default_prediction_months() -> i64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub country: String,
    #[serde(default = "default_prediction_months")]
    pub prediction_months: i64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: Vec<ForecastStep>,
    pub analysis: AnalysisResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_features_use_derived_calendar_fields() {
        let date = NaiveDate::from_ymd_opt(2019, 11, 30).unwrap();
        let values = IndicatorValues {
            inflation_rate: 1.0,
            gdp_growth_rate: 2.0,
            unemployment_rate: 3.0,
            interest_rate: 4.0,
            stock_index: 5.0,
        };
        let record = HistoricalRecord::new(date, "Canada", values);

        assert_eq!((record.month, record.year), (11, 2019));
        assert_eq!(FeatureVector::from_record(&record), FeatureVector::new(date, &values));
        assert_eq!(
            FeatureVector::from_record(&record).to_array(),
            [11.0, 2019.0, 1.0, 2.0, 3.0, 4.0]
        );
    }
}
