// src/services/policy.rs
use log::debug;

use crate::error::{ForecastError, Result};
use crate::models::{AnalysisResult, EconomicStatus, ForecastStep};

pub const HIGH_INFLATION: &str =
    "High inflation expected. Consider tightening monetary policy to contain price growth.";
pub const LOW_INFLATION: &str =
    "Inflation is very low. Watch for deflation risk and consider stimulative measures.";
pub const LOW_GROWTH: &str =
    "GDP growth is weak. Consider fiscal stimulus or investment incentives to support activity.";
pub const OVERHEATING: &str =
    "GDP growth is strong. Monitor for signs of overheating and asset bubbles.";
pub const HIGH_UNEMPLOYMENT: &str =
    "Unemployment is high. Consider job creation programs and labor market support.";
pub const LOW_UNEMPLOYMENT: &str =
    "Unemployment is very low. Watch for wage pressure feeding into inflation.";
pub const HIGH_RATES: &str =
    "Interest rates are high, which may restrain borrowing and investment.";
pub const LOW_RATES: &str =
    "Interest rates are low. Monitor credit growth and financial stability.";
pub const STABLE: &str = "Economy appears stable. Maintain current policies.";

/// Threshold review of the final forecast month.
pub fn analyze(steps: &[ForecastStep]) -> Result<AnalysisResult> {
    let last = steps.last().ok_or_else(|| {
        ForecastError::Configuration("cannot analyze an empty forecast".to_string())
    })?;
    let v = &last.values;

    let mut status = EconomicStatus::Good;
    let mut recommendations = Vec::new();

    if v.inflation_rate > 5.0 {
        recommendations.push(HIGH_INFLATION.to_string());
        status = EconomicStatus::Warning;
    } else if v.inflation_rate < 1.0 {
        recommendations.push(LOW_INFLATION.to_string());
    }

    if v.gdp_growth_rate < 2.0 {
        recommendations.push(LOW_GROWTH.to_string());
        status = EconomicStatus::Warning;
    } else if v.gdp_growth_rate > 5.0 {
        recommendations.push(OVERHEATING.to_string());
    }

    if v.unemployment_rate > 6.0 {
        recommendations.push(HIGH_UNEMPLOYMENT.to_string());
        status = EconomicStatus::Warning;
    } else if v.unemployment_rate < 3.0 {
        recommendations.push(LOW_UNEMPLOYMENT.to_string());
    }

    if v.interest_rate > 5.0 {
        recommendations.push(HIGH_RATES.to_string());
    } else if v.interest_rate < 1.0 {
        recommendations.push(LOW_RATES.to_string());
    }

    if recommendations.is_empty() {
        recommendations.push(STABLE.to_string());
    }

    debug!(
        "Analysis for {} on {}: {:?} ({} recommendations)",
        last.country,
        last.date,
        status,
        recommendations.len()
    );
    Ok(AnalysisResult {
        status,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndicatorValues;
    use chrono::NaiveDate;

    fn step(inflation: f64, gdp: f64, unemployment: f64, interest: f64) -> ForecastStep {
        ForecastStep {
            date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            country: "USA".to_string(),
            values: IndicatorValues {
                inflation_rate: inflation,
                gdp_growth_rate: gdp,
                unemployment_rate: unemployment,
                interest_rate: interest,
                stock_index: 4000.0,
            },
        }
    }

    #[test]
    fn empty_forecast_is_a_configuration_error() {
        assert_eq!(analyze(&[]).unwrap_err().kind(), "ConfigurationError");
    }

    #[test]
    fn high_inflation_alone_is_a_warning() {
        let result = analyze(&[step(6.0, 3.0, 4.0, 2.0)]).unwrap();
        assert_eq!(result.status, EconomicStatus::Warning);
        assert_eq!(result.recommendations, vec![HIGH_INFLATION.to_string()]);
    }

    #[test]
    fn neutral_values_are_stable() {
        let result = analyze(&[step(3.0, 3.0, 4.0, 3.0)]).unwrap();
        assert_eq!(result.status, EconomicStatus::Good);
        assert_eq!(result.recommendations, vec![STABLE.to_string()]);
        assert!(result.recommendations[0].starts_with("Economy appears stable"));
    }

    #[test]
    fn only_the_last_step_is_inspected() {
        let steps = [step(9.0, 0.0, 9.0, 9.0), step(3.0, 3.0, 4.0, 3.0)];
        assert_eq!(analyze(&steps).unwrap().status, EconomicStatus::Good);
    }

    #[test]
    fn notes_alone_keep_status_good() {
        let result = analyze(&[step(0.5, 6.0, 2.0, 0.5)]).unwrap();
        assert_eq!(result.status, EconomicStatus::Good);
        assert_eq!(
            result.recommendations,
            vec![
                LOW_INFLATION.to_string(),
                OVERHEATING.to_string(),
                LOW_UNEMPLOYMENT.to_string(),
                LOW_RATES.to_string(),
            ]
        );
    }

    #[test]
    fn every_warning_is_listed_in_order() {
        let result = analyze(&[step(7.0, 1.0, 8.0, 6.0)]).unwrap();
        assert_eq!(result.status, EconomicStatus::Warning);
        assert_eq!(
            result.recommendations,
            vec![
                HIGH_INFLATION.to_string(),
                LOW_GROWTH.to_string(),
                HIGH_UNEMPLOYMENT.to_string(),
                HIGH_RATES.to_string(),
            ]
        );
    }

    #[test]
    fn thresholds_are_exclusive() {
        let result = analyze(&[step(5.0, 2.0, 6.0, 5.0)]).unwrap();
        assert_eq!(result.status, EconomicStatus::Good);
        assert_eq!(result.recommendations, vec![STABLE.to_string()]);
    }
}
