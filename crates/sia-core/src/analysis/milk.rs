//! Milk production forecast summaries
//!
//! The forecasting model itself is external; this turns its historical input
//! and forecast output into the `milk_forecast` context section.

use std::io::Read;

use crate::context::MilkForecastSection;
use crate::error::{Error, Result};

impl MilkForecastSection {
    /// Summarize a historical series and the forecast that followed it
    pub fn from_series(history: &[f64], forecast: &[f64]) -> Result<Self> {
        let (Some(&last_value), Some(&first_forecast_value)) = (history.last(), forecast.first())
        else {
            return Err(Error::InvalidData(
                "Milk forecast needs a non-empty history and forecast".into(),
            ));
        };

        let historical_mean = mean(history);
        let forecast_mean = mean(forecast);
        let variation_percent = if historical_mean != 0.0 {
            (forecast_mean - historical_mean) / historical_mean * 100.0
        } else {
            0.0
        };

        Ok(Self {
            total_months: history.len(),
            historical_mean,
            forecast_mean,
            forecast_months: forecast.len(),
            variation_percent,
            last_value,
            first_forecast_value,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Read a one-column series (no header), one value per row
///
/// Extra columns are ignored; blank rows are skipped.
pub fn read_series<R: Read>(reader: R) -> Result<Vec<f64>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let Some(field) = record.get(0).filter(|f| !f.is_empty()) else {
            continue;
        };
        let value: f64 = field.parse().map_err(|_| {
            Error::InvalidData(format!("Row {}: '{}' is not a number", index + 1, field))
        })?;
        values.push(value);
    }

    Ok(values)
}
