//! Analysis context
//!
//! The shared record the assistant reads on every question. Each analysis
//! flow owns one section and writes it through its setter; writing a section
//! never touches the others, and nothing validates one section against
//! another (a stale `roi` next to a newer `simulation` is left as is).

use serde::{Deserialize, Serialize};

use crate::roi::FinancialReport;

/// Inputs and prediction of one yield simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSection {
    pub crop: String,
    pub region: String,
    pub soil_type: String,
    pub weather: String,
    /// Degrees Celsius
    pub temperature_c: f64,
    /// Millimetres
    pub rainfall_mm: f64,
    /// Tons per hectare
    pub predicted_yield: f64,
    pub fertilizer_used: bool,
    pub irrigation_used: bool,
}

/// Summary of one milk production forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkForecastSection {
    /// Length of the historical series
    pub total_months: usize,
    pub historical_mean: f64,
    pub forecast_mean: f64,
    /// Forecast horizon
    pub forecast_months: usize,
    pub variation_percent: f64,
    pub last_value: f64,
    pub first_forecast_value: f64,
}

/// Summary of one cattle counting run over a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CattleDetectionSection {
    pub frames_processed: usize,
    pub mean_count: f64,
    pub max_count: usize,
    /// Mean inference rate (frames/second)
    pub mean_fps: f64,
    pub filename: String,
}

/// Names of the context sections, in summary order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Simulation,
    Roi,
    MilkForecast,
    CattleDetection,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulation => "simulation",
            Self::Roi => "roi",
            Self::MilkForecast => "milk_forecast",
            Self::CattleDetection => "cattle_detection",
        }
    }

    pub fn all() -> &'static [Section] {
        &[
            Self::Simulation,
            Self::Roi,
            Self::MilkForecast,
            Self::CattleDetection,
        ]
    }
}

/// Results of every analysis run in the current session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<FinancialReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milk_forecast: Option<MilkForecastSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cattle_detection: Option<CattleDetectionSection>,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_simulation(&mut self, section: SimulationSection) {
        self.simulation = Some(section);
    }

    pub fn set_roi(&mut self, report: FinancialReport) {
        self.roi = Some(report);
    }

    pub fn set_milk_forecast(&mut self, section: MilkForecastSection) {
        self.milk_forecast = Some(section);
    }

    pub fn set_cattle_detection(&mut self, section: CattleDetectionSection) {
        self.cattle_detection = Some(section);
    }

    /// Whether a section is populated
    pub fn has(&self, section: Section) -> bool {
        match section {
            Section::Simulation => self.simulation.is_some(),
            Section::Roi => self.roi.is_some(),
            Section::MilkForecast => self.milk_forecast.is_some(),
            Section::CattleDetection => self.cattle_detection.is_some(),
        }
    }

    /// Populated sections, in summary order
    pub fn available_sections(&self) -> Vec<Section> {
        Section::all()
            .iter()
            .copied()
            .filter(|s| self.has(*s))
            .collect()
    }

    /// True when no analysis has run yet
    pub fn is_empty(&self) -> bool {
        Section::all().iter().all(|s| !self.has(*s))
    }

    /// Drop every section (start over)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Pretty JSON of the populated sections, as handed to the language model
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
