//! Yield simulation recording and yield bands

use serde::{Deserialize, Serialize};

use crate::context::{AnalysisContext, SimulationSection};
use crate::roi::{round_to, FinancialReport, RoiEngine};

/// Qualitative position of a prediction among the simulator's references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YieldBand {
    Low,
    Moderate,
    Good,
    Excellent,
}

impl YieldBand {
    pub fn for_percentile(percentile: f64) -> Self {
        if percentile < 25.0 {
            Self::Low
        } else if percentile < 50.0 {
            Self::Moderate
        } else if percentile < 75.0 {
            Self::Good
        } else {
            Self::Excellent
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

/// Share of reference predictions at or below `prediction`, in percent
///
/// Returns None for an empty reference set.
pub fn percentile_of(prediction: f64, reference: &[f64]) -> Option<f64> {
    if reference.is_empty() {
        return None;
    }
    let at_or_below = reference.iter().filter(|p| **p <= prediction).count();
    Some(at_or_below as f64 / reference.len() as f64 * 100.0)
}

impl AnalysisContext {
    /// Record a simulation and the ROI report computed from it
    ///
    /// Writes `simulation` and `roi`; the other sections are left alone.
    pub fn record_simulation(
        &mut self,
        engine: &RoiEngine,
        mut section: SimulationSection,
    ) -> FinancialReport {
        let report = engine.compute(
            &section.crop,
            section.predicted_yield,
            section.fertilizer_used,
            section.irrigation_used,
        );
        section.predicted_yield = round_to(section.predicted_yield, 2);

        tracing::info!(
            crop = %section.crop,
            predicted_yield = section.predicted_yield,
            roi_percent = report.financial.roi_percent,
            "Recorded simulation"
        );

        self.set_simulation(section);
        self.set_roi(report.clone());
        report
    }
}
