//! Section builders for the external analyses
//!
//! The yield regressor, the milk forecaster and the cattle detector are not
//! part of this crate. These modules turn what they produce into context
//! sections.

pub mod cattle;
pub mod milk;
pub mod simulation;

pub use cattle::{read_frame_metrics, Detection, FrameMetrics, COW_CLASS, MIN_CONFIDENCE};
pub use milk::read_series;
pub use simulation::{percentile_of, YieldBand};
