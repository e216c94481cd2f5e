//! SIA Core Library
//!
//! Shared functionality for the SIA agricultural decision-support tool:
//! - ROI engine for yield predictions
//! - Analysis context shared by the simulator, milk forecast and cattle counter
//! - Section builders for the external analysis models
//! - Contextual assistant (deterministic rules + remote model fallback)
//! - Pluggable remote model backends (Groq, OpenAI-compatible, mock)
//! - Prompt library for customizable model instructions
//! - Pricing and assistant configuration

pub mod ai;
pub mod analysis;
pub mod assistant;
pub mod config;
pub mod context;
pub mod error;
pub mod labels;
pub mod prompts;
pub mod roi;
pub mod session;

/// Test utilities including a mock chat completions server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, MockBackend, MockReply, OpenAICompatibleBackend};
pub use analysis::{percentile_of, Detection, FrameMetrics, YieldBand};
pub use assistant::{Assistant, RuleKind};
pub use config::{AssistantSettings, PricingConfig, SiaConfig};
pub use context::{
    AnalysisContext, CattleDetectionSection, MilkForecastSection, Section, SimulationSection,
};
pub use error::{Error, Result};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use roi::{
    compute_roi, CostBreakdown, FinancialReport, FinancialSummary, MarketData,
    RecommendationTier, RoiEngine, RoiStatus,
};
pub use session::{ChatMessage, Role, Session};
