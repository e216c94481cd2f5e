//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analysis` - Record simulations, milk forecasts and cattle detections
//! - `assistant` - Ask the assistant, show or clear the chat history
//! - `context` - Show or clear the analysis context
//! - `core` - Shared utilities (config, session file, assistant setup)
//! - `prompts` - Prompt library listing
//! - `roi` - Stateless ROI calculation and price table
//! - `serve` - Web server command

pub mod analysis;
pub mod assistant;
pub mod context;
pub mod core;
pub mod prompts;
pub mod roi;
pub mod serve;

// Re-export command functions for main.rs
pub use analysis::*;
pub use assistant::*;
pub use context::*;
pub use core::*;
pub use prompts::*;
pub use roi::*;
pub use serve::*;
