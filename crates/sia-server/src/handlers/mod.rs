//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analysis;
pub mod chat;
pub mod health;
pub mod roi;
pub mod sessions;

// Re-export all handlers for use in router
pub use analysis::*;
pub use chat::*;
pub use health::*;
pub use roi::*;
pub use sessions::*;
