//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// SIA - Agricultural decision support
#[derive(Parser)]
#[command(name = "sia")]
#[command(about = "Crop ROI, milk forecast and herd analysis with a contextual assistant", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Session file (analysis context and chat history)
    #[arg(long, default_value = "sia-session.json", global = true)]
    pub session: PathBuf,

    /// Config file (defaults to the data dir override, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the ROI of a yield prediction (does not touch the session)
    Roi {
        /// Crop name (dataset name or Portuguese label)
        #[arg(long)]
        crop: String,

        /// Predicted yield in tons per hectare
        #[arg(long = "yield", allow_negative_numbers = true)]
        predicted_yield: f64,

        /// Fertilizer is applied
        #[arg(long)]
        fertilizer: bool,

        /// Irrigation is used
        #[arg(long)]
        irrigation: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a yield simulation and its ROI in the session
    Simulate(SimulateArgs),

    /// Record a milk production forecast in the session
    Milk {
        /// Historical monthly production, one value per line
        #[arg(long)]
        history: PathBuf,

        /// Forecast monthly production, one value per line
        #[arg(long)]
        forecast: PathBuf,
    },

    /// Record a cattle counting run in the session
    Cattle {
        /// Per-frame metrics CSV (frame,inference_secs,cows)
        #[arg(long)]
        metrics: PathBuf,

        /// Name of the analyzed video
        #[arg(long)]
        source: String,
    },

    /// Ask the assistant a question about the session's analyses
    Ask {
        /// The question (quotes optional)
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Show or reset the analysis context
    Context {
        #[command(subcommand)]
        action: Option<ContextAction>,

        /// Print the context as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the chat history
    History {
        /// Clear the history (analyses are kept)
        #[arg(long)]
        clear: bool,
    },

    /// Show the active price table and production costs
    Prices,

    /// List prompts and their override status
    Prompts,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(Subcommand)]
pub enum ContextAction {
    /// Remove every analysis from the session
    Clear,
}

/// Inputs of one yield simulation
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[arg(long)]
    pub crop: String,

    #[arg(long)]
    pub region: String,

    #[arg(long)]
    pub soil: String,

    #[arg(long)]
    pub weather: String,

    /// Mean temperature (°C)
    #[arg(long, allow_negative_numbers = true)]
    pub temperature: f64,

    /// Rainfall (mm)
    #[arg(long)]
    pub rainfall: f64,

    /// Yield predicted by the model (t/ha)
    #[arg(long, allow_negative_numbers = true)]
    pub predicted_yield: f64,

    #[arg(long)]
    pub fertilizer: bool,

    #[arg(long)]
    pub irrigation: bool,

    /// Reference predictions, one per line, for the yield band
    #[arg(long)]
    pub reference: Option<PathBuf>,
}
