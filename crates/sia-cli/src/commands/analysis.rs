//! Analysis commands: record simulator, forecast and detection results

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use sia_core::analysis::{percentile_of, read_frame_metrics, read_series, YieldBand};
use sia_core::{
    CattleDetectionSection, MilkForecastSection, RoiEngine, SiaConfig, SimulationSection,
};

use super::roi::print_report;
use super::{open_session, save_session};
use crate::cli::SimulateArgs;

pub fn cmd_simulate(session_path: &Path, config: &SiaConfig, args: &SimulateArgs) -> Result<()> {
    if args.rainfall < 0.0 {
        bail!("Rainfall cannot be negative");
    }

    let reference = match &args.reference {
        Some(path) => Some(read_series_file(path)?),
        None => None,
    };

    let mut session = open_session(session_path)?;
    let engine = RoiEngine::new(config.pricing.clone());
    let section = SimulationSection {
        crop: args.crop.clone(),
        region: args.region.clone(),
        soil_type: args.soil.clone(),
        weather: args.weather.clone(),
        temperature_c: args.temperature,
        rainfall_mm: args.rainfall,
        predicted_yield: args.predicted_yield,
        fertilizer_used: args.fertilizer,
        irrigation_used: args.irrigation,
    };

    let report = session.context.record_simulation(&engine, section);
    save_session(session_path, &session)?;

    print_report(&report);

    if let Some(reference) = reference {
        match percentile_of(args.predicted_yield, &reference) {
            Some(percentile) => println!(
                "   Yield band: {} (percentile {:.0} of {} references)",
                YieldBand::for_percentile(percentile).as_str(),
                percentile,
                reference.len()
            ),
            None => println!("   Yield band: no reference predictions"),
        }
    }

    println!();
    println!("Saved simulation and ROI to {}", session_path.display());
    Ok(())
}

pub fn cmd_milk(session_path: &Path, history: &Path, forecast: &Path) -> Result<()> {
    let history = read_series_file(history)?;
    let forecast = read_series_file(forecast)?;
    let section = MilkForecastSection::from_series(&history, &forecast)?;

    let mut session = open_session(session_path)?;
    session.context.set_milk_forecast(section.clone());
    save_session(session_path, &session)?;
    tracing::info!(months = section.forecast_months, "Recorded milk forecast");

    println!("🥛 Milk forecast");
    println!(
        "   Historical mean: {:.1} L over {} months (last {:.1} L)",
        section.historical_mean, section.total_months, section.last_value
    );
    println!(
        "   Forecast mean:   {:.1} L over {} months (first {:.1} L)",
        section.forecast_mean, section.forecast_months, section.first_forecast_value
    );
    println!("   Variation:       {:+.1}%", section.variation_percent);
    Ok(())
}

pub fn cmd_cattle(session_path: &Path, metrics: &Path, source: &str) -> Result<()> {
    let file =
        File::open(metrics).with_context(|| format!("Failed to open {}", metrics.display()))?;
    let frames = read_frame_metrics(file)
        .with_context(|| format!("Failed to parse {}", metrics.display()))?;
    let section = CattleDetectionSection::from_frames(&frames, source)?;

    let mut session = open_session(session_path)?;
    session.context.set_cattle_detection(section.clone());
    save_session(session_path, &session)?;
    tracing::info!(frames = section.frames_processed, "Recorded cattle detection");

    println!("🐄 Herd analysis of {}", section.filename);
    println!("   Frames:  {}", section.frames_processed);
    println!("   Mean:    {:.1} cows", section.mean_count);
    println!("   Maximum: {} cows", section.max_count);
    println!("   FPS:     {:.1}", section.mean_fps);
    Ok(())
}

fn read_series_file(path: &Path) -> Result<Vec<f64>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_series(file).with_context(|| format!("Failed to parse {}", path.display()))
}
