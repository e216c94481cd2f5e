//! Analysis context commands

use std::path::Path;

use anyhow::Result;
use sia_core::labels::translate;
use sia_core::Section;

use super::{open_session, save_session};

pub fn cmd_context_show(session_path: &Path, json: bool) -> Result<()> {
    let session = open_session(session_path)?;
    let ctx = &session.context;

    if json {
        println!("{}", serde_json::to_string_pretty(ctx)?);
        return Ok(());
    }

    if ctx.is_empty() {
        println!("No analyses recorded in {}", session_path.display());
        return Ok(());
    }

    for section in ctx.available_sections() {
        match section {
            Section::Simulation => {
                if let Some(sim) = &ctx.simulation {
                    println!("🌾 Simulation");
                    println!(
                        "   {} ({}) in {} ({}), {} soil, {} weather",
                        sim.crop,
                        translate(&sim.crop),
                        sim.region,
                        translate(&sim.region),
                        translate(&sim.soil_type),
                        translate(&sim.weather)
                    );
                    println!(
                        "   {:.1} °C, {:.0} mm rain, fertilizer: {}, irrigation: {}",
                        sim.temperature_c,
                        sim.rainfall_mm,
                        yes_no(sim.fertilizer_used),
                        yes_no(sim.irrigation_used)
                    );
                    println!("   Predicted yield: {} t/ha", sim.predicted_yield);
                }
            }
            Section::Roi => {
                if let Some(roi) = &ctx.roi {
                    println!("💰 ROI");
                    println!(
                        "   {:.2}% (net R$ {:.2}/ha, payback {:.1} months)",
                        roi.financial.roi_percent,
                        roi.financial.net_profit,
                        roi.financial.payback_months
                    );
                    println!("   {}", roi.recommendation);
                }
            }
            Section::MilkForecast => {
                if let Some(milk) = &ctx.milk_forecast {
                    println!("🥛 Milk forecast");
                    println!(
                        "   {:.1} L -> {:.1} L over {} months ({:+.1}%)",
                        milk.historical_mean,
                        milk.forecast_mean,
                        milk.forecast_months,
                        milk.variation_percent
                    );
                }
            }
            Section::CattleDetection => {
                if let Some(cattle) = &ctx.cattle_detection {
                    println!("🐄 Cattle detection ({})", cattle.filename);
                    println!(
                        "   {} frames, mean {:.1} cows, max {}",
                        cattle.frames_processed, cattle.mean_count, cattle.max_count
                    );
                }
            }
        }
        println!();
    }
    Ok(())
}

pub fn cmd_context_clear(session_path: &Path) -> Result<()> {
    let mut session = open_session(session_path)?;
    session.context.clear();
    save_session(session_path, &session)?;

    println!("Cleared all analyses from {}", session_path.display());
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
