//! ROI and price table commands

use anyhow::Result;
use sia_core::labels::translate;
use sia_core::{FinancialReport, RoiEngine, RoiStatus, SiaConfig};

pub fn cmd_roi(
    config: &SiaConfig,
    crop: &str,
    predicted_yield: f64,
    fertilizer: bool,
    irrigation: bool,
    json: bool,
) -> Result<()> {
    let engine = RoiEngine::new(config.pricing.clone());
    let report = engine.compute(crop, predicted_yield, fertilizer, irrigation);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

pub fn cmd_prices(config: &SiaConfig) -> Result<()> {
    let pricing = &config.pricing;

    println!("Crop prices (R$/t):\n");
    for (crop, price) in &pricing.crops {
        println!("  {:<12} {:<16} {:>10.2}", crop, translate(crop), price);
    }
    println!(
        "  {:<12} {:<16} {:>10.2}",
        "(other)", "", pricing.default_price_per_ton
    );

    println!();
    println!("Costs (R$/ha):");
    println!("  Base (seed, labor, machinery)  {:>10.2}", pricing.base_cost);
    println!("  Fertilizer                     {:>10.2}", pricing.fertilizer_cost);
    println!("  Irrigation                     {:>10.2}", pricing.irrigation_cost);

    println!();
    match &config.source {
        Some(path) => println!("Source: {}", path.display()),
        None => println!("Source: built-in defaults"),
    }
    Ok(())
}

pub(crate) fn print_report(report: &FinancialReport) {
    let f = &report.financial;
    let c = &report.cost_breakdown;
    let m = &report.market;

    let status = match report.status {
        RoiStatus::Profitable => "✅ Profitable",
        RoiStatus::Loss => "❌ Loss",
    };

    println!(
        "🌾 {} ({}) - {:.2} t/ha at R$ {:.2}/t",
        m.crop,
        translate(&m.crop),
        m.predicted_yield,
        m.price_per_ton
    );
    println!();
    println!("   Gross revenue:  R$ {:>12.2}", f.gross_revenue);
    println!("   Total cost:     R$ {:>12.2}", f.total_cost);
    println!("     base          R$ {:>12.2}", c.base_cost);
    println!("     fertilizer    R$ {:>12.2}", c.fertilizer_cost);
    println!("     irrigation    R$ {:>12.2}", c.irrigation_cost);
    println!("   Net profit:     R$ {:>12.2}", f.net_profit);
    println!("   ROI:               {:>12.2}%", f.roi_percent);
    println!("   Payback:           {:>12.1} months", f.payback_months);
    println!();
    println!("   {}", status);
    println!("   {}", report.recommendation);
}
