//! Deterministic answers from the analysis context
//!
//! Rules are evaluated top-down and the first one that applies wins. A rule
//! applies when its section is populated and the lower-cased question
//! contains one of its keywords (plain substring match, Portuguese and
//! English). Order matters: a question about "roi" and "fertilizante" is a
//! finance question.

use crate::config::{AssistantSettings, PricingConfig};
use crate::context::{AnalysisContext, CattleDetectionSection, MilkForecastSection, Section};

/// Reply to a summary request when no section is populated
pub const NO_ANALYSIS_MESSAGE: &str = "No analyses yet. Run a simulation, forecast or detection first!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Finance,
    Fertilizer,
    Irrigation,
    Improvement,
    MilkForecast,
    Livestock,
    Summary,
}

struct Rule {
    kind: RuleKind,
    /// Section that must be populated, if any
    requires: Option<Section>,
    keywords: &'static [&'static str],
}

const RULES: &[Rule] = &[
    Rule {
        kind: RuleKind::Finance,
        requires: Some(Section::Simulation),
        keywords: &["roi", "lucro", "profit", "retorno", "return", "vale", "worth"],
    },
    Rule {
        kind: RuleKind::Fertilizer,
        requires: Some(Section::Simulation),
        keywords: &["fertiliz"],
    },
    Rule {
        kind: RuleKind::Irrigation,
        requires: Some(Section::Simulation),
        keywords: &[
            "irrigação", "irrigacao", "irrigar", "irrigat", "água", "agua", "water",
        ],
    },
    Rule {
        kind: RuleKind::Improvement,
        requires: Some(Section::Simulation),
        keywords: &[
            "melhorar", "improve", "otimizar", "optimiz", "aumentar", "increase",
        ],
    },
    Rule {
        kind: RuleKind::MilkForecast,
        requires: Some(Section::MilkForecast),
        keywords: &[
            "leite", "milk", "produção", "producao", "production", "previsão", "previsao",
            "forecast", "litros", "liters", "litres",
        ],
    },
    Rule {
        kind: RuleKind::Livestock,
        requires: Some(Section::CattleDetection),
        keywords: &["gado", "cattle", "vaca", "cow", "animal", "rebanho", "herd"],
    },
    Rule {
        kind: RuleKind::Summary,
        requires: None,
        keywords: &["resumo", "summary", "tudo", "all", "geral", "overall", "status"],
    },
];

/// First rule that applies to `question` under `ctx`
pub fn match_rule(question: &str, ctx: &AnalysisContext) -> Option<RuleKind> {
    let question = question.to_lowercase();
    RULES
        .iter()
        .find(|rule| {
            rule.requires.map_or(true, |s| ctx.has(s))
                && rule.keywords.iter().any(|k| question.contains(k))
        })
        .map(|rule| rule.kind)
}

/// Format the answer for a matched rule
///
/// Returns None when the section the rule reads is not populated.
pub fn answer(
    kind: RuleKind,
    ctx: &AnalysisContext,
    settings: &AssistantSettings,
    pricing: &PricingConfig,
) -> Option<String> {
    match kind {
        RuleKind::Summary => Some(summary(ctx)),
        RuleKind::MilkForecast => ctx.milk_forecast.as_ref().map(milk_answer),
        RuleKind::Livestock => ctx.cattle_detection.as_ref().map(livestock_answer),
        RuleKind::Finance => ctx.simulation.as_ref().map(|sim| {
            let (roi, profit) = ctx
                .roi
                .as_ref()
                .map(|r| (r.financial.roi_percent, r.financial.net_profit))
                .unwrap_or((0.0, 0.0));
            let verdict = if roi > settings.roi_threshold_percent {
                "Profitable investment!"
            } else {
                "Review your costs."
            };
            format!(
                "ROI: {:.1}%\nNet profit: R$ {}/ha\nCrop: {}\n{}",
                roi,
                group_thousands(profit),
                sim.crop,
                verdict
            )
        }),
        RuleKind::Fertilizer => ctx.simulation.as_ref().map(|sim| {
            if sim.fertilizer_used {
                format!(
                    "Fertilizer: used (R$ {}/ha)",
                    group_thousands(pricing.fertilizer_cost)
                )
            } else {
                format!(
                    "Fertilizer: not used. Add it for +{}% yield!",
                    settings.fertilizer_gain_percent
                )
            }
        }),
        RuleKind::Irrigation => ctx.simulation.as_ref().map(|sim| {
            if sim.irrigation_used {
                format!(
                    "Irrigation: used (R$ {}/ha)",
                    group_thousands(pricing.irrigation_cost)
                )
            } else {
                format!(
                    "Irrigation: not used. With {} mm of rain, irrigation is recommended!",
                    sim.rainfall_mm
                )
            }
        }),
        RuleKind::Improvement => ctx.simulation.as_ref().map(|sim| {
            let mut tips = Vec::new();
            if !sim.fertilizer_used {
                tips.push(format!("- Fertilizer (+{}%)", settings.fertilizer_gain_percent));
            }
            if !sim.irrigation_used {
                tips.push(format!("- Irrigation (+{}%)", settings.irrigation_gain_percent));
            }
            if tips.is_empty() {
                "Suggestions:\nAlready optimized!".to_string()
            } else {
                format!("Suggestions:\n{}", tips.join("\n"))
            }
        }),
    }
}

fn milk_answer(milk: &MilkForecastSection) -> String {
    let trend = if milk.variation_percent > 0.0 {
        "Positive trend!"
    } else {
        "Decline expected."
    };
    format!(
        "Milk production:\nHistorical mean: {:.1} L\nForecast ({} months): {:.1} L\nVariation: {:+.1}%\n{}",
        milk.historical_mean,
        milk.forecast_months,
        milk.forecast_mean,
        milk.variation_percent,
        trend
    )
}

fn livestock_answer(cattle: &CattleDetectionSection) -> String {
    format!(
        "Herd analysis:\nFrames: {}\nMean: {:.1} cows\nMaximum: {} cows\nFPS: {:.1}",
        cattle.frames_processed, cattle.mean_count, cattle.max_count, cattle.mean_fps
    )
}

/// One line per populated section, simulation first
fn summary(ctx: &AnalysisContext) -> String {
    let mut lines = Vec::new();

    if let Some(sim) = &ctx.simulation {
        let roi = ctx.roi.as_ref().map_or(0.0, |r| r.financial.roi_percent);
        lines.push(format!(
            "Yield: {:.2} t/ha (ROI {:.1}%)",
            sim.predicted_yield, roi
        ));
    }
    if let Some(milk) = &ctx.milk_forecast {
        lines.push(format!(
            "Milk: {:.1} L ({:+.1}%)",
            milk.forecast_mean, milk.variation_percent
        ));
    }
    if let Some(cattle) = &ctx.cattle_detection {
        lines.push(format!(
            "Cattle: {:.1} cows (max {})",
            cattle.mean_count, cattle.max_count
        ));
    }

    if lines.is_empty() {
        NO_ANALYSIS_MESSAGE.to_string()
    } else {
        format!("OVERALL SUMMARY:\n\n{}", lines.join("\n"))
    }
}

/// Whole number with comma thousands separators (1500.4 -> "1,500")
pub(crate) fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
