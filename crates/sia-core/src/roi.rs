//! ROI engine
//!
//! Deterministic financial scoring of one yield prediction (per hectare).
//! Every input is accepted: unknown crops use the default price and the
//! degenerate ratios (zero cost, zero revenue) are substituted, never divided.

use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;

/// Whether the harvest pays for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoiStatus {
    Profitable,
    Loss,
}

/// Recommendation tier, from the highest ROI band down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    /// roi > 80
    HighlyProfitable,
    /// 40 < roi <= 80
    Solid,
    /// 15 < roi <= 40
    Modest,
    /// 0 < roi <= 15
    Low,
    /// roi <= 0
    Loss,
}

impl RecommendationTier {
    /// Pick the tier for an ROI percentage (first match wins, top-down)
    pub fn for_roi(roi_percent: f64) -> Self {
        if roi_percent > 80.0 {
            Self::HighlyProfitable
        } else if roi_percent > 40.0 {
            Self::Solid
        } else if roi_percent > 15.0 {
            Self::Modest
        } else if roi_percent > 0.0 {
            Self::Low
        } else {
            Self::Loss
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::HighlyProfitable => {
                "Highly profitable: ROI above 80%. Investment strongly recommended."
            }
            Self::Solid => "Solid return, above the agricultural average. Investment is viable.",
            Self::Modest => {
                "Modest return, typical for agriculture. Review inputs and practices for improvement."
            }
            Self::Low => "Positive but low return. Optimize input use or consider switching crop.",
            Self::Loss => "Loss expected. Review costs, climate conditions, crop choice and region.",
        }
    }
}

/// Headline figures, rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub gross_revenue: f64,
    pub total_cost: f64,
    pub net_profit: f64,
    pub roi_percent: f64,
    pub payback_months: f64,
}

/// Cost components; unused inputs are reported as 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub base_cost: f64,
    pub fertilizer_cost: f64,
    pub irrigation_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub price_per_ton: f64,
    pub predicted_yield: f64,
    pub crop: String,
}

/// Output of one ROI calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub financial: FinancialSummary,
    pub cost_breakdown: CostBreakdown,
    pub market: MarketData,
    pub status: RoiStatus,
    pub tier: RecommendationTier,
    pub recommendation: String,
}

/// ROI calculator bound to a pricing table
#[derive(Debug, Clone, Default)]
pub struct RoiEngine {
    pricing: PricingConfig,
}

impl RoiEngine {
    pub fn new(pricing: PricingConfig) -> Self {
        Self { pricing }
    }

    /// Score one prediction
    ///
    /// Negative yields are not rejected; they simply produce a loss.
    pub fn compute(
        &self,
        crop: &str,
        predicted_yield_t_per_ha: f64,
        fertilizer_used: bool,
        irrigation_used: bool,
    ) -> FinancialReport {
        let pricing = &self.pricing;
        let price_per_ton = pricing.price_for(crop);
        let gross_revenue = predicted_yield_t_per_ha * price_per_ton;

        let fertilizer_cost = if fertilizer_used {
            pricing.fertilizer_cost
        } else {
            0.0
        };
        let irrigation_cost = if irrigation_used {
            pricing.irrigation_cost
        } else {
            0.0
        };
        let total_cost = pricing.base_cost + fertilizer_cost + irrigation_cost;

        let net_profit = gross_revenue - total_cost;
        let roi_percent = if total_cost > 0.0 {
            net_profit / total_cost * 100.0
        } else {
            0.0
        };
        let payback_months = if gross_revenue > 0.0 {
            total_cost / gross_revenue * 12.0
        } else {
            pricing.no_revenue_payback_months
        };

        let status = if net_profit > 0.0 {
            RoiStatus::Profitable
        } else {
            RoiStatus::Loss
        };
        let tier = RecommendationTier::for_roi(roi_percent);

        tracing::debug!(
            crop,
            price_per_ton,
            gross_revenue,
            total_cost,
            roi_percent,
            "Computed ROI"
        );

        FinancialReport {
            financial: FinancialSummary {
                gross_revenue: round_to(gross_revenue, 2),
                total_cost: round_to(total_cost, 2),
                net_profit: round_to(net_profit, 2),
                roi_percent: round_to(roi_percent, 2),
                payback_months: round_to(payback_months, 1),
            },
            cost_breakdown: CostBreakdown {
                base_cost: pricing.base_cost,
                fertilizer_cost,
                irrigation_cost,
            },
            market: MarketData {
                price_per_ton,
                predicted_yield: round_to(predicted_yield_t_per_ha, 2),
                crop: crop.to_string(),
            },
            status,
            tier,
            recommendation: tier.message().to_string(),
        }
    }
}

/// Score a prediction with the default price table
pub fn compute_roi(
    crop: &str,
    predicted_yield_t_per_ha: f64,
    fertilizer_used: bool,
    irrigation_used: bool,
) -> FinancialReport {
    RoiEngine::default().compute(
        crop,
        predicted_yield_t_per_ha,
        fertilizer_used,
        irrigation_used,
    )
}

/// Round half away from zero to `decimals` places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_pricing() -> PricingConfig {
        PricingConfig {
            base_cost: 0.0,
            fertilizer_cost: 0.0,
            irrigation_cost: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_rice_with_fertilizer() {
        let report = compute_roi("Rice", 4.0, true, false);

        assert_eq!(report.financial.gross_revenue, 7200.0);
        assert_eq!(report.financial.total_cost, 5700.0);
        assert_eq!(report.financial.net_profit, 1500.0);
        assert_eq!(report.financial.roi_percent, 26.32);
        assert_eq!(report.financial.payback_months, 9.5);
        assert_eq!(report.status, RoiStatus::Profitable);
        assert_eq!(report.tier, RecommendationTier::Modest);
        assert_eq!(report.cost_breakdown.fertilizer_cost, 2500.0);
        assert_eq!(report.cost_breakdown.irrigation_cost, 0.0);
        assert_eq!(report.market.price_per_ton, 1800.0);
    }

    #[test]
    fn test_unknown_crop_uses_default_price() {
        let report = compute_roi("Quinoa", 5.0, true, true);

        assert_eq!(report.market.price_per_ton, 1000.0);
        assert_eq!(report.market.crop, "Quinoa");
        assert_eq!(report.financial.gross_revenue, 5000.0);
        assert_eq!(report.financial.total_cost, 6900.0);
        assert_eq!(report.status, RoiStatus::Loss);
        assert_eq!(report.tier, RecommendationTier::Loss);
    }

    #[test]
    fn test_roi_matches_profit_over_cost() {
        for (crop, yield_t, fert, irr) in [
            ("Cotton", 3.1, true, true),
            ("Wheat", 2.0, false, false),
            ("Soybeans", 6.7, false, true),
        ] {
            let report = compute_roi(crop, yield_t, fert, irr);
            let f = &report.financial;
            let expected = f.net_profit / f.total_cost * 100.0;
            assert!((f.roi_percent - expected).abs() < 0.01, "{}", crop);
            assert_eq!(
                report.status == RoiStatus::Profitable,
                f.net_profit > 0.0,
                "{}",
                crop
            );
        }
    }

    #[test]
    fn test_zero_cost_gives_zero_roi() {
        let engine = RoiEngine::new(free_pricing());
        let report = engine.compute("Rice", 3.0, true, true);

        assert_eq!(report.financial.total_cost, 0.0);
        assert_eq!(report.financial.roi_percent, 0.0);
        assert_eq!(report.status, RoiStatus::Profitable);
        assert_eq!(report.tier, RecommendationTier::Loss);
    }

    #[test]
    fn test_zero_revenue_uses_payback_sentinel() {
        let report = compute_roi("Rice", 0.0, false, false);

        assert_eq!(report.financial.gross_revenue, 0.0);
        assert_eq!(report.financial.payback_months, 999.0);
        assert_eq!(report.status, RoiStatus::Loss);
    }

    #[test]
    fn test_negative_yield_is_a_loss() {
        let report = compute_roi("Rice", -1.0, false, false);
        assert_eq!(report.financial.payback_months, 999.0);
        assert_eq!(report.status, RoiStatus::Loss);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(RecommendationTier::for_roi(80.01), RecommendationTier::HighlyProfitable);
        assert_eq!(RecommendationTier::for_roi(80.0), RecommendationTier::Solid);
        assert_eq!(RecommendationTier::for_roi(40.0), RecommendationTier::Modest);
        assert_eq!(RecommendationTier::for_roi(15.0), RecommendationTier::Low);
        assert_eq!(RecommendationTier::for_roi(0.0), RecommendationTier::Loss);
        assert_eq!(RecommendationTier::for_roi(-250.0), RecommendationTier::Loss);
        assert_eq!(RecommendationTier::for_roi(f64::MAX), RecommendationTier::HighlyProfitable);
    }

    #[test]
    fn test_recommendation_text_follows_tier() {
        let report = compute_roi("Cotton", 10.0, false, false);
        assert_eq!(report.tier, RecommendationTier::HighlyProfitable);
        assert_eq!(report.recommendation, report.tier.message());
    }

    #[test]
    fn test_report_serialization_shape() {
        let json = serde_json::to_value(compute_roi("Rice", 4.0, true, false)).unwrap();
        assert_eq!(json["status"], "profitable");
        assert_eq!(json["tier"], "modest");
        assert_eq!(json["financial"]["roi_percent"], 26.32);
        assert_eq!(json["cost_breakdown"]["base_cost"], 3200.0);
        assert_eq!(json["market"]["crop"], "Rice");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(26.315789, 2), 26.32);
        assert_eq!(round_to(9.46, 1), 9.5);
        assert_eq!(round_to(-1.005, 0), -1.0);
    }
}
