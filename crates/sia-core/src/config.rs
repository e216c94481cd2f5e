//! Pricing and assistant configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/sia/config/sia.toml),
//!    or an explicit path passed by the caller
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Override files may be partial; any key they leave out keeps its default.
//!
//! Credentials (GROQ_API_KEY, AI_BACKEND, ...) live in the environment. A
//! `.env` file may supply them; variables already set always win.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::labels;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/sia.toml");

/// Market prices and production costs used by the ROI engine
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    /// Price per ton by dataset crop name (R$/t)
    pub crops: BTreeMap<String, f64>,
    /// Price for crops missing from `crops`
    pub default_price_per_ton: f64,
    /// Reported payback when gross revenue is zero
    pub no_revenue_payback_months: f64,
    /// Seeds, labor and machinery (R$/ha)
    pub base_cost: f64,
    /// Fertilizer cost when used (R$/ha)
    pub fertilizer_cost: f64,
    /// Irrigation energy cost when used (R$/ha)
    pub irrigation_cost: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let crops = [
            ("Rice", 1800.0),
            ("Wheat", 900.0),
            ("Corn", 850.0),
            ("Maize", 850.0),
            ("Barley", 800.0),
            ("Soybeans", 1500.0),
            ("Soybean", 1500.0),
            ("Cotton", 3200.0),
        ]
        .into_iter()
        .map(|(name, price)| (name.to_string(), price))
        .collect();

        Self {
            crops,
            default_price_per_ton: 1000.0,
            no_revenue_payback_months: 999.0,
            base_cost: 3200.0,
            fertilizer_cost: 2500.0,
            irrigation_cost: 1200.0,
        }
    }
}

impl PricingConfig {
    /// Price per ton for a crop
    ///
    /// Accepts dataset names ("Rice") and display labels ("Arroz"). Unknown
    /// crops get `default_price_per_ton` instead of an error.
    pub fn price_for(&self, crop: &str) -> f64 {
        self.known_price(crop)
            .unwrap_or(self.default_price_per_ton)
    }

    /// Price per ton if the crop is in the table
    pub fn known_price(&self, crop: &str) -> Option<f64> {
        let crop = crop.trim();
        self.crops
            .get(crop)
            .or_else(|| self.crops.get(labels::original(crop)))
            .copied()
    }
}

/// Settings for the contextual assistant
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantSettings {
    /// Language the remote model is asked to answer in
    pub language: String,
    /// Sampling temperature for the remote model
    pub temperature: f32,
    /// ROI above which the finance answer calls the investment profitable
    pub roi_threshold_percent: f64,
    /// Expected yield gain quoted when recommending fertilizer
    pub fertilizer_gain_percent: u32,
    /// Expected yield gain quoted when recommending irrigation
    pub irrigation_gain_percent: u32,
    /// Longest error detail shown to the user
    pub error_detail_max_chars: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            temperature: 0.7,
            roi_threshold_percent: 30.0,
            fertilizer_gain_percent: 25,
            irrigation_gain_percent: 20,
            error_detail_max_chars: 100,
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiaConfig {
    pub pricing: PricingConfig,
    pub assistant: AssistantSettings,
    /// Where the config came from (None = embedded defaults)
    pub source: Option<PathBuf>,
}

impl SiaConfig {
    /// Load from the default override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "Config file {} does not exist",
                path.display()
            )));
        }
        load_config(Some(path))
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("sia").join("config").join("sia.toml"))
}

/// `.env` files to read, in priority order
///
/// The working directory comes first, then `config/.env`, then the data dir.
pub fn env_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(".env"), Path::new("config").join(".env")];
    if let Some(dir) = dirs::data_local_dir() {
        candidates.push(dir.join("sia").join("config").join(".env"));
    }
    candidates
}

/// Load variables from a `.env` file without overriding the environment
///
/// Returns false when the file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }

    dotenvy::from_path(path).map_err(|e| {
        Error::InvalidData(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Ok(true)
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<SiaConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    let Some(path) = path else {
        return parse_config(DEFAULT_CONFIG);
    };

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::InvalidData(format!("Failed to read config: {}", e)))?;
    let mut config = parse_config(&content)?;
    config.source = Some(path);
    Ok(config)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    pricing: Option<RawPricing>,
    costs: Option<RawCosts>,
    assistant: Option<RawAssistant>,
}

#[derive(Debug, Deserialize)]
struct RawPricing {
    default_price_per_ton: Option<f64>,
    no_revenue_payback_months: Option<f64>,
    crops: Option<HashMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
struct RawCosts {
    base: Option<f64>,
    fertilizer: Option<f64>,
    irrigation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawAssistant {
    language: Option<String>,
    temperature: Option<f32>,
    roi_threshold_percent: Option<f64>,
    fertilizer_gain_percent: Option<u32>,
    irrigation_gain_percent: Option<u32>,
    error_detail_max_chars: Option<usize>,
}

/// Parse config from TOML content, layering it over the defaults
pub fn parse_config(content: &str) -> Result<SiaConfig> {
    let raw: RawConfig = toml::from_str(content)?;
    let mut config = SiaConfig::default();

    if let Some(pricing) = raw.pricing {
        if let Some(price) = pricing.default_price_per_ton {
            config.pricing.default_price_per_ton = price;
        }
        if let Some(months) = pricing.no_revenue_payback_months {
            config.pricing.no_revenue_payback_months = months;
        }
        if let Some(crops) = pricing.crops {
            config.pricing.crops.extend(crops);
        }
    }

    if let Some(costs) = raw.costs {
        if let Some(base) = costs.base {
            config.pricing.base_cost = base;
        }
        if let Some(fertilizer) = costs.fertilizer {
            config.pricing.fertilizer_cost = fertilizer;
        }
        if let Some(irrigation) = costs.irrigation {
            config.pricing.irrigation_cost = irrigation;
        }
    }

    if let Some(assistant) = raw.assistant {
        let settings = &mut config.assistant;
        if let Some(language) = assistant.language {
            settings.language = language;
        }
        if let Some(temperature) = assistant.temperature {
            settings.temperature = temperature;
        }
        if let Some(threshold) = assistant.roi_threshold_percent {
            settings.roi_threshold_percent = threshold;
        }
        if let Some(gain) = assistant.fertilizer_gain_percent {
            settings.fertilizer_gain_percent = gain;
        }
        if let Some(gain) = assistant.irrigation_gain_percent {
            settings.irrigation_gain_percent = gain;
        }
        if let Some(max) = assistant.error_detail_max_chars {
            settings.error_detail_max_chars = max;
        }
    }

    validate(&config.pricing)?;
    Ok(config)
}

fn validate(pricing: &PricingConfig) -> Result<()> {
    let costs = [
        ("costs.base", pricing.base_cost),
        ("costs.fertilizer", pricing.fertilizer_cost),
        ("costs.irrigation", pricing.irrigation_cost),
        ("pricing.default_price_per_ton", pricing.default_price_per_ton),
        (
            "pricing.no_revenue_payback_months",
            pricing.no_revenue_payback_months,
        ),
    ];
    for (key, value) in costs {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidData(format!(
                "{} must be a non-negative number, got {}",
                key, value
            )));
        }
    }

    if let Some((crop, price)) = pricing
        .crops
        .iter()
        .find(|(_, price)| !price.is_finite() || **price < 0.0)
    {
        return Err(Error::InvalidData(format!(
            "Price for {} must be a non-negative number, got {}",
            crop, price
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = SiaConfig::embedded().unwrap();
        assert_eq!(config.pricing, PricingConfig::default());
        assert_eq!(config.assistant, AssistantSettings::default());
        assert!(config.source.is_none());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = parse_config(
            r#"
[costs]
fertilizer = 900.0

[pricing.crops]
Quinoa = 4200.0
"#,
        )
        .unwrap();

        assert_eq!(config.pricing.fertilizer_cost, 900.0);
        assert_eq!(config.pricing.base_cost, 3200.0);
        assert_eq!(config.pricing.price_for("Quinoa"), 4200.0);
        assert_eq!(config.pricing.price_for("Rice"), 1800.0);
        assert_eq!(config.assistant.roi_threshold_percent, 30.0);
    }

    #[test]
    fn test_unknown_crop_uses_default_price() {
        let pricing = PricingConfig::default();
        assert_eq!(pricing.price_for("Quinoa"), 1000.0);
        assert_eq!(pricing.known_price("Quinoa"), None);
    }

    #[test]
    fn test_price_lookup_accepts_display_labels() {
        let pricing = PricingConfig::default();
        assert_eq!(pricing.price_for("Arroz"), 1800.0);
        assert_eq!(pricing.price_for(" Cotton "), 3200.0);
    }

    #[test]
    fn test_negative_cost_rejected() {
        let result = parse_config("[costs]\nbase = -1.0\n");
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_negative_payback_sentinel_rejected() {
        let result = parse_config("[pricing]\nno_revenue_payback_months = -1.0\n");
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = parse_config("[costs\nbase = 1");
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = SiaConfig::load_from(Path::new("/nonexistent/sia.toml"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sia.toml");
        fs::write(&path, "[assistant]\nlanguage = \"Portuguese\"\n").unwrap();

        let config = SiaConfig::load_from(&path).unwrap();
        assert_eq!(config.assistant.language, "Portuguese");
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_missing_env_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_env_file(&dir.path().join(".env")).unwrap());
    }

    #[test]
    fn test_env_file_does_not_override_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "SIA_CONFIG_TEST_KEPT=from_file\nSIA_CONFIG_TEST_ADDED=from_file\n",
        )
        .unwrap();
        std::env::set_var("SIA_CONFIG_TEST_KEPT", "from_env");

        assert!(load_env_file(&path).unwrap());
        assert_eq!(std::env::var("SIA_CONFIG_TEST_KEPT").unwrap(), "from_env");
        assert_eq!(std::env::var("SIA_CONFIG_TEST_ADDED").unwrap(), "from_file");
    }

    #[test]
    fn test_env_file_candidates_start_with_working_dir() {
        let candidates = env_file_candidates();
        assert_eq!(candidates[0], PathBuf::from(".env"));
        assert_eq!(candidates[1], Path::new("config").join(".env"));
    }
}
