//! Display labels for dataset categories
//!
//! The yield dataset uses English category names; the dashboard shows
//! Portuguese labels. Items missing from the map are shown unchanged.

/// (dataset name, display label)
const LABELS: &[(&str, &str)] = &[
    // Crops
    ("Rice", "Arroz"),
    ("Wheat", "Trigo"),
    ("Corn", "Milho"),
    ("Barley", "Cevada"),
    ("Soybeans", "Soja"),
    ("Cotton", "Algodão"),
    ("Soybean", "Soja"),
    ("Maize", "Milho"),
    // Regions
    ("North", "Norte"),
    ("South", "Sul"),
    ("East", "Leste"),
    ("West", "Oeste"),
    // Soils
    ("Clay", "Argiloso"),
    ("Sandy", "Arenoso"),
    ("Loam", "Areno-Argiloso"),
    ("Silt", "Siltoso"),
    // Weather
    ("Sunny", "Ensolarado"),
    ("Rainy", "Chuvoso"),
    ("Cloudy", "Nublado"),
];

/// Display label for a dataset name
pub fn translate(item: &str) -> &str {
    LABELS
        .iter()
        .find(|(name, _)| *name == item)
        .map(|(_, label)| *label)
        .unwrap_or(item)
}

/// Dataset name for a display label
///
/// Labels shared by two dataset names ("Soja", "Milho") resolve to the last
/// one in the table, so "Soja" -> "Soybean" and "Milho" -> "Maize".
pub fn original(label: &str) -> &str {
    LABELS
        .iter()
        .rev()
        .find(|(_, display)| *display == label)
        .map(|(name, _)| *name)
        .unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_and_unknown() {
        assert_eq!(translate("Rice"), "Arroz");
        assert_eq!(translate("Loam"), "Areno-Argiloso");
        assert_eq!(translate("Quinoa"), "Quinoa");
    }

    #[test]
    fn test_original_round_trip_for_unique_labels() {
        assert_eq!(original("Arroz"), "Rice");
        assert_eq!(original("Chuvoso"), "Rainy");
        assert_eq!(original("Rice"), "Rice");
    }

    #[test]
    fn test_shared_labels_resolve_to_last_entry() {
        assert_eq!(original("Soja"), "Soybean");
        assert_eq!(original("Milho"), "Maize");
    }
}
