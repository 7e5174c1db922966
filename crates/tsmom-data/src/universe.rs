//! Instrument universe and raw-label renaming.
//!
//! Source feeds label instruments with vendor tickers such as
//! `EquityIndex|SPX`. A [`UniverseConfig`] maps those labels onto canonical
//! asset-class identifiers and designates the reference short rate.

use serde::{Deserialize, Serialize};
use tsmom_traits::{InstrumentId, Result, Universe};

/// A raw feed label and the canonical identifier it is renamed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentMapping {
    /// Label as it appears in the source file.
    pub raw: String,
    /// Identifier used throughout the engines.
    pub canonical: InstrumentId,
}

impl InstrumentMapping {
    /// Map `raw` onto `canonical`.
    pub fn new(raw: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            canonical: InstrumentId::new(canonical),
        }
    }
}

/// Tradable instruments, in order, plus the reference short rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Tradable instruments in output order.
    pub instruments: Vec<InstrumentMapping>,
    /// Short-term reference rate quoted in percentage points.
    pub reference_rate: InstrumentMapping,
}

impl Default for UniverseConfig {
    /// Six asset-class index proxies and the 3-month Treasury rate.
    fn default() -> Self {
        Self {
            instruments: vec![
                InstrumentMapping::new("CommodityIndex|SPGSCITR", "Commodities|SPGSCITR"),
                InstrumentMapping::new("EquityIndex|EAFE", "Equities|EAFE"),
                InstrumentMapping::new("EquityIndex|MXEF", "Equities|MXEF"),
                InstrumentMapping::new("EquityIndex|SPX", "Equities|SPX"),
                InstrumentMapping::new("FXIndex|DXY Index", "Currencies|DXY"),
                InstrumentMapping::new("FixedIncomeIndex|JPMTUS", "Fixed Income|JPMTUS"),
            ],
            reference_rate: InstrumentMapping::new("NominalGovBond|USDUSA", "3M Treasury Rate"),
        }
    }
}

impl UniverseConfig {
    /// The canonical universe.
    ///
    /// # Errors
    ///
    /// Fails if the instrument list is empty, repeats an identifier, or
    /// contains the reference rate.
    pub fn universe(&self) -> Result<Universe> {
        Universe::new(
            self.instruments.iter().map(|m| m.canonical.clone()).collect(),
            self.reference_rate.canonical.clone(),
        )
    }

    /// Canonical identifier for a raw label, if the label is configured.
    pub fn canonical(&self, raw: &str) -> Option<&InstrumentId> {
        self.mappings()
            .find(|m| m.raw == raw)
            .map(|m| &m.canonical)
    }

    /// Identifier to use for `raw`: its canonical name when configured,
    /// otherwise the raw label itself.
    pub fn rename(&self, raw: &str) -> InstrumentId {
        self.canonical(raw)
            .cloned()
            .unwrap_or_else(|| InstrumentId::new(raw))
    }

    /// Every mapping, reference rate last.
    pub fn mappings(&self) -> impl Iterator<Item = &InstrumentMapping> {
        self.instruments
            .iter()
            .chain(std::iter::once(&self.reference_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_universe() {
        let config = UniverseConfig::default();
        let universe = config.universe().unwrap();
        assert_eq!(universe.len(), 6);
        assert_eq!(universe.instruments()[0], InstrumentId::from("Commodities|SPGSCITR"));
        assert_eq!(universe.reference_rate(), &InstrumentId::from("3M Treasury Rate"));
    }

    #[rstest]
    #[case("EquityIndex|SPX", "Equities|SPX")]
    #[case("FXIndex|DXY Index", "Currencies|DXY")]
    #[case("FixedIncomeIndex|JPMTUS", "Fixed Income|JPMTUS")]
    #[case("NominalGovBond|USDUSA", "3M Treasury Rate")]
    #[case("Unknown|XYZ", "Unknown|XYZ")]
    fn test_rename(#[case] raw: &str, #[case] expected: &str) {
        let config = UniverseConfig::default();
        assert_eq!(config.rename(raw), InstrumentId::from(expected));
    }

    #[test]
    fn test_unknown_label_has_no_canonical_name() {
        assert!(UniverseConfig::default().canonical("Unknown|XYZ").is_none());
    }

    #[test]
    fn test_reference_rate_in_universe_rejected() {
        let mut config = UniverseConfig::default();
        config
            .instruments
            .push(InstrumentMapping::new("NominalGovBond|USDUSA", "3M Treasury Rate"));
        assert!(config.universe().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = UniverseConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: UniverseConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
