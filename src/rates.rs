//! Withholding (PPh) and VAT (PPN) rate derivation.

use serde::{Deserialize, Serialize};

/// Final turnover tax for small businesses (PP 55/2022).
pub const FINAL_TURNOVER_RATE: f64 = 0.005;
/// PPh 23 on services.
pub const SERVICE_WITHHOLDING_RATE: f64 = 0.02;
/// PPN charged by VAT-registered (PKP) parties.
pub const VAT_RATE: f64 = 0.11;
/// Rate offered for PPh 21 on a fresh form.
pub const DEFAULT_CUSTOM_RATE: f64 = 0.03;
/// Upper bound accepted for a caller-supplied PPh 21 rate.
pub const MAX_CUSTOM_RATE: f64 = 0.5;

/// Tax treatment applied to the fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaxScheme {
    FinalTurnoverTax,
    ServiceWithholding,
    CustomWithholding(f64),
    None,
}

/// Scheme selector as stored on the form, using the tags saved by earlier releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaxSchemeKind {
    #[default]
    FinalTurnover,
    Service,
    Custom,
    None,
}

impl TaxSchemeKind {
    pub fn tag(self) -> &'static str {
        match self {
            TaxSchemeKind::FinalTurnover => "UMKM_0_5",
            TaxSchemeKind::Service => "PPH23_2",
            TaxSchemeKind::Custom => "PPH21_custom",
            TaxSchemeKind::None => "NONE",
        }
    }

    /// Attach the custom rate; it is ignored for the fixed-rate schemes.
    pub fn with_rate(self, custom_rate: f64) -> TaxScheme {
        match self {
            TaxSchemeKind::FinalTurnover => TaxScheme::FinalTurnoverTax,
            TaxSchemeKind::Service => TaxScheme::ServiceWithholding,
            TaxSchemeKind::Custom => TaxScheme::CustomWithholding(custom_rate),
            TaxSchemeKind::None => TaxScheme::None,
        }
    }
}

// Unknown tags fall back to no withholding.
impl From<String> for TaxSchemeKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "UMKM_0_5" => TaxSchemeKind::FinalTurnover,
            "PPH23_2" => TaxSchemeKind::Service,
            "PPH21_custom" => TaxSchemeKind::Custom,
            _ => TaxSchemeKind::None,
        }
    }
}

impl From<TaxSchemeKind> for String {
    fn from(kind: TaxSchemeKind) -> Self {
        kind.tag().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rates {
    pub withholding: f64,
    pub vat: f64,
}

pub fn derive_rates(scheme: &TaxScheme, vat_registered: bool) -> Rates {
    let withholding = match *scheme {
        TaxScheme::FinalTurnoverTax => FINAL_TURNOVER_RATE,
        TaxScheme::ServiceWithholding => SERVICE_WITHHOLDING_RATE,
        TaxScheme::CustomWithholding(rate) if rate.is_finite() => rate,
        TaxScheme::CustomWithholding(_) | TaxScheme::None => 0.0,
    };
    let vat = if vat_registered { VAT_RATE } else { 0.0 };
    Rates { withholding, vat }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_table() {
        assert_eq!(derive_rates(&TaxScheme::FinalTurnoverTax, false).withholding, 0.005);
        assert_eq!(derive_rates(&TaxScheme::ServiceWithholding, false).withholding, 0.02);
        assert_eq!(derive_rates(&TaxScheme::CustomWithholding(0.05), false).withholding, 0.05);
        assert_eq!(derive_rates(&TaxScheme::None, false).withholding, 0.0);
    }

    #[test]
    fn test_vat_follows_pkp_flag() {
        assert_eq!(derive_rates(&TaxScheme::None, true).vat, 0.11);
        assert_eq!(derive_rates(&TaxScheme::None, false).vat, 0.0);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_none() {
        let kind: TaxSchemeKind = serde_json::from_str("\"PPH99\"").unwrap();
        assert_eq!(kind, TaxSchemeKind::None);
        assert_eq!(derive_rates(&kind.with_rate(0.3), false).withholding, 0.0);
    }

    #[test]
    fn test_tags_survive_serialization() {
        let json = serde_json::to_string(&TaxSchemeKind::Custom).unwrap();
        assert_eq!(json, "\"PPH21_custom\"");
        let back: TaxSchemeKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TaxSchemeKind::Custom);
    }
}
