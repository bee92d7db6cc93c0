//! Valuation records and the token metadata documents derived from them.

use crate::constants::{METADATA_DESCRIPTION, METADATA_EXTERNAL_URL, METADATA_IMAGE};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Valuation metrics and economic assumptions for a single well, as computed
/// off-chain and returned through the oracle contract.
///
/// All numeric fields are nullable. The payload is a flat JSON object;
/// anything the oracle omits decodes as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Valuation {
    /// Well the valuation belongs to.
    pub well_id: Option<Uuid>,
    pub npv_usd: Option<f64>,
    pub market_value_usd: Option<f64>,
    pub discount_pct: Option<f64>,
    pub confidence: Option<f64>,
    pub remaining_reserves_bbl: Option<f64>,
    pub oil_price_usd: Option<f64>,
    pub operating_cost_per_bbl: Option<f64>,
    pub discount_rate: Option<f64>,
    pub royalty_rate: Option<f64>,
    /// When the valuation model was run.
    pub calculated_at: Option<DateTime<Utc>>,
    pub valuation_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Valuation {
    /// Renders the nine valuation metrics as ordered metadata traits.
    ///
    /// The order is part of the read-path contract and must not change.
    pub fn traits(&self) -> Vec<MetadataAttribute> {
        vec![
            MetadataAttribute::numeric("Npv Usd", self.npv_usd),
            MetadataAttribute::numeric("Market Value Usd", self.market_value_usd),
            MetadataAttribute::numeric("Discount Pct", self.discount_pct),
            MetadataAttribute::numeric("Confidence", self.confidence),
            MetadataAttribute::numeric("Remaining Reserves Bbl", self.remaining_reserves_bbl),
            MetadataAttribute::numeric("Oil Price Usd", self.oil_price_usd),
            MetadataAttribute::numeric("Operating Cost Per Bbl", self.operating_cost_per_bbl),
            MetadataAttribute::numeric("Discount Rate", self.discount_rate),
            MetadataAttribute::numeric("Royalty Rate", self.royalty_rate),
        ]
    }
}

/// A single `{trait_type, value}` pair in a token metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataAttribute {
    pub trait_type: String,
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
}

impl MetadataAttribute {
    /// A plain numeric trait with no display type.
    pub fn numeric(trait_type: &str, value: Option<f64>) -> Self {
        Self { trait_type: trait_type.to_string(), value, display_type: None }
    }
}

/// Token metadata document for the marketplace display convention, combining
/// a well's display name with its latest valuation traits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub description: String,
    pub external_url: String,
    pub image: String,
    pub name: String,
    pub attributes: Vec<MetadataAttribute>,
}

impl TokenMetadata {
    /// Builds the metadata document for a named well and its valuation.
    pub fn new(name: impl Into<String>, valuation: &Valuation) -> Self {
        Self {
            description: METADATA_DESCRIPTION.to_string(),
            external_url: METADATA_EXTERNAL_URL.to_string(),
            image: METADATA_IMAGE.to_string(),
            name: name.into(),
            attributes: valuation.traits(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valuation_decodes_from_partial_payload() {
        let valuation: Valuation =
            serde_json::from_str(r#"{"npv_usd": 100.0, "confidence": 0.95}"#).unwrap();
        assert_eq!(valuation.npv_usd, Some(100.0));
        assert_eq!(valuation.confidence, Some(0.95));
        assert_eq!(valuation.market_value_usd, None);
        assert_eq!(valuation.calculated_at, None);
    }

    #[test]
    fn metadata_has_nine_ordered_traits() {
        let valuation = Valuation { npv_usd: Some(100.0), ..Default::default() };
        let metadata = TokenMetadata::new("Permian 7", &valuation);

        assert_eq!(metadata.name, "Permian 7");
        assert_eq!(metadata.attributes.len(), 9);
        assert_eq!(metadata.attributes[0].trait_type, "Npv Usd");
        assert_eq!(metadata.attributes[0].value, Some(100.0));
        assert_eq!(metadata.attributes[8].trait_type, "Royalty Rate");
        assert_eq!(metadata.attributes[8].value, None);
    }

    #[test]
    fn absent_trait_values_serialize_as_null() {
        let metadata = TokenMetadata::new("Permian 7", &Valuation::default());
        let json = serde_json::to_value(&metadata).unwrap();
        assert!(json["attributes"][0]["value"].is_null());
        assert!(json["attributes"][0].get("display_type").is_none());
    }
}
