use rust_decimal::Decimal;
use serde::Deserialize;

use crate::inventory::error::{Result, SyncError};
use crate::inventory::model::{
    Availability, Money, Offer, OfferPayload, PartRef, Price, ReadMode, Row, Supplier,
};

/// Deployment-specific constants stamped onto every offer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OfferDefaults {
    pub currency: String,
    pub supplier_type: String,
    pub supplier_name: String,
}

impl Default for OfferDefaults {
    fn default() -> Self {
        Self {
            currency: "EUR".to_string(),
            supplier_type: "Internal".to_string(),
            supplier_name: "Muenchen".to_string(),
        }
    }
}

/// Maps one spreadsheet row onto the import schema.
pub fn to_offer(row: &Row, defaults: &OfferDefaults) -> Offer {
    Offer {
        availability: Availability {
            available_stock: row.available_stock,
            total_stock: row.total_stock,
        },
        part: PartRef {
            internal_part_number: row.internal_part_number.clone(),
        },
        prices: vec![Price {
            unit_price: Money {
                amount: format_amount(row.unit_price),
                currency: defaults.currency.clone(),
            },
        }],
        supplier: Supplier {
            kind: defaults.supplier_type.clone(),
            supplier: defaults.supplier_name.clone(),
        },
    }
}

/// Shapes the rows of one cycle into the request body for `mode`.
pub fn build_payload(rows: &[Row], mode: ReadMode, defaults: &OfferDefaults) -> Result<OfferPayload> {
    match mode {
        ReadMode::Single => rows
            .first()
            .map(|row| OfferPayload::Single(to_offer(row, defaults)))
            .ok_or(SyncError::EmptySheet),
        ReadMode::Batch => {
            if rows.is_empty() {
                return Err(SyncError::EmptySheet);
            }
            Ok(OfferPayload::Batch(
                rows.iter().map(|row| to_offer(row, defaults)).collect(),
            ))
        }
    }
}

/// Renders a price as a decimal string; whole amounts keep one fractional digit.
pub fn format_amount(amount: Decimal) -> String {
    let normalized = amount.normalize();
    if normalized.scale() == 0 {
        format!("{normalized}.0")
    } else {
        normalized.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn row(available: u64, total: u64, price: &str, part: &str) -> Row {
        Row {
            available_stock: available,
            total_stock: total,
            unit_price: Decimal::from_str(price).unwrap(),
            internal_part_number: part.to_string(),
        }
    }

    #[test]
    fn maps_row_to_expected_json() {
        let offer = to_offer(&row(5, 10, "2.5", "PN-001"), &OfferDefaults::default());
        let json = serde_json::to_string(&offer).unwrap();
        assert_eq!(
            json,
            r#"{"availability":{"available_stock":5,"total_stock":10},"part":{"internal_part_number":"PN-001"},"prices":[{"unit_price":{"amount":"2.5","currency":"EUR"}}],"supplier":{"type":"Internal","supplier":"Muenchen"}}"#
        );
    }

    #[test]
    fn mapping_is_deterministic() {
        let input = row(3, 7, "19.99", "PN-XYZ");
        let defaults = OfferDefaults::default();
        let first = serde_json::to_vec(&to_offer(&input, &defaults)).unwrap();
        let second = serde_json::to_vec(&to_offer(&input, &defaults)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn defaults_are_configurable() {
        let defaults = OfferDefaults {
            currency: "USD".into(),
            supplier_type: "External".into(),
            supplier_name: "Berlin".into(),
        };
        let offer = to_offer(&row(1, 1, "1", "A"), &defaults);
        assert_eq!(offer.prices[0].unit_price.currency, "USD");
        assert_eq!(offer.supplier.kind, "External");
        assert_eq!(offer.supplier.supplier, "Berlin");
    }

    #[test]
    fn amounts_render_like_decimal_literals() {
        assert_eq!(format_amount(Decimal::from_str("2.5").unwrap()), "2.5");
        assert_eq!(format_amount(Decimal::from_str("12.50").unwrap()), "12.5");
        assert_eq!(format_amount(Decimal::from(4)), "4.0");
        assert_eq!(format_amount(Decimal::from_str("0.010").unwrap()), "0.01");
    }

    #[test]
    fn single_mode_wraps_first_row_only() {
        let rows = vec![row(1, 2, "1.5", "A"), row(3, 4, "2.5", "B")];
        let payload = build_payload(&rows, ReadMode::Single, &OfferDefaults::default()).unwrap();
        match payload {
            OfferPayload::Single(offer) => assert_eq!(offer.part.internal_part_number, "A"),
            other => panic!("expected single payload, got {other:?}"),
        }
    }

    #[test]
    fn batch_mode_keeps_row_order() {
        let rows = vec![row(1, 2, "1.5", "A"), row(3, 4, "2.5", "B")];
        let payload = build_payload(&rows, ReadMode::Batch, &OfferDefaults::default()).unwrap();
        assert_eq!(payload.len(), 2);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json[1]["part"]["internal_part_number"], "B");
    }

    #[test]
    fn empty_rows_produce_no_payload() {
        let result = build_payload(&[], ReadMode::Batch, &OfferDefaults::default());
        assert!(matches!(result, Err(SyncError::EmptySheet)));
    }
}
