use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::product::{IdRepr, Product};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "IdRepr")]
pub struct OrderId(pub String);

impl From<IdRepr> for OrderId {
    fn from(value: IdRepr) -> Self {
        Self(value.into_text())
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One purchased entry of an order.
///
/// The product snapshot may be missing when the product was deleted after the
/// order was placed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub quantity: Option<u32>,
}

/// Reads a quantity leniently. Numeric strings and fractional numbers become
/// whole units; anything that is not a positive count reads as `None`.
fn deserialize_quantity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum QuantityRepr {
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let units = match Option::<QuantityRepr>::deserialize(deserializer)? {
        Some(QuantityRepr::Unsigned(value)) => Some(value),
        Some(QuantityRepr::Float(value)) => whole_units(value),
        Some(QuantityRepr::Text(value)) => {
            let value = value.trim();
            value.parse::<u64>().ok().or_else(|| value.parse::<f64>().ok().and_then(whole_units))
        }
        Some(QuantityRepr::Signed(_) | QuantityRepr::Other(_)) | None => None,
    };
    Ok(units.map(|units| u32::try_from(units).unwrap_or(u32::MAX)))
}

fn whole_units(value: f64) -> Option<u64> {
    // `as` saturates at u64::MAX.
    (value >= 1.0).then(|| value.trunc() as u64)
}

impl LineItem {
    /// Quantity used for aggregation: a missing or zero quantity counts as one unit.
    pub fn effective_quantity(&self) -> u32 {
        match self.quantity {
            Some(quantity) if quantity > 0 => quantity,
            _ => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

#[cfg(test)]
mod tests {
    use super::{LineItem, Order};

    fn line_item(json: &str) -> LineItem {
        serde_json::from_str(json).expect("line item")
    }

    #[test]
    fn zero_and_missing_quantities_count_as_one() {
        let missing = LineItem { product: None, quantity: None };
        let zero = LineItem { product: None, quantity: Some(0) };
        let three = LineItem { product: None, quantity: Some(3) };

        assert_eq!(missing.effective_quantity(), 1);
        assert_eq!(zero.effective_quantity(), 1);
        assert_eq!(three.effective_quantity(), 3);
    }

    #[test]
    fn order_tolerates_null_products_and_missing_line_items() {
        let order: Order = serde_json::from_str(
            r##"{"id": 1001, "name": "#1001", "lineItems": [{"product": null, "quantity": 2}]}"##,
        )
        .expect("order");
        assert_eq!(order.id.0, "1001");
        assert_eq!(order.line_items.len(), 1);
        assert!(order.line_items[0].product.is_none());

        let bare: Order = serde_json::from_str(r#"{"id": "gid://shopify/Order/7"}"#).expect("order");
        assert!(bare.line_items.is_empty());
    }

    #[test]
    fn numeric_string_quantities_are_read_as_units() {
        assert_eq!(line_item(r#"{"quantity": "2"}"#).effective_quantity(), 2);
        assert_eq!(line_item(r#"{"quantity": " 3 "}"#).effective_quantity(), 3);
        assert_eq!(line_item(r#"{"quantity": "2.0"}"#).effective_quantity(), 2);
    }

    #[test]
    fn malformed_quantities_fall_back_to_one_unit() {
        for raw in [r#""two""#, "-1", "0.5", "true", "[2]", r#"{"n": 2}"#, "null", r#""""#] {
            let item = line_item(&format!(r#"{{"product": null, "quantity": {raw}}}"#));
            assert_eq!(item.quantity, None, "quantity `{raw}` should be ignored");
            assert_eq!(item.effective_quantity(), 1, "quantity `{raw}`");
        }
    }

    #[test]
    fn fractional_quantities_are_truncated() {
        assert_eq!(line_item(r#"{"quantity": 2.7}"#).effective_quantity(), 2);
    }

    #[test]
    fn one_malformed_line_item_keeps_the_rest_of_the_order() {
        let order: Order = serde_json::from_str(
            r#"{"id": 9, "lineItems": [{"quantity": -1}, {"quantity": "x"}, {"quantity": 4}]}"#,
        )
        .expect("order");

        let units: Vec<u32> = order.line_items.iter().map(LineItem::effective_quantity).collect();
        assert_eq!(units, vec![1, 1, 4]);
    }
}
