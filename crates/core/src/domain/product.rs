use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Storefront product identifier.
///
/// Feeds deliver identifiers either as plain integers or as strings such as
/// `gid://shopify/Product/8123`; both are kept in their textual form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "IdRepr")]
pub struct ProductId(pub String);

impl ProductId {
    /// Residue modulo 3 of the trailing integer in the identifier.
    ///
    /// Identifiers without trailing digits resolve to 0. The residue is taken
    /// from the digit sum, so arbitrarily long digit runs stay exact. A negative
    /// integer identifier uses the Euclidean residue, so `-1` resolves to 2.
    pub fn residue_mod3(&self) -> u8 {
        let residue = self
            .0
            .bytes()
            .rev()
            .take_while(u8::is_ascii_digit)
            .fold(0u8, |acc, digit| (acc + (digit - b'0')) % 3);

        let negative = self
            .0
            .strip_prefix('-')
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
        if negative {
            (3 - residue) % 3
        } else {
            residue
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Wire shape shared by product and order identifiers.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum IdRepr {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl IdRepr {
    pub(crate) fn into_text(self) -> String {
        match self {
            Self::Unsigned(value) => value.to_string(),
            Self::Signed(value) => value.to_string(),
            Self::Text(value) => value,
        }
    }
}

impl From<IdRepr> for ProductId {
    fn from(value: IdRepr) -> Self {
        Self(value.into_text())
    }
}

/// A monetary amount as delivered by the storefront, kept unparsed until used.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
}

impl Money {
    pub fn new(amount: impl Into<String>) -> Self {
        Self { amount: Some(amount.into()), currency_code: None }
    }

    /// Parsed amount, or `None` when the amount is missing, blank, or not a number.
    pub fn value(&self) -> Option<Decimal> {
        let raw = self.amount.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)).ok()
    }
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AmountRepr {
        Text(String),
        Integer(i64),
        Float(f64),
        Other(IgnoredAny),
    }

    let repr = Option::<AmountRepr>::deserialize(deserializer)?;
    Ok(repr.and_then(|repr| match repr {
        AmountRepr::Text(value) => Some(value),
        AmountRepr::Integer(value) => Some(value.to_string()),
        AmountRepr::Float(value) => Some(value.to_string()),
        AmountRepr::Other(_) => None,
    }))
}

/// A price that is not a money object reads as absent instead of failing the product.
fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<Money>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PriceRepr {
        Money(Money),
        Other(IgnoredAny),
    }

    Ok(match Option::<PriceRepr>::deserialize(deserializer)? {
        Some(PriceRepr::Money(money)) => Some(money),
        Some(PriceRepr::Other(_)) | None => None,
    })
}

/// Read-only product snapshot supplied by the storefront.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Money>,
    #[serde(
        default,
        deserialize_with = "deserialize_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub compare_at_price: Option<Money>,
}

impl Product {
    /// Vendor as supplied, treating an empty string the same as a missing one.
    pub fn explicit_vendor(&self) -> Option<&str> {
        self.vendor.as_deref().filter(|vendor| !vendor.is_empty())
    }

    pub fn price_amount(&self) -> Option<Decimal> {
        self.price.as_ref().and_then(Money::value)
    }

    pub fn compare_at_amount(&self) -> Option<Decimal> {
        self.compare_at_price.as_ref().and_then(Money::value)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Money, Product, ProductId};

    #[test]
    fn residue_uses_trailing_digits_of_the_identifier() {
        assert_eq!(ProductId::from(7).residue_mod3(), 1);
        assert_eq!(ProductId::from("gid://shopify/Product/124").residue_mod3(), 1);
        assert_eq!(ProductId::from("gid://shopify/Product/123").residue_mod3(), 0);
        assert_eq!(ProductId::from("sku-abc").residue_mod3(), 0);
    }

    #[test]
    fn negative_identifiers_use_the_euclidean_residue() {
        let negative_one: ProductId = serde_json::from_str("-1").expect("signed id");
        assert_eq!(negative_one.residue_mod3(), 2);
        assert_eq!(ProductId::from("-3").residue_mod3(), 0);
        assert_eq!(ProductId::from("-5").residue_mod3(), 1);
        // Only a whole negative integer is signed; a dash inside a label is not.
        assert_eq!(ProductId::from("sku--4").residue_mod3(), 1);
        assert_eq!(ProductId::from("-").residue_mod3(), 0);
    }

    #[test]
    fn residue_is_exact_for_digit_runs_longer_than_u64() {
        // 10^25 + 2 leaves residue 0 (1 + 2 = 3).
        let id = ProductId::from("10000000000000000000000002");
        assert_eq!(id.residue_mod3(), 0);
    }

    #[test]
    fn identifiers_deserialize_from_numbers_and_strings() {
        let numeric: ProductId = serde_json::from_str("42").expect("numeric id");
        let text: ProductId = serde_json::from_str("\"42\"").expect("text id");
        assert_eq!(numeric, text);
    }

    #[test]
    fn money_accepts_string_and_numeric_amounts() {
        let text: Money =
            serde_json::from_str(r#"{"amount":"18.00","currencyCode":"USD"}"#).expect("money");
        let number: Money = serde_json::from_str(r#"{"amount":18}"#).expect("money");
        let float: Money = serde_json::from_str(r#"{"amount":18.5}"#).expect("money");

        assert_eq!(text.value(), Some(Decimal::new(1800, 2)));
        assert_eq!(text.currency_code.as_deref(), Some("USD"));
        assert_eq!(number.value(), Some(Decimal::new(18, 0)));
        assert_eq!(float.value(), Some(Decimal::new(185, 1)));
    }

    #[test]
    fn unparseable_or_missing_amounts_have_no_value() {
        assert_eq!(Money::new("abc").value(), None);
        assert_eq!(Money::new("   ").value(), None);
        assert_eq!(Money::default().value(), None);
        let null_amount: Money = serde_json::from_str(r#"{"amount":null}"#).expect("money");
        assert_eq!(null_amount.value(), None);
    }

    #[test]
    fn empty_vendor_counts_as_missing() {
        let product: Product =
            serde_json::from_str(r#"{"id":1,"title":"Tee","vendor":""}"#).expect("product");
        assert_eq!(product.explicit_vendor(), None);
        assert_eq!(product.price_amount(), None);
    }

    #[test]
    fn product_reads_camel_case_prices() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": "gid://shopify/Product/9",
                "title": "Canvas Tote",
                "vendor": "Northwind",
                "price": {"amount": "18.00", "currencyCode": "USD"},
                "compareAtPrice": {"amount": "25.00", "currencyCode": "USD"}
            }"#,
        )
        .expect("product");

        assert_eq!(product.explicit_vendor(), Some("Northwind"));
        assert_eq!(product.price_amount(), Some(Decimal::new(1800, 2)));
        assert_eq!(product.compare_at_amount(), Some(Decimal::new(2500, 2)));
    }

    #[test]
    fn amounts_of_other_json_shapes_have_no_value() {
        for raw in ["true", "[18]", r#"{"value": 18}"#] {
            let money: Money = serde_json::from_str(&format!(r#"{{"amount": {raw}}}"#))
                .unwrap_or_else(|error| panic!("amount `{raw}` should not fail: {error}"));
            assert_eq!(money.amount, None, "amount `{raw}`");
            assert_eq!(money.value(), None, "amount `{raw}`");
        }
    }

    #[test]
    fn prices_that_are_not_money_objects_are_ignored() {
        let product: Product = serde_json::from_str(
            r#"{"id": 3, "title": "Mug", "price": "18.00", "compareAtPrice": 25}"#,
        )
        .expect("product");

        assert_eq!(product.price, None);
        assert_eq!(product.compare_at_price, None);
        assert_eq!(product.title, "Mug");
    }

    #[test]
    fn malformed_amount_keeps_the_sibling_price() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 4,
                "price": {"amount": true, "currencyCode": "USD"},
                "compareAtPrice": {"amount": "25.00"}
            }"#,
        )
        .expect("product");

        assert_eq!(product.price_amount(), None);
        let currency = product.price.as_ref().and_then(|price| price.currency_code.as_deref());
        assert_eq!(currency, Some("USD"));
        assert_eq!(product.compare_at_amount(), Some(Decimal::new(2500, 2)));
    }
}
