use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places kept on every derived currency amount.
pub const CURRENCY_SCALE: u32 = 2;

/// Midpoint rule applied when rounding derived amounts to cents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// `0.125 -> 0.13`, `-0.125 -> -0.13`.
    #[default]
    HalfAwayFromZero,
    /// `0.125 -> 0.12`, `0.135 -> 0.14`.
    HalfEven,
}

impl RoundingPolicy {
    /// Rounds to cents and pins the scale so `14` renders as `14.00`.
    pub fn round(self, value: Decimal) -> Decimal {
        let strategy = match self {
            Self::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
        };
        let mut rounded = value.round_dp_with_strategy(CURRENCY_SCALE, strategy);
        rounded.rescale(CURRENCY_SCALE);
        rounded
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HalfAwayFromZero => "half_away_from_zero",
            Self::HalfEven => "half_even",
        }
    }
}

/// Display form of an amount with exactly two decimal places.
pub fn format_currency(amount: Decimal, currency_code: &str) -> String {
    let cents = RoundingPolicy::HalfAwayFromZero.round(amount);

    let symbol = match currency_code.trim().to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" | "NZD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    };

    match symbol {
        Some(symbol) if cents.is_sign_negative() && !cents.is_zero() => {
            format!("-{symbol}{}", cents.abs())
        }
        Some(symbol) => format!("{symbol}{}", cents.abs()),
        None => format!("{cents} {}", currency_code.trim().to_ascii_uppercase()),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{format_currency, RoundingPolicy};

    #[test]
    fn half_away_from_zero_rounds_midpoints_up_in_magnitude() {
        let policy = RoundingPolicy::HalfAwayFromZero;
        assert_eq!(policy.round(Decimal::new(125, 3)), Decimal::new(13, 2));
        assert_eq!(policy.round(Decimal::new(-125, 3)), Decimal::new(-13, 2));
        assert_eq!(policy.round(Decimal::new(1234, 4)), Decimal::new(12, 2));
    }

    #[test]
    fn half_even_rounds_midpoints_to_even_cents() {
        let policy = RoundingPolicy::HalfEven;
        assert_eq!(policy.round(Decimal::new(125, 3)), Decimal::new(12, 2));
        assert_eq!(policy.round(Decimal::new(135, 3)), Decimal::new(14, 2));
    }

    #[test]
    fn rounded_values_always_carry_two_decimal_places() {
        let rounded = RoundingPolicy::default().round(Decimal::new(14, 0));
        assert_eq!(rounded.to_string(), "14.00");
        assert_eq!(rounded.scale(), 2);
    }

    #[test]
    fn currency_formatting_uses_symbols_for_known_codes() {
        assert_eq!(format_currency(Decimal::new(14, 0), "USD"), "$14.00");
        assert_eq!(format_currency(Decimal::new(5, 1), "eur"), "€0.50");
        assert_eq!(format_currency(Decimal::new(-250, 2), "USD"), "-$2.50");
        assert_eq!(format_currency(Decimal::new(1999, 2), "SEK"), "19.99 SEK");
    }
}
