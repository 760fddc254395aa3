//! Display formatting for money amounts.

use core::fmt;

use rust_decimal::Decimal;

/// Symbol prefixed to every displayed amount.
pub const CURRENCY_SYMBOL: &str = "$";

/// A money amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
}

impl Price {
    #[must_use]
    pub const fn from_amount(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Format for display with two decimal places (e.g., "$24.00").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_SYMBOL}{:.2}", self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Price::from_amount(Decimal::new(24, 0)).display(), "$24.00");
        assert_eq!(Price::from_amount(Decimal::new(1999, 2)).display(), "$19.99");
        assert_eq!(Price::from_amount(Decimal::ZERO).display(), "$0.00");
    }

    #[test]
    fn test_display_pads_single_decimal() {
        assert_eq!(Price::from_amount(Decimal::new(5, 1)).to_string(), "$0.50");
    }
}
