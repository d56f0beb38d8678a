//! Receipt
//!
//! Plain-text rendering of a cart for terminals and logs.

use std::{fmt, io, str::FromStr};

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{items::LineItem, pricing::Totals};

/// Errors raised while rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Amount does not fit the money representation.
    #[error("amount {0} is too large to display")]
    AmountOutOfRange(u64),

    /// Output could not be written.
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// Currencies the storefront can display prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyCode {
    /// Pound sterling.
    Gbp,

    /// Euro.
    Eur,

    /// US dollar.
    Usd,
}

impl CurrencyCode {
    /// ISO currency definition.
    pub fn currency(self) -> &'static Currency {
        match self {
            Self::Gbp => iso::GBP,
            Self::Eur => iso::EUR,
            Self::Usd => iso::USD,
        }
    }
}

/// Unknown currency code.
#[derive(Debug, Error)]
#[error("unsupported currency {0:?}, expected one of GBP, EUR, USD")]
pub struct UnsupportedCurrency(String);

impl FromStr for CurrencyCode {
    type Err = UnsupportedCurrency;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "GBP" => Ok(Self::Gbp),
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            _ => Err(UnsupportedCurrency(value.to_string())),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.currency().iso_alpha_code)
    }
}

/// Format an amount held in minor units.
///
/// # Errors
///
/// Returns [`ReceiptError::AmountOutOfRange`] when the amount exceeds `i64::MAX`.
pub fn format_minor(amount: u64, currency: CurrencyCode) -> Result<String, ReceiptError> {
    let minor = i64::try_from(amount).map_err(|_overflow| ReceiptError::AmountOutOfRange(amount))?;

    Ok(Money::from_minor(minor, currency.currency()).to_string())
}

/// Write a table of line items followed by the cart totals.
///
/// # Errors
///
/// Returns an error if an amount cannot be formatted or the output cannot be written.
pub fn write_cart(
    out: &mut impl io::Write,
    items: &[LineItem],
    totals: &Totals,
    currency: CurrencyCode,
) -> Result<(), ReceiptError> {
    if items.is_empty() {
        writeln!(out, "Your cart is empty.")?;
    } else {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Unit", "Qty", "Price", "Total"]);

        for item in items {
            let price = match item.original_price.filter(|original| *original > item.price) {
                Some(original) => format!(
                    "{} (was {})",
                    format_minor(item.price, currency)?,
                    format_minor(original, currency)?
                ),
                None => format_minor(item.price, currency)?,
            };

            builder.push_record([
                item.name.clone(),
                item.unit.clone(),
                item.quantity.to_string(),
                price,
                format_minor(item.line_total(), currency)?,
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "{table}")?;
    }

    writeln!(out, " Items:    {}", totals.total_items)?;
    writeln!(out, " Amount:   {}", format_minor(totals.total_amount, currency)?)?;
    writeln!(out, " Delivery: {}", format_minor(totals.delivery_fee, currency)?)?;

    if totals.discount_amount > 0 {
        writeln!(
            out,
            " Discount: -{}",
            format_minor(totals.discount_amount, currency)?
        )?;
    }

    writeln!(out, " Subtotal: {}", format_minor(totals.subtotal, currency)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{items::ItemSnapshot, pricing::calculate_totals};

    use super::*;

    #[test]
    fn currency_codes_parse_case_insensitively() -> TestResult {
        assert_eq!("gbp".parse::<CurrencyCode>()?, CurrencyCode::Gbp);
        assert_eq!("EUR".parse::<CurrencyCode>()?, CurrencyCode::Eur);
        assert!("JPY".parse::<CurrencyCode>().is_err());

        Ok(())
    }

    #[test]
    fn format_minor_uses_currency_symbol() -> TestResult {
        let formatted = format_minor(12_34, CurrencyCode::Gbp)?;

        assert!(formatted.contains("12.34"), "unexpected format {formatted}");
        assert!(formatted.contains('£'), "unexpected format {formatted}");

        Ok(())
    }

    #[test]
    fn write_cart_lists_items_and_subtotal() -> TestResult {
        let items = [ItemSnapshot {
            product_uuid: Uuid::now_v7(),
            name: "Bananas".to_string(),
            price: 20,
            original_price: Some(25),
            unit: "each".to_string(),
            image: "bananas.png".to_string(),
        }
        .into_line_item(6, Timestamp::UNIX_EPOCH)];

        let totals = calculate_totals(&items, 1_50, None);
        let mut out = Vec::new();

        write_cart(&mut out, &items, &totals, CurrencyCode::Gbp)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Bananas"), "missing item name");
        assert!(rendered.contains("was"), "missing original price");
        assert!(rendered.contains("2.70"), "missing subtotal");

        Ok(())
    }

    #[test]
    fn write_cart_reports_empty_cart() -> TestResult {
        let mut out = Vec::new();

        write_cart(&mut out, &[], &calculate_totals(&[], 0, None), CurrencyCode::Usd)?;

        assert!(String::from_utf8(out)?.contains("empty"));

        Ok(())
    }
}
