use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::number::{money_product, parse_number};
use crate::error::QuotationError;

/// Editable columns of a line item. `amount` is derived and has no entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Description,
    Quantity,
    UnitPrice,
}

impl ItemField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemField::Description => "description",
            ItemField::Quantity => "quantity",
            ItemField::UnitPrice => "unitPrice",
        }
    }
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemField {
    type Err = QuotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "description" => Ok(ItemField::Description),
            "quantity" => Ok(ItemField::Quantity),
            "unitPrice" => Ok(ItemField::UnitPrice),
            other => Err(QuotationError::UnknownItemField(other.to_string())),
        }
    }
}

/// One row of the quotation.
///
/// Quantity and unit price keep the text the user typed; their numeric
/// value comes from [`parse_number`]. `amount` always matches them.
/// Stored amounts are ignored on deserialization and recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredLineItem")]
pub struct LineItem {
    description: String,
    quantity: String,
    unit_price: String,
    amount: Decimal,
}

/// Editable columns of a stored line item.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLineItem {
    #[serde(default)]
    description: String,
    #[serde(default)]
    quantity: String,
    #[serde(default)]
    unit_price: String,
}

impl From<StoredLineItem> for LineItem {
    fn from(stored: StoredLineItem) -> Self {
        Self::new(stored.description, stored.quantity, stored.unit_price)
    }
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
    ) -> Self {
        let mut item = Self {
            description: description.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
            amount: Decimal::ZERO,
        };
        item.recompute_amount();
        item
    }

    /// A blank row: no description, no quantity, no price, amount 0.00.
    pub fn empty() -> Self {
        Self::new("", "", "")
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Quantity exactly as entered.
    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    /// Unit price exactly as entered.
    pub fn unit_price(&self) -> &str {
        &self.unit_price
    }

    pub fn quantity_value(&self) -> Decimal {
        parse_number(&self.quantity)
    }

    pub fn unit_price_value(&self) -> Decimal {
        parse_number(&self.unit_price)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub(crate) fn set(&mut self, field: ItemField, value: String) {
        match field {
            ItemField::Description => self.description = value,
            ItemField::Quantity => {
                self.quantity = value;
                self.recompute_amount();
            }
            ItemField::UnitPrice => {
                self.unit_price = value;
                self.recompute_amount();
            }
        }
    }

    pub(crate) fn recompute_amount(&mut self) {
        self.amount = money_product(self.quantity_value(), self.unit_price_value());
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_follows_quantity_and_price() {
        let mut item = LineItem::new("Widget", "2", "10.005");
        assert_eq!(item.amount(), dec!(20.01));

        item.set(ItemField::Quantity, "3".into());
        assert_eq!(item.amount(), dec!(30.02));

        item.set(ItemField::UnitPrice, "".into());
        assert_eq!(item.amount(), dec!(0.00));
    }

    #[test]
    fn description_edit_keeps_amount() {
        let mut item = LineItem::new("", "4", "2.50");
        item.set(ItemField::Description, "Cable".into());
        assert_eq!(item.description(), "Cable");
        assert_eq!(item.amount(), dec!(10.00));
    }

    #[test]
    fn raw_text_is_kept_verbatim() {
        let item = LineItem::new("x", " 1.50 ", "abc");
        assert_eq!(item.quantity(), " 1.50 ");
        assert_eq!(item.unit_price(), "abc");
        assert_eq!(item.quantity_value(), dec!(1.50));
        assert_eq!(item.unit_price_value(), Decimal::ZERO);
    }

    #[test]
    fn item_field_names_round_trip() {
        for field in [ItemField::Description, ItemField::Quantity, ItemField::UnitPrice] {
            assert_eq!(field.as_str().parse::<ItemField>().ok(), Some(field));
        }
        assert!(matches!(
            "amount".parse::<ItemField>(),
            Err(QuotationError::UnknownItemField(name)) if name == "amount"
        ));
    }

    #[test]
    fn empty_item_has_zero_amount() {
        assert_eq!(LineItem::empty().amount().to_string(), "0.00");
    }
}
