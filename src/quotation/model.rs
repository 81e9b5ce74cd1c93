use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::line_item::{ItemField, LineItem};
use super::number::{deserialize_lenient, money_sum, parse_number, round2};
use crate::error::{QuotationError, Result};

/// Free-text header fields. None of them feed into the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    QuotationNumber,
    ClientName,
    ClientAddress,
    Date,
}

impl HeaderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderField::QuotationNumber => "quotationNumber",
            HeaderField::ClientName => "clientName",
            HeaderField::ClientAddress => "clientAddress",
            HeaderField::Date => "date",
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeaderField {
    type Err = QuotationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "quotationNumber" => Ok(HeaderField::QuotationNumber),
            "clientName" => Ok(HeaderField::ClientName),
            "clientAddress" => Ok(HeaderField::ClientAddress),
            "date" => Ok(HeaderField::Date),
            other => Err(QuotationError::UnknownField(other.to_string())),
        }
    }
}

/// An immutable snapshot of a quotation.
///
/// Every operation returns a new snapshot with `subtotal` and `total`
/// already recomputed, so a reader never sees stale derived values.
/// Deserializing ignores stored derived values and recomputes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredQuotation")]
pub struct Quotation {
    quotation_number: String,
    date: String,
    client_name: String,
    client_address: String,
    items: Vec<LineItem>,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
}

/// Editable part of a stored quotation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredQuotation {
    #[serde(default)]
    quotation_number: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    client_name: String,
    #[serde(default)]
    client_address: String,
    #[serde(default)]
    items: Vec<LineItem>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    tax: Decimal,
}

impl From<StoredQuotation> for Quotation {
    fn from(stored: StoredQuotation) -> Self {
        Self {
            quotation_number: stored.quotation_number,
            date: stored.date,
            client_name: stored.client_name,
            client_address: stored.client_address,
            items: stored.items,
            subtotal: Decimal::ZERO,
            tax: round2(stored.tax),
            total: Decimal::ZERO,
        }
        .with_totals()
    }
}

impl Quotation {
    /// A fresh quotation: blank header, one empty item, zero totals.
    pub fn new() -> Self {
        Self {
            quotation_number: String::new(),
            date: String::new(),
            client_name: String::new(),
            client_address: String::new(),
            items: vec![LineItem::empty()],
            subtotal: round2(Decimal::ZERO),
            tax: round2(Decimal::ZERO),
            total: round2(Decimal::ZERO),
        }
    }

    pub fn quotation_number(&self) -> &str {
        &self.quotation_number
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn client_address(&self) -> &str {
        &self.client_address
    }

    pub fn field(&self, field: HeaderField) -> &str {
        match field {
            HeaderField::QuotationNumber => &self.quotation_number,
            HeaderField::ClientName => &self.client_name,
            HeaderField::ClientAddress => &self.client_address,
            HeaderField::Date => &self.date,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn tax(&self) -> Decimal {
        self.tax
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Set a header field verbatim.
    pub fn set_field(&self, field: HeaderField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let value = value.into();
        match field {
            HeaderField::QuotationNumber => next.quotation_number = value,
            HeaderField::ClientName => next.client_name = value,
            HeaderField::ClientAddress => next.client_address = value,
            HeaderField::Date => next.date = value,
        }
        debug!(field = %field, "header field updated");
        next
    }

    /// Edit one column of the item at `index`, then recompute the totals.
    pub fn set_item_field(
        &self,
        index: usize,
        field: ItemField,
        value: impl Into<String>,
    ) -> Result<Self> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.items[index].set(field, value.into());
        debug!(index, field = %field, amount = %next.items[index].amount(), "item updated");
        Ok(next.with_totals())
    }

    /// Append a blank item. It contributes nothing to the totals.
    pub fn add_item(&self) -> Self {
        let mut next = self.clone();
        next.items.push(LineItem::empty());
        debug!(count = next.items.len(), "item added");
        next.with_totals()
    }

    /// Remove the item at `index`; the remaining items keep their order.
    pub fn remove_item(&self, index: usize) -> Result<Self> {
        self.check_index(index)?;
        let mut next = self.clone();
        next.items.remove(index);
        debug!(index, count = next.items.len(), "item removed");
        Ok(next.with_totals())
    }

    /// Set the flat tax amount from raw text. Invalid input is 0.
    pub fn set_tax(&self, raw: &str) -> Self {
        let mut next = self.clone();
        next.tax = round2(parse_number(raw));
        debug!(tax = %next.tax, "tax updated");
        next.with_totals()
    }

    /// Rebuild every derived value from the editable fields.
    pub fn recomputed(&self) -> Self {
        let mut next = self.clone();
        for item in &mut next.items {
            item.recompute_amount();
        }
        next.tax = round2(next.tax);
        next.with_totals()
    }

    fn with_totals(mut self) -> Self {
        self.subtotal = money_sum(self.items.iter().map(LineItem::amount));
        self.total = money_sum([self.subtotal, self.tax]);
        self
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(QuotationError::ItemIndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }
}

impl Default for Quotation {
    fn default() -> Self {
        Self::new()
    }
}
