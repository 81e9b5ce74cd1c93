mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use tracing::info;

use crate::error::{QuotationError, Result};
use crate::quotation::Quotation;

/// Slot written by an explicit save.
pub const SAVED_QUOTATION_KEY: &str = "savedQuotation";

/// Slot holding the quotation currently being edited from the command line.
pub const DRAFT_QUOTATION_KEY: &str = "draftQuotation";

/// Single-slot-per-key string storage. Last write wins.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Serialize `quotation` as JSON under `key`
pub fn put_quotation(store: &mut dyn KeyValueStore, key: &str, quotation: &Quotation) -> Result<()> {
    let json = serde_json::to_string(quotation).map_err(|e| QuotationError::StoredQuotation {
        key: key.to_string(),
        source: e,
    })?;
    store.put(key, &json)
}

/// Read the quotation under `key`; derived values are rebuilt while decoding
pub fn get_quotation(store: &dyn KeyValueStore, key: &str) -> Result<Option<Quotation>> {
    let Some(json) = store.get(key)? else {
        return Ok(None);
    };
    let quotation: Quotation =
        serde_json::from_str(&json).map_err(|e| QuotationError::StoredQuotation {
            key: key.to_string(),
            source: e,
        })?;
    Ok(Some(quotation))
}

/// Persist a snapshot into the `savedQuotation` slot
pub fn save_quotation(store: &mut dyn KeyValueStore, quotation: &Quotation) -> Result<()> {
    put_quotation(store, SAVED_QUOTATION_KEY, quotation)?;
    info!(total = %quotation.total(), "quotation saved");
    Ok(())
}

/// Load the snapshot from the `savedQuotation` slot, if any
pub fn load_quotation(store: &dyn KeyValueStore) -> Result<Option<Quotation>> {
    get_quotation(store, SAVED_QUOTATION_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotation::{HeaderField, ItemField};
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_slot_is_none() {
        let store = MemoryStore::new();
        assert!(load_quotation(&store).unwrap().is_none());
    }

    #[test]
    fn saved_quotation_round_trips() {
        let quotation = Quotation::new()
            .set_field(HeaderField::ClientName, "Acme")
            .set_item_field(0, ItemField::Quantity, "2")
            .unwrap()
            .set_item_field(0, ItemField::UnitPrice, "10.005")
            .unwrap()
            .set_tax("1.5");

        let mut store = MemoryStore::new();
        save_quotation(&mut store, &quotation).unwrap();

        assert_eq!(load_quotation(&store).unwrap(), Some(quotation));
    }

    #[test]
    fn stale_derived_values_are_recomputed_on_load() {
        let mut store = MemoryStore::new();
        store
            .put(
                SAVED_QUOTATION_KEY,
                r#"{"quotationNumber":"Q-7","date":"","clientName":"","clientAddress":"",
                    "items":[{"description":"Bolt","quantity":"3","unitPrice":"2","amount":""}],
                    "subtotal":0,"tax":"1","total":0}"#,
            )
            .unwrap();

        let loaded = load_quotation(&store).unwrap().unwrap();
        assert_eq!(loaded.items()[0].amount().to_string(), "6.00");
        assert_eq!(loaded.subtotal().to_string(), "6.00");
        assert_eq!(loaded.total().to_string(), "7.00");
    }

    #[test]
    fn malformed_json_names_the_slot() {
        let mut store = MemoryStore::new();
        store.put(SAVED_QUOTATION_KEY, "{not json").unwrap();

        let err = load_quotation(&store).unwrap_err();
        assert!(matches!(err, QuotationError::StoredQuotation { ref key, .. } if key == SAVED_QUOTATION_KEY));
    }
}
