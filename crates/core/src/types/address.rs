//! Shipping address as stored in the shop's address book.

use serde::{Deserialize, Serialize};

use crate::types::id::AddressId;

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "_id")]
    pub id: AddressId,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

impl Address {
    /// Single-line summary, e.g. "12 Hill Rd, Pune 411001".
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{}, {} {}", self.address, self.city, self.pincode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let address: Address =
            serde_json::from_str(r#"{"_id": "a1", "address": "12 Hill Rd", "city": "Pune"}"#)
                .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(address.id, AddressId::new("a1"));
        assert!(address.notes.is_empty());
        assert_eq!(address.summary(), "12 Hill Rd, Pune ");
    }
}
