//! Session-related types.
//!
//! Types stored in the session or resolved per request for the checkout flow.

use serde::{Deserialize, Serialize};

use shopfront_core::UserId;

/// Authenticated shop customer.
///
/// Resolved from the shop API's auth check; field names follow its JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Shop API user ID.
    pub id: UserId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub user_name: String,
}

/// Session keys for checkout state.
pub mod keys {
    /// Key for the address chosen on the checkout page.
    pub const SELECTED_ADDRESS: &str = "checkout_selected_address";

    /// Key for the one-shot notice shown on the next rendered page.
    pub const FLASH_NOTICE: &str = "flash_notice";
}
