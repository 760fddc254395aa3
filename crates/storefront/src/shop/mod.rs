//! Shop API collaborators.
//!
//! # Architecture
//!
//! - The shop REST API owns carts, address books, orders and authentication
//! - The storefront reads carts and addresses, and creates orders - nothing is
//!   stored locally
//! - Each concern is an object-safe trait so handlers and the checkout
//!   submitter can be exercised against in-memory fakes
//! - [`ShopApiClient`] implements every trait over HTTP with `reqwest`, and
//!   caches auth checks in `moka` (60 second TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::shop::{CartSource, ShopApiClient};
//!
//! let client = ShopApiClient::new(&config.shop_api)?;
//! let cart = client.fetch_cart(&user.id).await?;
//! ```

mod client;
mod types;

pub use client::{AUTH_COOKIE_NAME, ShopApiClient};

use async_trait::async_trait;
use thiserror::Error;

use shopfront_core::{Address, Cart, OrderRequest, OrderResponse, OrderSummary, UserId};

use crate::models::CurrentUser;

/// Errors that can occur when talking to the shop API.
#[derive(Debug, Error)]
pub enum ShopApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status without a usable body.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the shop API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Client could not be constructed from configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Read-only access to a customer's cart.
#[async_trait]
pub trait CartSource: Send + Sync {
    /// Fetch the current cart, or `None` if the customer has none.
    async fn fetch_cart(&self, user_id: &UserId) -> Result<Option<Cart>, ShopApiError>;
}

/// Read-only access to a customer's saved addresses.
#[async_trait]
pub trait AddressBook: Send + Sync {
    async fn list_addresses(&self, user_id: &UserId) -> Result<Vec<Address>, ShopApiError>;
}

/// Order creation and history.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Submit an order once. Rejections by the shop API are returned as an
    /// unsuccessful [`OrderResponse`], not as an error.
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderResponse, ShopApiError>;

    async fn list_orders(&self, user_id: &UserId) -> Result<Vec<OrderSummary>, ShopApiError>;
}

/// Resolves the shop's auth token cookie to a customer.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns `None` when the token is missing, expired or rejected.
    async fn current_user(&self, token: &str) -> Result<Option<CurrentUser>, ShopApiError>;
}
