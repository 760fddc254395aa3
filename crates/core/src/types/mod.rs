//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for the checkout domain.

pub mod address;
pub mod cart;
pub mod id;
pub mod order;
pub mod price;
pub mod status;

pub use address::Address;
pub use cart::{Cart, CartItem, cart_total};
pub use id::*;
pub use order::{AddressInfo, OrderLine, OrderRequest, OrderResponse, OrderSummary};
pub use price::Price;
pub use status::*;
