//! Shopfront Core - Shared checkout types.
//!
//! This crate provides the types used across Shopfront components:
//! - `storefront` - Server-rendered checkout pages in front of the shop API
//! - `integration-tests` - End-to-end checks against a fake shop API
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Cart totals and order payload construction live here so they can
//! be tested without a running server.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, prices, statuses, carts, addresses and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
