//! Shopfront Storefront library.
//!
//! This crate provides the checkout storefront as a library, allowing it to
//! be tested and embedded in integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod shop;
pub mod state;

pub use routes::app;
pub use state::{AppState, Collaborators};
