//! Domain models for storefront.
//!
//! Cart, address and order types live in `shopfront-core`; the models here
//! are the storefront's own session state.

pub mod notice;
pub mod session;

pub use notice::{Notice, NoticeVariant};
pub use session::{CurrentUser, keys as session_keys};
