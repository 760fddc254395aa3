//! Business logic services for storefront.
//!
//! # Services
//!
//! - `checkout` - Order validation, submission and duplicate-submit guard

pub mod checkout;

pub use checkout::{
    CheckoutContext, CheckoutState, OrderSubmitter, Rejection, SubmissionTracker, SubmitOutcome,
};
