//! Order submission for the checkout page.
//!
//! A submission moves a customer from Idle to Processing once both
//! preconditions pass (non-empty cart, selected address), sends exactly one
//! [`OrderRequest`], and returns to Idle when the order service answers,
//! whatever the answer was. There is no retry and no cancellation: the
//! order call runs on its own task, so a customer disconnecting mid-request
//! does not abort it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{Instrument, instrument};

use shopfront_core::{Address, Cart, OrderRequest, OrderResponse, UserId};

use crate::models::Notice;
use crate::shop::OrderService;

pub const CART_EMPTY_MESSAGE: &str = "Your cart is empty. Please add items to proceed";
pub const ADDRESS_REQUIRED_MESSAGE: &str = "Please select one address to proceed.";
pub const ALREADY_PROCESSING_MESSAGE: &str = "Your order is already being processed.";
pub const ORDER_CREATED_MESSAGE: &str = "Order created successfully!";
pub const ORDER_FAILED_FALLBACK: &str = "Failed to create order";

/// Where the customer lands after a successful order.
pub const ACCOUNT_PAGE: &str = "/shop/account";

/// Submission state of one customer's checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    Processing,
}

/// Tracks which customers have an order in flight.
#[derive(Debug, Default)]
pub struct SubmissionTracker {
    in_flight: Mutex<HashSet<UserId>>,
}

impl SubmissionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self, user_id: &UserId) -> CheckoutState {
        if self.lock().contains(user_id) {
            CheckoutState::Processing
        } else {
            CheckoutState::Idle
        }
    }

    /// Move `user_id` to Processing.
    ///
    /// Returns `None` if that customer is already Processing. Dropping the
    /// guard moves them back to Idle.
    #[must_use]
    pub fn begin(self: &Arc<Self>, user_id: &UserId) -> Option<ProcessingGuard> {
        self.lock().insert(user_id.clone()).then(|| ProcessingGuard {
            tracker: Arc::clone(self),
            user_id: user_id.clone(),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<UserId>> {
        // The set is only touched by insert/remove, so a poisoned lock is still consistent.
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds a customer in the Processing state until dropped.
#[derive(Debug)]
pub struct ProcessingGuard {
    tracker: Arc<SubmissionTracker>,
    user_id: UserId,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.tracker.lock().remove(&self.user_id);
    }
}

/// Everything a submission needs, supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutContext<'a> {
    pub user_id: &'a UserId,
    pub cart: Option<&'a Cart>,
    pub address: Option<&'a Address>,
    pub placed_at: DateTime<Utc>,
}

/// Why a submission was refused before anything was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    CartEmpty,
    AddressRequired,
    AlreadyProcessing,
}

impl Rejection {
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::CartEmpty => CART_EMPTY_MESSAGE,
            Self::AddressRequired => ADDRESS_REQUIRED_MESSAGE,
            Self::AlreadyProcessing => ALREADY_PROCESSING_MESSAGE,
        }
    }
}

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A precondition failed; no order was built or sent.
    Rejected(Rejection),
    /// The order service accepted the order.
    Placed(OrderResponse),
    /// The order service refused the order or could not be reached.
    Failed { message: String },
}

impl SubmitOutcome {
    /// Notice to show the customer.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Rejected(rejection) => Notice::destructive(rejection.message()),
            Self::Placed(_) => Notice::success(ORDER_CREATED_MESSAGE),
            Self::Failed { message } => Notice::destructive(message.clone()),
        }
    }

    /// Page to navigate to, only after a placed order.
    #[must_use]
    pub const fn redirect_to(&self) -> Option<&'static str> {
        match self {
            Self::Placed(_) => Some(ACCOUNT_PAGE),
            Self::Rejected(_) | Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_placed(&self) -> bool {
        matches!(self, Self::Placed(_))
    }
}

/// Validates and submits checkout orders.
#[derive(Clone)]
pub struct OrderSubmitter {
    orders: Arc<dyn OrderService>,
    tracker: Arc<SubmissionTracker>,
}

impl OrderSubmitter {
    #[must_use]
    pub fn new(orders: Arc<dyn OrderService>, tracker: Arc<SubmissionTracker>) -> Self {
        Self { orders, tracker }
    }

    /// Current submission state for a customer.
    #[must_use]
    pub fn state(&self, user_id: &UserId) -> CheckoutState {
        self.tracker.state(user_id)
    }

    /// Attempt to place an order.
    ///
    /// Preconditions are checked in order and the first failure is returned
    /// without touching the submission state. Transport errors are logged
    /// and reported as [`SubmitOutcome::Failed`] with the generic message.
    ///
    /// The order call and the Processing guard are owned by a spawned task.
    /// Dropping the returned future stops waiting for the answer but never
    /// aborts the call, and the customer returns to Idle when it finishes.
    #[instrument(skip_all, fields(user_id = %ctx.user_id))]
    pub async fn submit(&self, ctx: CheckoutContext<'_>) -> SubmitOutcome {
        let Some(cart) = ctx.cart.filter(|cart| !cart.is_empty()) else {
            return SubmitOutcome::Rejected(Rejection::CartEmpty);
        };
        let Some(address) = ctx.address else {
            return SubmitOutcome::Rejected(Rejection::AddressRequired);
        };
        let Some(processing) = self.tracker.begin(ctx.user_id) else {
            tracing::info!("Order already in flight, ignoring duplicate submit");
            return SubmitOutcome::Rejected(Rejection::AlreadyProcessing);
        };

        let order =
            OrderRequest::cash_on_delivery(ctx.user_id.clone(), cart, address, ctx.placed_at);
        tracing::info!(
            cart_id = %order.cart_id,
            lines = order.cart_items.len(),
            total = %order.total_amount,
            "Submitting order"
        );

        let orders = Arc::clone(&self.orders);
        let dispatch = tokio::spawn(
            async move {
                let _processing = processing;
                orders.create_order(&order).await
            }
            .in_current_span(),
        );

        let result = match dispatch.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Order submission task failed");
                return SubmitOutcome::Failed {
                    message: ORDER_FAILED_FALLBACK.to_string(),
                };
            }
        };

        match result {
            Ok(response) if response.success => {
                tracing::info!(order_id = ?response.order_id, "Order created");
                SubmitOutcome::Placed(response)
            }
            Ok(response) => {
                tracing::warn!(message = ?response.message, "Order rejected by shop API");
                let message = response
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| ORDER_FAILED_FALLBACK.to_string());
                SubmitOutcome::Failed { message }
            }
            Err(e) => {
                tracing::error!(error = %e, "Order submission failed");
                SubmitOutcome::Failed {
                    message: ORDER_FAILED_FALLBACK.to_string(),
                }
            }
        }
    }
}
