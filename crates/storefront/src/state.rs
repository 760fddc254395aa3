//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::{OrderSubmitter, SubmissionTracker};
use crate::shop::{AddressBook, Authenticator, CartSource, OrderService, ShopApiClient, ShopApiError};

/// The external services the storefront reads from and writes to.
#[derive(Clone)]
pub struct Collaborators {
    pub carts: Arc<dyn CartSource>,
    pub addresses: Arc<dyn AddressBook>,
    pub orders: Arc<dyn OrderService>,
    pub auth: Arc<dyn Authenticator>,
}

impl Collaborators {
    /// Use one shop API client for every collaborator.
    #[must_use]
    pub fn from_client(client: &ShopApiClient) -> Self {
        Self {
            carts: Arc::new(client.clone()),
            addresses: Arc::new(client.clone()),
            orders: Arc::new(client.clone()),
            auth: Arc::new(client.clone()),
        }
    }
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the shop API collaborators and the order submitter.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    collaborators: Collaborators,
    submitter: OrderSubmitter,
}

impl AppState {
    /// Create application state from explicit collaborators.
    #[must_use]
    pub fn new(config: StorefrontConfig, collaborators: Collaborators) -> Self {
        let submitter = OrderSubmitter::new(
            Arc::clone(&collaborators.orders),
            Arc::new(SubmissionTracker::new()),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                collaborators,
                submitter,
            }),
        }
    }

    /// Create application state backed by the configured shop API.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop API client cannot be built.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, ShopApiError> {
        let client = ShopApiClient::new(&config.shop_api)?;
        Ok(Self::new(config, Collaborators::from_client(&client)))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn carts(&self) -> &dyn CartSource {
        self.inner.collaborators.carts.as_ref()
    }

    #[must_use]
    pub fn addresses(&self) -> &dyn AddressBook {
        self.inner.collaborators.addresses.as_ref()
    }

    #[must_use]
    pub fn orders(&self) -> &dyn OrderService {
        self.inner.collaborators.orders.as_ref()
    }

    #[must_use]
    pub fn auth(&self) -> &dyn Authenticator {
        self.inner.collaborators.auth.as_ref()
    }

    /// Get a reference to the checkout order submitter.
    #[must_use]
    pub fn submitter(&self) -> &OrderSubmitter {
        &self.inner.submitter
    }
}
