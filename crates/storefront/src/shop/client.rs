//! HTTP implementation of the shop API collaborators.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use shopfront_core::{Address, Cart, OrderRequest, OrderResponse, OrderSummary, UserId};

use super::types::{ApiEnvelope, AuthCheck};
use super::{AddressBook, Authenticator, CartSource, OrderService, ShopApiError};
use crate::config::ShopApiConfig;
use crate::models::CurrentUser;

/// How long a successful auth check is trusted.
const AUTH_CACHE_TTL: Duration = Duration::from_secs(60);

/// Maximum number of cached auth checks.
const AUTH_CACHE_CAPACITY: u64 = 10_000;

/// Name of the shop's auth cookie, forwarded on auth checks.
pub const AUTH_COOKIE_NAME: &str = "token";

/// Client for the shop REST API.
///
/// Cheaply cloneable; all clones share one connection pool and auth cache.
#[derive(Clone)]
pub struct ShopApiClient {
    inner: Arc<ShopApiClientInner>,
}

struct ShopApiClientInner {
    client: reqwest::Client,
    config: ShopApiConfig,
    auth_cache: Cache<String, CurrentUser>,
}

/// Raw status and body of a shop API call.
struct RawResponse {
    status: StatusCode,
    body: String,
    /// `Retry-After` seconds, set only on 429 responses.
    retry_after: Option<u64>,
}

impl RawResponse {
    /// Truncated body for logs and error messages.
    fn snippet(&self) -> String {
        self.body.chars().take(200).collect()
    }

    fn parse<T: DeserializeOwned>(&self) -> Result<T, ShopApiError> {
        serde_json::from_str(&self.body).map_err(|e| {
            tracing::error!(
                error = %e,
                status = %self.status,
                body = %self.snippet(),
                "Failed to parse shop API response"
            );
            ShopApiError::Parse(e)
        })
    }

    /// Error for a non-success response, preferring a rate-limit error.
    fn error(&self) -> ShopApiError {
        match self.retry_after {
            Some(seconds) => ShopApiError::RateLimited(seconds),
            None => self.api_error(),
        }
    }

    /// Interpret an order creation response.
    ///
    /// A `{ success: false, message }` body is the shop's answer whatever the
    /// status, rate limits included, so its message reaches the customer.
    fn order_reply(&self) -> Result<OrderResponse, ShopApiError> {
        let parsed = serde_json::from_str::<OrderResponse>(&self.body);
        if self.status.is_success() {
            return Ok(parsed?);
        }

        match parsed {
            Ok(response) if !response.success => Ok(response),
            _ => Err(self.error()),
        }
    }

    fn api_error(&self) -> ShopApiError {
        let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&self.body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| self.snippet());
        ShopApiError::Api {
            status: self.status.as_u16(),
            message,
        }
    }
}

impl ShopApiClient {
    /// Create a new shop API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API token is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &ShopApiConfig) -> Result<Self, ShopApiError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.api_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ShopApiError::Config(format!("Invalid API token format: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let auth_cache = Cache::builder()
            .max_capacity(AUTH_CACHE_CAPACITY)
            .time_to_live(AUTH_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ShopApiClientInner {
                client,
                config: config.clone(),
                auth_cache,
            }),
        })
    }

    /// Execute a request and read the body.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<RawResponse, ShopApiError> {
        let response = request.send().await?;
        let status = response.status();

        let retry_after = (status == StatusCode::TOO_MANY_REQUESTS).then(|| {
            response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1)
        });

        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "Shop API response");
        Ok(RawResponse {
            status,
            body,
            retry_after,
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.inner.client.get(self.inner.config.endpoint(path))
    }

    /// GET a `{ success, data }` endpoint and unwrap `data`.
    ///
    /// A 404 is reported as `Ok(None)`; a body with `success: false` is an
    /// error.
    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ShopApiError> {
        let raw = self.send(self.get(path)).await?;

        if raw.status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !raw.status.is_success() {
            tracing::error!(
                status = %raw.status,
                body = %raw.snippet(),
                "Shop API returned non-success status"
            );
            return Err(raw.error());
        }

        let envelope: ApiEnvelope<T> = raw.parse()?;
        envelope.into_data(raw.status)
    }
}

#[async_trait]
impl CartSource for ShopApiClient {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn fetch_cart(&self, user_id: &UserId) -> Result<Option<Cart>, ShopApiError> {
        self.get_data(&format!("api/shop/cart/get/{user_id}")).await
    }
}

#[async_trait]
impl AddressBook for ShopApiClient {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_addresses(&self, user_id: &UserId) -> Result<Vec<Address>, ShopApiError> {
        Ok(self
            .get_data(&format!("api/shop/address/get/{user_id}"))
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl OrderService for ShopApiClient {
    #[instrument(skip(self, order), fields(user_id = %order.user_id, cart_id = %order.cart_id))]
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderResponse, ShopApiError> {
        let request = self
            .inner
            .client
            .post(self.inner.config.endpoint("api/shop/order/create"))
            .json(order);
        let raw = self.send(request).await?;
        raw.order_reply()
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_orders(&self, user_id: &UserId) -> Result<Vec<OrderSummary>, ShopApiError> {
        Ok(self
            .get_data(&format!("api/shop/order/list/{user_id}"))
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl Authenticator for ShopApiClient {
    #[instrument(skip_all)]
    async fn current_user(&self, token: &str) -> Result<Option<CurrentUser>, ShopApiError> {
        if token.is_empty() {
            return Ok(None);
        }
        if let Some(user) = self.inner.auth_cache.get(token).await {
            return Ok(Some(user));
        }

        let request = self
            .get("api/auth/check-auth")
            .header(COOKIE, format!("{AUTH_COOKIE_NAME}={token}"));
        let raw = self.send(request).await?;

        if matches!(raw.status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Ok(None);
        }
        if !raw.status.is_success() {
            return Err(raw.error());
        }

        let check: AuthCheck = raw.parse()?;
        let user = check.user.filter(|_| check.success);
        if let Some(user) = &user {
            self.inner
                .auth_cache
                .insert(token.to_owned(), user.clone())
                .await;
        }
        Ok(user)
    }
}
