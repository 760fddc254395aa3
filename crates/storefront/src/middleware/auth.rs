//! Authentication extractors.
//!
//! The shop API issues the customer's auth token as a `token` cookie. The
//! extractors here forward that cookie to the shop's auth check (via the
//! [`Authenticator`](crate::shop::Authenticator) collaborator) and hand the
//! resolved customer to the handler.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header::COOKIE, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::cookie::Cookie;

use crate::error::set_sentry_user;
use crate::models::CurrentUser;
use crate::shop::AUTH_COOKIE_NAME;
use crate::state::AppState;

/// Extractor that requires an authenticated customer.
///
/// If the customer is not logged in, the request is redirected to the
/// shop's login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.user_name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but cannot be established.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the shop's login page.
    RedirectToLogin(String),
    /// The auth check itself failed.
    Unavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(login_url) => Redirect::to(&login_url).into_response(),
            Self::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Unable to verify your session, please try again",
            )
                .into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match auth_token(&parts.headers) {
            Some(token) => state.auth().current_user(&token).await.map_err(|e| {
                tracing::error!(error = %e, "Auth check failed");
                AuthRejection::Unavailable
            })?,
            None => None,
        };

        let Some(user) = user else {
            return Err(AuthRejection::RedirectToLogin(
                state.config().shop_api.login_url.clone(),
            ));
        };

        set_sentry_user(&user.id, Some(user.email.as_str()).filter(|e| !e.is_empty()));
        Ok(Self(user))
    }
}

/// Read the shop auth token from the request cookies.
#[must_use]
pub fn auth_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == AUTH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty())
}
