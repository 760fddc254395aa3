//! Response envelopes used by the shop API.

use reqwest::StatusCode;
use serde::Deserialize;

use super::ShopApiError;
use crate::models::CurrentUser;

/// Standard `{ success, message, data }` wrapper.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap `data`, treating `success: false` as an API error.
    ///
    /// # Errors
    ///
    /// Returns [`ShopApiError::Api`] carrying the envelope's message when the
    /// shop reports failure.
    pub fn into_data(self, status: StatusCode) -> Result<Option<T>, ShopApiError> {
        if !self.success {
            return Err(ShopApiError::Api {
                status: status.as_u16(),
                message: self
                    .message
                    .unwrap_or_else(|| "request unsuccessful".to_string()),
            });
        }
        Ok(self.data)
    }
}

/// Body of `GET /api/auth/check-auth`.
#[derive(Debug, Deserialize)]
pub struct AuthCheck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<CurrentUser>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_envelope_yields_data() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2]}"#).unwrap();
        assert_eq!(envelope.into_data(StatusCode::OK).unwrap(), Some(vec![1, 2]));
    }

    #[test]
    fn test_unsuccessful_envelope_is_error() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": false, "message": "Invalid user id", "data": []}"#)
                .unwrap();
        let err = envelope.into_data(StatusCode::OK).unwrap_err();
        assert!(matches!(
            err,
            ShopApiError::Api { status: 200, ref message } if message == "Invalid user id"
        ));
    }
}
