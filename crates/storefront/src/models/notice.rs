//! One-shot notices shown to the customer after an action.
//!
//! A handler stores a [`Notice`] in the session before redirecting; the next
//! page render takes it out again so it is displayed exactly once.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Visual severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeVariant {
    Success,
    Destructive,
}

impl NoticeVariant {
    /// CSS modifier class used by the notice partial.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "notice--success",
            Self::Destructive => "notice--destructive",
        }
    }
}

/// A message for the customer with a severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub variant: NoticeVariant,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            variant: NoticeVariant::Success,
        }
    }

    #[must_use]
    pub fn destructive(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    /// Store this notice for the next page render.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn flash(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(session_keys::FLASH_NOTICE, self).await
    }

    /// Take the pending notice, if any, out of the session.
    ///
    /// A session read failure is logged and treated as "no notice".
    pub async fn take(session: &Session) -> Option<Self> {
        match session.remove::<Self>(session_keys::FLASH_NOTICE).await {
            Ok(notice) => notice,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read flash notice");
                None
            }
        }
    }
}
