//! Account page: landing page after checkout, with the customer's orders.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::{OrderSummary, Price};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Notice};
use crate::state::AppState;

/// Order history row for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub date: String,
    pub status: &'static str,
    pub total: String,
}

impl From<&OrderSummary> for OrderView {
    fn from(order: &OrderSummary) -> Self {
        Self {
            id: order.id.to_string(),
            date: order
                .order_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            status: order.order_status.label(),
            total: order
                .total_amount
                .map(|amount| Price::from_amount(amount).display())
                .unwrap_or_default(),
        }
    }
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub user: CurrentUser,
    pub orders: Vec<OrderView>,
    pub notice: Option<Notice>,
}

/// Display the account page.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<AccountTemplate> {
    let notice = Notice::take(&session).await;
    let orders = state.orders().list_orders(&user.id).await?;

    Ok(AccountTemplate {
        orders: orders.iter().map(OrderView::from).collect(),
        user,
        notice,
    })
}
