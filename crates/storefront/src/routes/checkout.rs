//! Checkout route handlers.
//!
//! The page is server-rendered. Selecting an address and placing an order are
//! plain form posts that store a notice in the session and redirect
//! (post/redirect/get), so a refresh never resubmits an order.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::{Address, AddressId, Cart, CartItem, Price, cart_total};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Notice, session_keys};
use crate::services::{CheckoutContext, CheckoutState};
use crate::state::AppState;

/// Path of the checkout page.
pub const CHECKOUT_PAGE: &str = "/shop/checkout";

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct LineView {
    pub title: String,
    pub image: Option<String>,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartItem> for LineView {
    fn from(item: &CartItem) -> Self {
        Self {
            title: item.title.clone(),
            image: item.image.clone().filter(|url| !url.is_empty()),
            unit_price: Price::from_amount(item.effective_price()).display(),
            quantity: item.quantity_or_zero(),
            line_total: Price::from_amount(item.line_total()).display(),
        }
    }
}

/// Address display data for templates.
#[derive(Debug, Clone)]
pub struct AddressView {
    pub id: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub phone: String,
    pub notes: String,
    pub selected: bool,
}

impl AddressView {
    fn new(address: &Address, selected: Option<&AddressId>) -> Self {
        Self {
            id: address.id.to_string(),
            address: address.address.clone(),
            city: address.city.clone(),
            pincode: address.pincode.clone(),
            phone: address.phone.clone(),
            notes: address.notes.clone(),
            selected: selected == Some(&address.id),
        }
    }
}

/// Checkout page display data.
#[derive(Debug, Clone)]
pub struct CheckoutView {
    pub items: Vec<LineView>,
    pub addresses: Vec<AddressView>,
    pub subtotal: String,
    pub total: String,
}

impl CheckoutView {
    #[must_use]
    pub fn new(cart: Option<&Cart>, addresses: &[Address], selected: Option<&AddressId>) -> Self {
        // Shipping is free, so the total equals the subtotal.
        let total = Price::from_amount(cart_total(cart)).display();

        Self {
            items: cart
                .map(|cart| cart.items.iter().map(LineView::from).collect())
                .unwrap_or_default(),
            addresses: addresses
                .iter()
                .map(|address| AddressView::new(address, selected))
                .collect(),
            subtotal: total.clone(),
            total,
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub user: CurrentUser,
    pub checkout: CheckoutView,
    pub notice: Option<Notice>,
    pub processing: bool,
}

/// Select address form data.
#[derive(Debug, Deserialize)]
pub struct SelectAddressForm {
    pub address_id: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the selected address ID from the session.
async fn selected_address_id(session: &Session) -> Result<Option<AddressId>> {
    Ok(session.get::<AddressId>(session_keys::SELECTED_ADDRESS).await?)
}

/// Fetch the cart and address book for a customer concurrently.
async fn load_checkout(state: &AppState, user: &CurrentUser) -> Result<(Option<Cart>, Vec<Address>)> {
    let (cart, addresses) = tokio::try_join!(
        state.carts().fetch_cart(&user.id),
        state.addresses().list_addresses(&user.id)
    )?;
    Ok((cart, addresses))
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout page.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<CheckoutShowTemplate> {
    let (cart, addresses) = load_checkout(&state, &user).await?;
    let selected = selected_address_id(&session).await?;
    let notice = Notice::take(&session).await;
    let processing = state.submitter().state(&user.id) == CheckoutState::Processing;

    Ok(CheckoutShowTemplate {
        checkout: CheckoutView::new(cart.as_ref(), &addresses, selected.as_ref()),
        user,
        notice,
        processing,
    })
}

/// Remember the customer's chosen delivery address.
#[instrument(skip(state, session, user, form), fields(user_id = %user.id))]
pub async fn select_address(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<SelectAddressForm>,
) -> Result<Redirect> {
    let address_id = AddressId::new(form.address_id);
    let addresses = state.addresses().list_addresses(&user.id).await?;

    if !addresses.iter().any(|address| address.id == address_id) {
        return Err(AppError::NotFound(format!("address {address_id}")));
    }

    session
        .insert(session_keys::SELECTED_ADDRESS, &address_id)
        .await?;
    tracing::debug!(address_id = %address_id, "Address selected");

    Ok(Redirect::to(CHECKOUT_PAGE))
}

/// Place the order and redirect to the account page or back to checkout.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Redirect> {
    let (cart, addresses) = load_checkout(&state, &user).await?;
    let selected = selected_address_id(&session).await?;
    let address = selected
        .as_ref()
        .and_then(|id| addresses.iter().find(|address| &address.id == id));

    let outcome = state
        .submitter()
        .submit(CheckoutContext {
            user_id: &user.id,
            cart: cart.as_ref(),
            address,
            placed_at: Utc::now(),
        })
        .await;

    outcome.notice().flash(&session).await?;

    let Some(target) = outcome.redirect_to() else {
        return Ok(Redirect::to(CHECKOUT_PAGE));
    };

    // Address selection only lives for one checkout.
    session
        .remove::<AddressId>(session_keys::SELECTED_ADDRESS)
        .await?;
    let cart_id = cart.as_ref().map(|c| c.id.to_string()).unwrap_or_default();
    add_breadcrumb("checkout", "Order placed", Some(&[("cart_id", cart_id.as_str())]));

    Ok(Redirect::to(target))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use shopfront_core::{CartId, ProductId};

    use super::*;

    fn address(id: &str) -> Address {
        Address {
            id: AddressId::new(id),
            address: "12 Hill Rd".to_string(),
            city: "Pune".to_string(),
            pincode: "411001".to_string(),
            phone: "5550100".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_checkout_view_totals_and_selection() {
        let cart = Cart {
            id: CartId::new("c1"),
            items: vec![
                CartItem {
                    product_id: ProductId::new("p1"),
                    title: "Shirt".to_string(),
                    image: Some(String::new()),
                    price: Some(Decimal::from(10)),
                    sale_price: Some(Decimal::ZERO),
                    quantity: Some(2),
                },
                CartItem {
                    product_id: ProductId::new("p2"),
                    title: "Hat".to_string(),
                    image: Some("hat.png".to_string()),
                    price: Some(Decimal::from(5)),
                    sale_price: Some(Decimal::from(4)),
                    quantity: Some(1),
                },
            ],
        };
        let addresses = [address("a1"), address("a2")];

        let view = CheckoutView::new(Some(&cart), &addresses, Some(&AddressId::new("a2")));

        assert_eq!(view.subtotal, "$24.00");
        assert_eq!(view.total, "$24.00");
        assert_eq!(view.items.len(), 2);
        assert!(view.items.first().is_some_and(|line| line.image.is_none()));
        assert!(view.items.get(1).is_some_and(|line| line.unit_price == "$4.00"));
        assert!(view.items.first().is_some_and(|line| line.line_total == "$20.00"));
        assert_eq!(
            view.addresses.iter().map(|a| a.selected).collect::<Vec<_>>(),
            vec![false, true]
        );
    }

    #[test]
    fn test_checkout_view_without_cart() {
        let view = CheckoutView::new(None, &[], None);
        assert!(view.items.is_empty());
        assert_eq!(view.total, "$0.00");
    }
}
