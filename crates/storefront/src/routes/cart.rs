//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation loads the visitor's shell state from the session, applies
//! one [`ShellEvent`], and stores the result. HTMX requests get the drawer
//! fragment back with a `cart-updated` trigger for the badge; plain form
//! posts are redirected to the shell page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use pineapple_stall_core::{CartLineItem, Product, ProductId, ShellEvent, ShellState};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::CatalogState;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::state::AppState;

/// Header HTMX sets on every request it issues.
const HX_REQUEST: &str = "HX-Request";

/// Event fired after any cart mutation.
const CART_UPDATED_TRIGGER: &str = "cart-updated";

/// Cart line item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub title: String,
    pub image: String,
    pub price: String,
    pub amount: u32,
    pub line_price: String,
}

/// Cart drawer display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
    pub open: bool,
}

impl From<&CartLineItem> for CartItemView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.product_id(),
            title: item.product.title.clone(),
            image: item.product.image.to_string(),
            price: item.product.price.to_string(),
            amount: item.amount.get(),
            line_price: item.line_total().to_string(),
        }
    }
}

impl From<&ShellState> for CartView {
    fn from(shell: &ShellState) -> Self {
        Self {
            items: shell.cart.iter().map(CartItemView::from).collect(),
            subtotal: shell.cart.subtotal().to_string(),
            item_count: shell.total_items(),
            open: shell.drawer_open,
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the visitor's shell state, falling back to an empty one.
///
/// A stored value that no longer decodes is discarded with a warning.
pub(crate) async fn load_shell_state(session: &Session) -> ShellState {
    match session.get::<ShellState>(session_keys::SHELL_STATE).await {
        Ok(state) => state.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Discarding unreadable shell state: {e}");
            ShellState::default()
        }
    }
}

/// Store the visitor's shell state.
async fn store_shell_state(session: &Session, shell: &ShellState) -> Result<()> {
    session.insert(session_keys::SHELL_STATE, shell).await?;
    Ok(())
}

/// Apply one event and store the result.
async fn apply_event(session: &Session, shell: ShellState, event: ShellEvent) -> Result<ShellState> {
    let next = shell.apply(event);
    store_shell_state(session, &next).await?;
    Ok(next)
}

/// Resolve the product behind an add request.
///
/// The cart already holds the full product for anything it contains, so the
/// drawer's "+" keeps working whatever the catalog's state.
fn resolve_product(state: &AppState, shell: &ShellState, product_id: ProductId) -> Result<Product> {
    if let Some(item) = shell.cart.get(product_id) {
        return Ok(item.product.clone());
    }

    match state.catalog().state() {
        catalog @ CatalogState::Ready(_) => catalog
            .find(product_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}"))),
        CatalogState::Pending | CatalogState::Failed => Err(AppError::CatalogUnavailable),
    }
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Drawer fragment for HTMX, redirect to the shell page otherwise.
fn mutation_response(headers: &HeaderMap, shell: &ShellState) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([("HX-Trigger", CART_UPDATED_TRIGGER)]),
            CartDrawerTemplate {
                cart: CartView::from(shell),
            },
        )
            .into_response()
    } else {
        Redirect::to("/").into_response()
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Add/remove form data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: ProductId,
}

/// A cart form, or the reason it could not be read.
type CartItemInput = std::result::Result<Form<CartItemForm>, FormRejection>;

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Add one unit of a product to the cart.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    form: CartItemInput,
) -> Result<Response> {
    let Form(form) = form?;
    let shell = load_shell_state(&session).await;
    let product = resolve_product(&state, &shell, form.product_id)?;

    let shell = apply_event(&session, shell, ShellEvent::AddToCart(product)).await?;
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", &form.product_id.to_string())]),
    );
    tracing::debug!(total_items = shell.total_items(), "Cart updated");

    Ok(mutation_response(&headers, &shell))
}

/// Remove one unit of a product from the cart.
///
/// Removing a product that is not in the cart leaves the cart unchanged.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    form: CartItemInput,
) -> Result<Response> {
    let Form(form) = form?;
    let shell = load_shell_state(&session).await;
    let shell = apply_event(&session, shell, ShellEvent::RemoveFromCart(form.product_id)).await?;
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", &form.product_id.to_string())]),
    );
    tracing::debug!(total_items = shell.total_items(), "Cart updated");

    Ok(mutation_response(&headers, &shell))
}

/// Open the cart drawer.
#[instrument(skip(session, headers))]
pub async fn open(session: Session, headers: HeaderMap) -> Result<Response> {
    let shell = load_shell_state(&session).await;
    let shell = apply_event(&session, shell, ShellEvent::OpenCart).await?;
    Ok(mutation_response(&headers, &shell))
}

/// Close the cart drawer.
#[instrument(skip(session, headers))]
pub async fn close(session: Session, headers: HeaderMap) -> Result<Response> {
    let shell = load_shell_state(&session).await;
    let shell = apply_event(&session, shell, ShellEvent::CloseCart).await?;
    Ok(mutation_response(&headers, &shell))
}

/// Get the cart drawer (HTMX).
#[instrument(skip(session))]
pub async fn drawer(session: Session) -> impl IntoResponse {
    let shell = load_shell_state(&session).await;
    CartDrawerTemplate {
        cart: CartView::from(&shell),
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let shell = load_shell_state(&session).await;
    CartCountTemplate {
        count: shell.total_items(),
    }
}
