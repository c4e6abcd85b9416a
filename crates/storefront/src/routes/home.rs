//! Shell page route handler.
//!
//! Renders one of three pages depending on the catalog state: a progress
//! bar while the fetch is pending, a static error message when it failed, or
//! the badge, product grid and cart drawer once products are available.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pineapple_stall_core::{Product, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use super::cart::{CartView, load_shell_state};
use crate::catalog::CatalogState;
use crate::error::CATALOG_FAILURE_MESSAGE;
use crate::filters;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub description: String,
    pub image: String,
    pub price: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            image: product.image.to_string(),
            price: product.price.to_string(),
        }
    }
}

/// Progress page shown while the catalog is loading.
#[derive(Template, WebTemplate)]
#[template(path = "loading.html")]
pub struct LoadingTemplate;

/// Error page shown when the catalog fetch failed.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct CatalogErrorTemplate {
    pub message: &'static str,
}

/// Shell page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
    pub cart: CartView,
    pub count: u32,
}

/// Display the shell page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Response {
    let products = match state.catalog().state() {
        CatalogState::Pending => return LoadingTemplate.into_response(),
        CatalogState::Failed => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                CatalogErrorTemplate {
                    message: CATALOG_FAILURE_MESSAGE,
                },
            )
                .into_response();
        }
        CatalogState::Ready(products) => products,
    };

    let shell = load_shell_state(&session).await;

    HomeTemplate {
        products: products.iter().map(ProductView::from).collect(),
        cart: CartView::from(&shell),
        count: shell.total_items(),
    }
    .into_response()
}
