use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::app::model::{BooksQuery, LanguageRequest, OrderItem, OrderRequest, RefreshResponse};
use crate::app::state::AppState;
use crate::cart::Cart;
use crate::formats::{CategoryHierarchy, OrderSubmission};
use crate::order::{self, Customer};
use crate::storefront::{Catalog, ITEMS_PER_PAGE, Language, paginate};

type ApiError = (StatusCode, String);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/api/books", get(list_books))
        .route("/api/categories", get(list_categories))
        .route("/api/language", post(set_language))
        .route("/api/refresh", post(refresh))
        .route("/api/orders", post(place_order))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BooksQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let catalog = state.catalog().read().await;
    let filter = catalog.category_filter(query.category.as_deref(), query.exact);
    let page = paginate(catalog.filter(&filter, &query.q), query.page, ITEMS_PER_PAGE);

    let body = serde_json::to_value(&page)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, format!("serialize page: {err}")))?;
    Ok(Json(body))
}

async fn list_categories(State(state): State<AppState>) -> Json<CategoryHierarchy> {
    Json(state.catalog().read().await.hierarchy().clone())
}

async fn set_language(
    State(state): State<AppState>,
    Json(req): Json<LanguageRequest>,
) -> Result<Json<CategoryHierarchy>, ApiError> {
    let language =
        Language::parse(&req.lang).map_err(|err| (StatusCode::BAD_REQUEST, format!("{err:#}")))?;

    let mut catalog = state.catalog().write().await;
    catalog.set_language(language);
    Ok(Json(catalog.hierarchy().clone()))
}

async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, ApiError> {
    let total_items = state
        .refresh()
        .await
        .map_err(|err| (StatusCode::BAD_GATEWAY, format!("refresh failed: {err:#}")))?;
    Ok(Json(RefreshResponse { total_items }))
}

async fn place_order(
    State(state): State<AppState>,
    Json(req): Json<OrderRequest>,
) -> Result<Json<OrderSubmission>, ApiError> {
    let Some(endpoint) = state.order_url() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "order endpoint is not configured".to_string(),
        ));
    };

    let submission = {
        let catalog = state.catalog().read().await;
        let cart = build_cart(&catalog, &req.items)
            .map_err(|err| (StatusCode::BAD_REQUEST, format!("{err:#}")))?;
        let customer = Customer {
            name: req.name,
            phone: req.phone,
            address: req.address,
        };
        order::build_submission(&customer, &cart, chrono::Utc::now())
            .map_err(|err| (StatusCode::BAD_REQUEST, format!("{err:#}")))?
    };

    order::submit(state.client(), endpoint, &submission)
        .await
        .map_err(|err| (StatusCode::BAD_GATEWAY, format!("order failed: {err:#}")))?;
    Ok(Json(submission))
}

/// Prices and stock come from the catalog, never from the request. Repeated
/// titles are summed before the stock check.
fn build_cart(catalog: &Catalog, items: &[OrderItem]) -> anyhow::Result<Cart> {
    let mut requested: Vec<(&str, u32)> = Vec::new();
    for item in items.iter().filter(|item| item.quantity > 0) {
        match requested.iter_mut().find(|(title, _)| *title == item.title) {
            Some((_, quantity)) => *quantity = quantity.saturating_add(item.quantity),
            None => requested.push((item.title.as_str(), item.quantity)),
        }
    }

    let mut cart = Cart::default();
    for (title, quantity) in requested {
        let book = catalog
            .find(title)
            .ok_or_else(|| anyhow::anyhow!("book not found: {title}"))?;
        cart.add(book)?;
        cart.set_quantity(&book.title, quantity)?;
    }
    Ok(cart)
}
