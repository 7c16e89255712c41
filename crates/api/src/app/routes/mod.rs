use axum::Router;

pub mod catalog;
pub mod inventory;
pub mod orders;
pub mod system;

/// Router for all catalog-backed endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/inventory", inventory::router())
        .nest("/orders", orders::router())
        .nest("/catalog", catalog::router())
}
