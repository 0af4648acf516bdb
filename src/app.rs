//! HTTP storefront over a shared, refreshable catalog.

pub mod model;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
