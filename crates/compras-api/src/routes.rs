//! API Routes
//!
//! Paths keep the names the order form already calls.

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// Reference data, fund and order routes
pub fn compras_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Reference data
        .route("/partidaPresupuestal", get(handlers::catalog::get_partida_tree))
        .route("/articulos", get(handlers::catalog::get_articulos))
        .route("/categorias", get(handlers::catalog::get_categorias))
        .route("/proveedors", get(handlers::catalog::get_proveedores))
        // Funds
        .route("/cuentaContables", get(handlers::cuenta::get_cuentas))
        .route("/cuentaContables/:partida", put(handlers::cuenta::update_fondo))
        .route("/cuentaContables/:partida/ajuste", post(handlers::cuenta::ajustar_fondo))
        // Orders
        .route("/ordenCompra", post(handlers::orden::create_orden))
        .route("/ordenCompras", get(handlers::orden::get_ordenes))
}
