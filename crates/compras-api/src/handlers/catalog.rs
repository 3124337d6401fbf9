//! Reference data handlers
//!
//! Read-only listings that feed the order form's dropdowns.

use axum::{extract::State, Json};
use compras_ledger::{CategoriaOption, GerenciaNode};
use std::sync::Arc;

use crate::dto::{ArticuloResponse, ProveedorResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /partidaPresupuestal
pub async fn get_partida_tree(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<GerenciaNode>>> {
    Ok(Json(state.reference.partida_tree().await?))
}

/// GET /articulos
pub async fn get_articulos(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ArticuloResponse>>> {
    let articulos = state.reference.articulos().await?;
    Ok(Json(articulos.into_iter().map(Into::into).collect()))
}

/// GET /categorias
pub async fn get_categorias(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CategoriaOption>>> {
    Ok(Json(state.reference.categorias().await?))
}

/// GET /proveedors
pub async fn get_proveedores(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ProveedorResponse>>> {
    let proveedores = state.reference.proveedores().await?;
    Ok(Json(proveedores.into_iter().map(Into::into).collect()))
}
