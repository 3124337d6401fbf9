//! Cuenta contable and fund handlers

use axum::{
    extract::{Path, State},
    Json,
};
use compras_ledger::FundDirection;
use std::sync::Arc;

use crate::dto::{AjusteFondoRequest, CuentaContableResponse, FondoResponse, MessageResponse, UpdateFondoRequest};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::telemetry;
use crate::state::AppState;

/// GET /cuentaContables
pub async fn get_cuentas(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CuentaContableResponse>>> {
    let cuentas = state.reference.cuentas().await?;
    Ok(Json(cuentas.into_iter().map(Into::into).collect()))
}

/// PUT /cuentaContables/:partida
pub async fn update_fondo(
    State(state): State<Arc<AppState>>,
    Path(partida): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateFondoRequest>,
) -> ApiResult<Json<MessageResponse<FondoResponse>>> {
    let fondo = state.ledger.set_fund(&partida, req.fondo).await?;
    telemetry::record_fund_change("set");

    Ok(Json(MessageResponse::new(
        "Fondo actualizado",
        FondoResponse { partida, fondo },
    )))
}

/// POST /cuentaContables/:partida/ajuste
///
/// Server-side add or remove. Removing more than the fund leaves it at zero.
pub async fn ajustar_fondo(
    State(state): State<Arc<AppState>>,
    Path(partida): Path<String>,
    ValidatedJson(req): ValidatedJson<AjusteFondoRequest>,
) -> ApiResult<Json<MessageResponse<FondoResponse>>> {
    let direction = FundDirection::from(req.tipo);
    let fondo = state.ledger.adjust_fund(&partida, req.monto, direction).await?;
    telemetry::record_fund_change(req.tipo.as_str());

    let message = match direction {
        FundDirection::Increase => "Fondo agregado",
        FundDirection::Decrease => "Fondo quitado",
    };

    Ok(Json(MessageResponse::new(message, FondoResponse { partida, fondo })))
}
