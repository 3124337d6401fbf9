//! Purchase order handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use compras_ledger::{LedgerError, OrderDraft, Submission};
use std::sync::Arc;

use crate::dto::{BudgetRejectionResponse, MessageResponse, OrdenCompraResponse};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{JsonBody, RequestId};
use crate::telemetry;
use crate::state::AppState;

/// POST /ordenCompra
///
/// 201 with the stored order when the partida's fund covers it, 422 with the
/// fund shortfall when it does not.
pub async fn create_orden(
    State(state): State<Arc<AppState>>,
    RequestId(request_id): RequestId,
    JsonBody(draft): JsonBody<OrderDraft>,
) -> ApiResult<Response> {
    let submission = match state.intake.submit(&draft).await {
        Ok(submission) => submission,
        Err(err) => {
            let outcome = match &err {
                LedgerError::Validation(_) => "invalid",
                _ => "error",
            };
            telemetry::record_submission(outcome);
            tracing::debug!(request_id = %request_id, outcome, "Order submission failed");
            return Err(ApiError::from(err));
        }
    };

    let response = match submission {
        Submission::Persisted { order, .. } => {
            telemetry::record_submission("accepted");
            (
                StatusCode::CREATED,
                Json(MessageResponse::new(
                    "Orden de compra registrada",
                    OrdenCompraResponse::from(order),
                )),
            )
                .into_response()
        }
        Submission::Rejected { reservation } => {
            telemetry::record_submission("rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(BudgetRejectionResponse {
                    message: "Presupuesto insuficiente para la partida".to_string(),
                    accepted: false,
                    remaining_fund: reservation.remaining_fund,
                }),
            )
                .into_response()
        }
    };

    Ok(response)
}

/// GET /ordenCompras
pub async fn get_ordenes(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<OrdenCompraResponse>>> {
    let orders = state.intake.list_orders().await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}
