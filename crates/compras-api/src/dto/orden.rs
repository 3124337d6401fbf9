//! Purchase order DTOs

use chrono::{DateTime, Utc};
use compras_ledger::OrderListing;
use compras_db::DbOrdenCompra;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stored purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdenCompraResponse {
    pub id: i64,
    pub idx: Option<i64>,
    pub oc: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub importe: Decimal,
    pub moneda: String,
    pub categoria: String,
    pub proveedor: Option<String>,
    pub solicitante: String,
    pub descripcion: String,
    pub articulo: String,
    pub gerencia: String,
    pub centro_costo: i64,
    pub centro_costo_nombre: Option<String>,
    pub partida: i64,
    pub presupuesto: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbOrdenCompra> for OrdenCompraResponse {
    fn from(o: DbOrdenCompra) -> Self {
        Self {
            id: o.id,
            idx: o.idx,
            oc: o.oc,
            importe: o.importe(),
            moneda: o.moneda,
            categoria: o.categoria,
            proveedor: o.proveedor,
            solicitante: o.solicitante,
            descripcion: o.descripcion,
            articulo: o.articulo,
            gerencia: o.gerencia,
            centro_costo: o.centro_costo,
            centro_costo_nombre: None,
            partida: o.partida,
            presupuesto: o.presupuesto,
            created_at: o.created_at,
        }
    }
}

impl From<OrderListing> for OrdenCompraResponse {
    fn from(listing: OrderListing) -> Self {
        Self {
            centro_costo_nombre: listing.centro_costo_nombre,
            ..Self::from(listing.orden)
        }
    }
}

/// Body of a submission the budget could not cover
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRejectionResponse {
    pub message: String,
    pub accepted: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_fund: Decimal,
}
