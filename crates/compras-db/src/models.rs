//! Database models - mapped from SQLite tables

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::money::from_cents;

// ============================================================================
// Reference Tree
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbCuentaContable {
    pub id: i64,
    pub ccontable: String,
    pub desc_contable: String,
    pub partida: String,
    pub centro_costo_id: i64,
    pub fondo_cents: i64,
    pub updated_at: DateTime<Utc>,
}

impl DbCuentaContable {
    pub fn fondo(&self) -> Decimal {
        from_cents(self.fondo_cents)
    }
}

/// Cuenta contable with its centro de costo description resolved
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbCuentaContableListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub cuenta: DbCuentaContable,
    pub centro_costo_nombre: String,
}

/// One row of the gerencia -> centro de costo -> cuenta join.
///
/// Outer joins keep gerencias without centros and centros without cuentas,
/// so the lower levels are optional.
#[derive(Debug, Clone, FromRow)]
pub struct DbPartidaTreeRow {
    pub gerencia_id: i64,
    pub gerencia: String,
    pub centro_costo_id: Option<i64>,
    pub ccosto: Option<String>,
    pub desc_cc: Option<String>,
    pub ccontable: Option<String>,
    pub desc_contable: Option<String>,
    pub partida: Option<String>,
}

// ============================================================================
// Catalogs
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbArticulo {
    pub id: i64,
    pub codigo_articulo: String,
    pub desc_articulo: String,
    pub familia_material: String,
    pub unidad_medida: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbCategoriaCompra {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbProveedor {
    pub id: i64,
    pub codigo: String,
    pub razon_social: String,
}

// ============================================================================
// Purchase Orders
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbOrdenCompra {
    pub id: i64,
    pub idx: Option<i64>,
    pub oc: i64,
    pub importe_cents: i64,
    pub moneda: String,
    pub categoria: String,
    pub proveedor: Option<String>,
    pub solicitante: String,
    pub descripcion: String,
    pub articulo: String,
    pub gerencia: String,
    pub centro_costo: i64,
    pub partida: i64,
    pub presupuesto: bool,
    pub created_at: DateTime<Utc>,
}

impl DbOrdenCompra {
    pub fn importe(&self) -> Decimal {
        from_cents(self.importe_cents)
    }
}

/// Order with its centro de costo description resolved
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbOrdenCompraListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub orden: DbOrdenCompra,
    pub centro_costo_nombre: Option<String>,
}

/// Insert payload for a new order. `oc` is assigned by the store when absent.
#[derive(Debug, Clone)]
pub struct NewOrdenCompra {
    pub idx: Option<i64>,
    pub oc: Option<i64>,
    pub importe_cents: i64,
    pub moneda: String,
    pub categoria: String,
    pub proveedor: Option<String>,
    pub solicitante: String,
    pub descripcion: String,
    pub articulo: String,
    pub gerencia: String,
    pub centro_costo: i64,
    pub partida: i64,
    pub presupuesto: bool,
}
