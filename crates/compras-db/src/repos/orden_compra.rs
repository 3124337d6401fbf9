//! Purchase order repository

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::{DbOrdenCompra, DbOrdenCompraListing, DbResult, NewOrdenCompra};

pub struct OrdenCompraRepo {
    pool: SqlitePool,
}

impl OrdenCompraRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an order on the caller's connection.
    ///
    /// When `oc` is not supplied the next order number is taken as
    /// `max(oc) + 1`; inside a write transaction SQLite holds the database
    /// lock, so the number cannot be handed out twice.
    pub async fn insert_on(conn: &mut SqliteConnection, order: &NewOrdenCompra) -> DbResult<DbOrdenCompra> {
        let o = sqlx::query_as::<_, DbOrdenCompra>(
            r#"
            INSERT INTO orden_compras (idx, oc, importe_cents, moneda, categoria, proveedor,
                solicitante, descripcion, articulo, gerencia, centro_costo, partida, presupuesto, created_at)
            VALUES ($1, COALESCE($2, (SELECT COALESCE(MAX(oc), 0) + 1 FROM orden_compras)),
                $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#
        )
        .bind(order.idx)
        .bind(order.oc)
        .bind(order.importe_cents)
        .bind(&order.moneda)
        .bind(&order.categoria)
        .bind(&order.proveedor)
        .bind(&order.solicitante)
        .bind(&order.descripcion)
        .bind(&order.articulo)
        .bind(&order.gerencia)
        .bind(order.centro_costo)
        .bind(order.partida)
        .bind(order.presupuesto)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;
        Ok(o)
    }

    /// All orders, newest first, with the centro de costo description joined
    /// on its code. Orders keep no foreign key, so the description may be missing.
    pub async fn list_with_centro(&self) -> DbResult<Vec<DbOrdenCompraListing>> {
        let orders = sqlx::query_as::<_, DbOrdenCompraListing>(
            r#"
            SELECT o.*, cc.desc_cc AS centro_costo_nombre
            FROM orden_compras o
            LEFT JOIN centros_costos cc ON cc.ccosto = CAST(o.centro_costo AS TEXT)
            ORDER BY o.id DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orden_compras")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
