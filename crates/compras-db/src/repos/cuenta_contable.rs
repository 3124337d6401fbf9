//! Cuenta contable repository: fund balances per partida

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::money::MAX_CENTS;
use crate::{DbCuentaContable, DbCuentaContableListing, DbResult};

const COLUMNS: &str = "id, ccontable, desc_contable, partida, centro_costo_id, fondo_cents, updated_at";

/// Fund balance repository.
///
/// Every mutation is a single conditional `UPDATE ... RETURNING`, so the
/// check and the write can never be split by another writer.
pub struct CuentaContableRepo {
    pool: SqlitePool,
}

impl CuentaContableRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All cuentas with their centro de costo description, ordered by partida number
    pub async fn list_with_centro(&self) -> DbResult<Vec<DbCuentaContableListing>> {
        let cuentas = sqlx::query_as::<_, DbCuentaContableListing>(
            r#"
            SELECT c.id, c.ccontable, c.desc_contable, c.partida, c.centro_costo_id,
                   c.fondo_cents, c.updated_at, cc.desc_cc AS centro_costo_nombre
            FROM cuenta_contables c
            JOIN centros_costos cc ON cc.id = c.centro_costo_id
            ORDER BY CAST(c.partida AS INTEGER), c.partida
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(cuentas)
    }

    pub async fn find_by_partida(&self, partida: &str) -> DbResult<Option<DbCuentaContable>> {
        let cuenta = sqlx::query_as::<_, DbCuentaContable>(
            &format!("SELECT {COLUMNS} FROM cuenta_contables WHERE partida = $1")
        )
        .bind(partida)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cuenta)
    }

    /// Current balance in cents, read on the caller's connection
    pub async fn fondo_cents_on(conn: &mut SqliteConnection, partida: &str) -> DbResult<Option<i64>> {
        let fondo = sqlx::query_scalar::<_, i64>(
            "SELECT fondo_cents FROM cuenta_contables WHERE partida = $1"
        )
        .bind(partida)
        .fetch_optional(conn)
        .await?;

        Ok(fondo)
    }

    /// Compare-and-decrement on the caller's connection.
    ///
    /// Returns the new balance when the fund covered `cents`, `None` when the
    /// partida is unknown or its fund is short. Nothing is written in the
    /// `None` case.
    pub async fn try_debit_on(
        conn: &mut SqliteConnection,
        partida: &str,
        cents: i64,
    ) -> DbResult<Option<i64>> {
        let remaining = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE cuenta_contables
            SET fondo_cents = fondo_cents - $2, updated_at = $3
            WHERE partida = $1 AND fondo_cents >= $2
            RETURNING fondo_cents
            "#
        )
        .bind(partida)
        .bind(cents)
        .bind(Utc::now())
        .fetch_optional(conn)
        .await?;

        Ok(remaining)
    }

    /// Assign the balance outright
    pub async fn set_fondo(&self, partida: &str, cents: i64) -> DbResult<Option<DbCuentaContable>> {
        let cuenta = sqlx::query_as::<_, DbCuentaContable>(
            &format!(
                "UPDATE cuenta_contables SET fondo_cents = $2, updated_at = $3 \
                 WHERE partida = $1 RETURNING {COLUMNS}"
            )
        )
        .bind(partida)
        .bind(cents)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(cuenta)
    }

    /// Add to the balance.
    ///
    /// Returns `None` when the partida is unknown or the new balance would
    /// exceed [`MAX_CENTS`]; the row is left untouched in both cases.
    pub async fn credit(&self, partida: &str, cents: i64) -> DbResult<Option<DbCuentaContable>> {
        let cuenta = sqlx::query_as::<_, DbCuentaContable>(
            &format!(
                "UPDATE cuenta_contables SET fondo_cents = fondo_cents + $2, updated_at = $3 \
                 WHERE partida = $1 AND fondo_cents <= $4 - $2 RETURNING {COLUMNS}"
            )
        )
        .bind(partida)
        .bind(cents)
        .bind(Utc::now())
        .bind(MAX_CENTS)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cuenta)
    }

    /// Subtract from the balance, stopping at zero
    pub async fn debit_clamped(&self, partida: &str, cents: i64) -> DbResult<Option<DbCuentaContable>> {
        let cuenta = sqlx::query_as::<_, DbCuentaContable>(
            &format!(
                "UPDATE cuenta_contables SET fondo_cents = MAX(fondo_cents - $2, 0), updated_at = $3 \
                 WHERE partida = $1 RETURNING {COLUMNS}"
            )
        )
        .bind(partida)
        .bind(cents)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(cuenta)
    }
}
