//! Partida fund balances

use std::sync::Arc;

use compras_db::money::{from_cents, to_cents, MAX_CENTS};
use compras_db::{CuentaContableRepo, Database, DbCuentaContable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::error::{LedgerError, Result};

/// Outcome of a sufficiency check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub sufficient: bool,
    /// Fund left after the amount. Negative when the fund fell short; such
    /// values are reported but never stored.
    pub remaining_fund: Decimal,
}

impl Reservation {
    fn unknown_partida() -> Self {
        Self { sufficient: false, remaining_fund: Decimal::ZERO }
    }
}

/// Direction of a fund adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundDirection {
    Increase,
    Decrease,
}

/// Budget state of a partida, as shown next to each cuenta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundStatus {
    SinPresupuesto,
    AlLimite,
    ConPresupuesto,
}

impl FundStatus {
    /// Funds at or below this are flagged as close to exhausted
    pub const LIMIT: Decimal = Decimal::ONE_HUNDRED;

    pub fn classify(fondo: Decimal) -> Self {
        if fondo <= Decimal::ZERO {
            FundStatus::SinPresupuesto
        } else if fondo <= Self::LIMIT {
            FundStatus::AlLimite
        } else {
            FundStatus::ConPresupuesto
        }
    }
}

/// Owner of every fund mutation.
///
/// All changes are single conditional statements in the store, so concurrent
/// callers never observe or produce a negative fund.
#[derive(Clone)]
pub struct BudgetLedger {
    db: Arc<Database>,
}

impl BudgetLedger {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Check that the partida's fund covers `amount` and, if it does,
    /// deduct it immediately.
    pub async fn verify_and_reserve(&self, partida: &str, amount: Decimal) -> Result<Reservation> {
        let mut conn = self.db.pool.acquire().await?;
        Self::reserve_in(&mut *conn, partida, amount).await
    }

    /// [`verify_and_reserve`](Self::verify_and_reserve) on the caller's
    /// connection, typically an open transaction.
    pub async fn reserve_in(
        conn: &mut SqliteConnection,
        partida: &str,
        amount: Decimal,
    ) -> Result<Reservation> {
        let cents = non_negative_cents(amount, "amount")?;

        if let Some(remaining) = CuentaContableRepo::try_debit_on(&mut *conn, partida, cents).await? {
            info!(partida, %amount, remaining = %from_cents(remaining), "Fund reserved");
            return Ok(Reservation { sufficient: true, remaining_fund: from_cents(remaining) });
        }

        // The conditional update matched nothing: either short or unknown
        match CuentaContableRepo::fondo_cents_on(&mut *conn, partida).await? {
            Some(fondo) => {
                debug!(partida, %amount, fondo = %from_cents(fondo), "Fund insufficient");
                Ok(Reservation {
                    sufficient: false,
                    remaining_fund: from_cents(fondo) - amount,
                })
            }
            None => {
                debug!(partida, "Reservation against unknown partida");
                Ok(Reservation::unknown_partida())
            }
        }
    }

    /// Add to or take from a fund. Decreases stop at zero.
    pub async fn adjust_fund(
        &self,
        partida: &str,
        delta: Decimal,
        direction: FundDirection,
    ) -> Result<Decimal> {
        let cents = non_negative_cents(delta, "delta")?;
        let repo = self.db.cuenta_contable_repo();

        let cuenta = match direction {
            FundDirection::Increase => match repo.credit(partida, cents).await? {
                Some(cuenta) => cuenta,
                None => {
                    // Known partida means the sum left decimal(12,2)
                    let current = found(repo.find_by_partida(partida).await?, partida)?;
                    return Err(LedgerError::InvalidArgument(format!(
                        "fondo {} + {} exceeds {}",
                        current.fondo(),
                        delta,
                        from_cents(MAX_CENTS)
                    )));
                }
            },
            FundDirection::Decrease => found(repo.debit_clamped(partida, cents).await?, partida)?,
        };

        info!(partida, %delta, ?direction, fondo = %cuenta.fondo(), "Fund adjusted");
        Ok(cuenta.fondo())
    }

    /// Assign a fund outright
    pub async fn set_fund(&self, partida: &str, amount: Decimal) -> Result<Decimal> {
        let cents = non_negative_cents(amount, "fondo")?;
        let cuenta = found(self.db.cuenta_contable_repo().set_fondo(partida, cents).await?, partida)?;

        info!(partida, fondo = %cuenta.fondo(), "Fund assigned");
        Ok(cuenta.fondo())
    }

    /// Current fund of a partida
    pub async fn fund(&self, partida: &str) -> Result<Decimal> {
        let cuenta = found(self.db.cuenta_contable_repo().find_by_partida(partida).await?, partida)?;
        Ok(cuenta.fondo())
    }
}

fn non_negative_cents(amount: Decimal, name: &str) -> Result<i64> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::InvalidArgument(format!("{} must not be negative", name)));
    }
    to_cents(amount).map_err(|e| LedgerError::InvalidArgument(format!("{}: {}", name, e)))
}

fn found(cuenta: Option<DbCuentaContable>, partida: &str) -> Result<DbCuentaContable> {
    cuenta.ok_or_else(|| LedgerError::PartidaNotFound { partida: partida.to_string() })
}
