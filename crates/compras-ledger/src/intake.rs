//! Purchase order intake
//!
//! A submission moves through
//! `Drafted -> Validated -> BudgetChecked -> Persisted | Rejected`.
//! The budget check and the insert share one transaction: a rejected or
//! failed submission leaves neither an order row nor a fund change behind.

use std::fmt;
use std::sync::Arc;

use compras_db::{Database, DbError, DbOrdenCompra, DbOrdenCompraListing, OrdenCompraRepo};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::draft::OrderDraft;
use crate::error::{FieldErrors, LedgerError, Result};
use crate::ledger::{BudgetLedger, Reservation};

/// Order with its centro de costo description
pub type OrderListing = DbOrdenCompraListing;

/// Where a submission stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionState {
    Drafted,
    Validated,
    BudgetChecked,
    Persisted,
    Rejected,
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionState::Drafted => "drafted",
            SubmissionState::Validated => "validated",
            SubmissionState::BudgetChecked => "budget_checked",
            SubmissionState::Persisted => "persisted",
            SubmissionState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Final outcome of a valid submission
#[derive(Debug, Clone)]
pub enum Submission {
    /// Budget covered the order; the row is stored and the fund deducted
    Persisted {
        order: DbOrdenCompra,
        reservation: Reservation,
    },
    /// Fund short or partida unknown; nothing was written
    Rejected { reservation: Reservation },
}

impl Submission {
    pub fn accepted(&self) -> bool {
        matches!(self, Submission::Persisted { .. })
    }

    pub fn order(&self) -> Option<&DbOrdenCompra> {
        match self {
            Submission::Persisted { order, .. } => Some(order),
            Submission::Rejected { .. } => None,
        }
    }

    pub fn reservation(&self) -> &Reservation {
        match self {
            Submission::Persisted { reservation, .. } | Submission::Rejected { reservation } => reservation,
        }
    }

    pub fn state(&self) -> SubmissionState {
        match self {
            Submission::Persisted { .. } => SubmissionState::Persisted,
            Submission::Rejected { .. } => SubmissionState::Rejected,
        }
    }
}

/// Validates drafts and persists accepted orders
#[derive(Clone)]
pub struct OrderIntake {
    db: Arc<Database>,
}

impl OrderIntake {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn submit(&self, draft: &OrderDraft) -> Result<Submission> {
        debug!(state = %SubmissionState::Drafted, "Order submitted");

        let order = draft.validate().map_err(|errors| {
            debug!(%errors, "Order draft rejected by validation");
            LedgerError::Validation(errors)
        })?;
        let partida = order.partida_code();
        debug!(state = %SubmissionState::Validated, partida = %partida, importe = %order.importe);

        let mut tx = self.db.begin().await?;

        let reservation = BudgetLedger::reserve_in(&mut *tx, &partida, order.importe).await?;
        debug!(state = %SubmissionState::BudgetChecked, partida = %partida, sufficient = reservation.sufficient);

        if !reservation.sufficient {
            tx.rollback().await?;
            warn!(
                state = %SubmissionState::Rejected,
                partida = %partida,
                importe = %order.importe,
                remaining = %reservation.remaining_fund,
                "Order rejected: insufficient fund"
            );
            return Ok(Submission::Rejected { reservation });
        }

        // An error here drops `tx`, which rolls the reservation back
        let stored = OrdenCompraRepo::insert_on(&mut *tx, &order.to_new_row())
            .await
            .map_err(insert_error)?;
        tx.commit().await?;

        info!(
            state = %SubmissionState::Persisted,
            id = stored.id,
            oc = stored.oc,
            partida = %partida,
            importe = %order.importe,
            remaining = %reservation.remaining_fund,
            "Order persisted"
        );

        Ok(Submission::Persisted { order: stored, reservation })
    }

    /// All orders, newest first
    pub async fn list_orders(&self) -> Result<Vec<OrderListing>> {
        Ok(self.db.orden_compra_repo().list_with_centro().await?)
    }
}

fn insert_error(err: DbError) -> LedgerError {
    match err.duplicate_column() {
        Some(column) => {
            warn!(column, "Order rejected: duplicate identifier");
            LedgerError::Validation(FieldErrors::single(column, format!("{} already exists", column)))
        }
        None => {
            error!(error = %err, "Order insert failed");
            LedgerError::Persistence(err)
        }
    }
}
