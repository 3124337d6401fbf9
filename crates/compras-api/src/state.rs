//! Application state shared across handlers

use std::sync::Arc;

use compras_db::Database;
use compras_ledger::{BudgetLedger, OrderIntake, ReferenceData};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connections
    pub db: Arc<Database>,
    /// Fund balances
    pub ledger: BudgetLedger,
    /// Order validation and persistence
    pub intake: OrderIntake,
    /// Reference tables for the order form
    pub reference: ReferenceData,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            ledger: BudgetLedger::new(db.clone()),
            intake: OrderIntake::new(db.clone()),
            reference: ReferenceData::new(db.clone()),
            db,
        }
    }

    /// State over a fresh, migrated in-memory database
    pub async fn in_memory() -> compras_db::DbResult<Self> {
        Ok(Self::new(Arc::new(Database::in_memory().await?)))
    }
}
