//! Compras Ledger - partida budgets and purchase-order intake
//!
//! - [`BudgetLedger`] owns every fund balance and performs the atomic
//!   compare-and-decrement behind each order
//! - [`OrderIntake`] validates an [`OrderDraft`] and stores it in the same
//!   transaction as its reservation
//! - [`ReferenceData`] shapes the reference tables for the order form
//!
//! # Invariants
//!
//! 1. A fund is never negative
//! 2. An order row exists only if its amount was deducted from its partida
//! 3. Orders are append-only

pub mod catalog;
pub mod draft;
pub mod error;
pub mod intake;
pub mod ledger;

pub use catalog::{CategoriaOption, CentroCostoNode, CuentaFund, CuentaNode, GerenciaNode, ReferenceData};
pub use draft::{AmountInput, CodeLabel, Moneda, OrderDraft, Selection, UnknownMoneda, ValidatedOrder};
pub use error::{FieldErrors, LedgerError, Result};
pub use intake::{OrderIntake, OrderListing, Submission, SubmissionState};
pub use ledger::{BudgetLedger, FundDirection, FundStatus, Reservation};
