//! Business counters
//!
//! Recorded through the `metrics` facade; they are only exported when the
//! server installs a recorder.

/// Order submissions by outcome: `accepted`, `rejected`, `invalid`, `error`
pub fn record_submission(outcome: &'static str) {
    metrics::counter!("compras_orders_submitted_total", "outcome" => outcome).increment(1);
}

/// Fund changes by kind: `set`, `agregar`, `quitar`
pub fn record_fund_change(kind: &'static str) {
    metrics::counter!("compras_fund_changes_total", "kind" => kind).increment(1);
}
