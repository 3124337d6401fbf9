//! Order intake against a migrated SQLite database.

use std::sync::Arc;

use compras_db::{Database, DatabaseConfig};
use compras_ledger::{
    BudgetLedger, LedgerError, OrderDraft, OrderIntake, Selection, Submission, SubmissionState,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Barrier;

fn draft(partida: &str, importe: &str) -> OrderDraft {
    OrderDraft {
        idx: None,
        oc: None,
        importe: Some(importe.into()),
        moneda: Some("SOLES".to_string()),
        categoria: Some(Selection::coded("SERVICIOS", "SERVICIOS")),
        proveedor: Some(Selection::coded("20100047218", "BANCO DE CREDITO DEL PERU")),
        solicitante: Some("JHONNIE ENRIQUEZ".to_string()),
        descripcion: Some("Pasajes Lima - Arequipa".to_string()),
        articulo: Some(Selection::coded("ART-0001", "PASAJE AEREO")),
        gerencia: Some(Selection::coded("ADMINISTRACION Y FINANZAS", "ADMINISTRACION Y FINANZAS")),
        centro_costo: Some(Selection::coded("100", "ADMINISTRACION GENERAL")),
        partida: Some(Selection::coded(partida, "PARTIDA")),
        presupuesto: Some(true),
    }
}

async fn setup() -> (Arc<Database>, BudgetLedger, OrderIntake) {
    let db = Arc::new(Database::in_memory().await.unwrap());
    (db.clone(), BudgetLedger::new(db.clone()), OrderIntake::new(db))
}

#[tokio::test]
async fn test_accepted_order_deducts_fund() {
    let (db, ledger, intake) = setup().await;
    ledger.set_fund("76", dec!(500)).await.unwrap();

    let submission = intake.submit(&draft("76", "300")).await.unwrap();
    assert!(submission.accepted());
    assert_eq!(submission.state(), SubmissionState::Persisted);
    assert_eq!(submission.reservation().remaining_fund, dec!(200));

    let order = submission.order().unwrap();
    assert_eq!(order.oc, 1);
    assert_eq!(order.partida, 76);
    assert_eq!(order.centro_costo, 100);
    assert_eq!(order.importe(), dec!(300));
    assert_eq!(order.proveedor.as_deref(), Some("20100047218"));
    assert!(order.presupuesto);

    assert_eq!(ledger.fund("76").await.unwrap(), dec!(200));
    assert_eq!(db.orden_compra_repo().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_insufficient_fund_rejects_without_writing() {
    let (db, ledger, intake) = setup().await;
    ledger.set_fund("76", dec!(500)).await.unwrap();

    intake.submit(&draft("76", "300")).await.unwrap();
    let submission = intake.submit(&draft("76", "300")).await.unwrap();

    match submission {
        Submission::Rejected { reservation } => {
            assert!(!reservation.sufficient);
            assert_eq!(reservation.remaining_fund, dec!(-100));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert_eq!(ledger.fund("76").await.unwrap(), dec!(200));
    assert_eq!(db.orden_compra_repo().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_unknown_partida_is_rejected() {
    let (db, ledger, intake) = setup().await;
    ledger.set_fund("76", dec!(500)).await.unwrap();

    let submission = intake.submit(&draft("999", "10")).await.unwrap();
    assert!(!submission.accepted());
    assert_eq!(submission.reservation().remaining_fund, Decimal::ZERO);

    assert_eq!(db.orden_compra_repo().count().await.unwrap(), 0);
    assert_eq!(ledger.fund("76").await.unwrap(), dec!(500));
}

#[tokio::test]
async fn test_invalid_draft_has_no_side_effects() {
    let (db, ledger, intake) = setup().await;
    ledger.set_fund("76", dec!(500)).await.unwrap();

    let incomplete = OrderDraft {
        solicitante: None,
        descripcion: Some(String::new()),
        moneda: None,
        ..draft("76", "100")
    };

    let err = intake.submit(&incomplete).await.unwrap_err();
    match err {
        LedgerError::Validation(errors) => {
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["descripcion", "moneda", "solicitante"]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    assert_eq!(ledger.fund("76").await.unwrap(), dec!(500));
    assert_eq!(db.orden_compra_repo().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_idx_rolls_back_reservation() {
    let (db, ledger, intake) = setup().await;
    ledger.set_fund("78", dec!(1000)).await.unwrap();

    let first = OrderDraft { idx: Some(17), ..draft("78", "300") };
    intake.submit(&first).await.unwrap();
    assert_eq!(ledger.fund("78").await.unwrap(), dec!(700));

    let err = intake.submit(&first).await.unwrap_err();
    match err {
        LedgerError::Validation(errors) => assert!(errors.contains("idx")),
        other => panic!("expected validation error, got {:?}", other),
    }

    assert_eq!(ledger.fund("78").await.unwrap(), dec!(700));
    assert_eq!(db.orden_compra_repo().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_supplied_order_number_is_kept() {
    let (_db, ledger, intake) = setup().await;
    ledger.set_fund("119", dec!(1000)).await.unwrap();

    let explicit = OrderDraft { oc: Some(4500), ..draft("119", "100") };
    let submission = intake.submit(&explicit).await.unwrap();
    assert_eq!(submission.order().unwrap().oc, 4500);

    let next = intake.submit(&draft("119", "100")).await.unwrap();
    assert_eq!(next.order().unwrap().oc, 4501);
}

#[tokio::test]
async fn test_legacy_and_structured_drafts_store_same_codes() {
    let (_db, ledger, intake) = setup().await;
    ledger.set_fund("120", dec!(5000)).await.unwrap();

    let legacy = OrderDraft {
        gerencia: Some(Selection::display("01 ADMINISTRACION Y FINANZAS")),
        centro_costo: Some(Selection::display("100 - ADMINISTRACION GENERAL")),
        partida: Some(Selection::display("120 - PASAJES AEREOS NACIONALES")),
        presupuesto: Some(false),
        ..draft("120", "1,250.75")
    };

    let structured = intake.submit(&draft("120", "1250.75")).await.unwrap();
    let legacy = intake.submit(&legacy).await.unwrap();

    let (a, b) = (structured.order().unwrap(), legacy.order().unwrap());
    assert_eq!(a.gerencia, b.gerencia);
    assert_eq!(a.centro_costo, b.centro_costo);
    assert_eq!(a.partida, b.partida);
    assert_eq!(a.importe_cents, b.importe_cents);
    // The client's presupuesto flag does not reach the store
    assert!(b.presupuesto);

    assert_eq!(ledger.fund("120").await.unwrap(), dec!(2498.50));
}

#[tokio::test]
async fn test_orders_listed_newest_first() {
    let (_db, ledger, intake) = setup().await;
    ledger.set_fund("76", dec!(1000)).await.unwrap();

    intake.submit(&draft("76", "100")).await.unwrap();
    intake.submit(&draft("76", "200")).await.unwrap();

    let orders = intake.list_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].orden.oc, 2);
    assert_eq!(orders[0].centro_costo_nombre.as_deref(), Some("ADMINISTRACION GENERAL"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_accept_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}", dir.path().join("compras.db").display()),
        max_connections: 4,
        min_connections: 1,
        acquire_timeout_secs: 10,
        busy_timeout_secs: 10,
    };
    let db = Arc::new(Database::connect(&config).await.unwrap());
    db.migrate().await.unwrap();

    let ledger = BudgetLedger::new(db.clone());
    let intake = OrderIntake::new(db.clone());
    ledger.set_fund("76", dec!(500)).await.unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let intake = intake.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                intake.submit(&draft("76", "300")).await
            })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    let accepted = results
        .into_iter()
        .map(|r| r.unwrap().unwrap())
        .filter(Submission::accepted)
        .count();

    assert_eq!(accepted, 1);
    assert_eq!(ledger.fund("76").await.unwrap(), dec!(200));
    assert_eq!(db.orden_compra_repo().count().await.unwrap(), 1);
}
