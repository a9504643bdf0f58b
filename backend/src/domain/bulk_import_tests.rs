//! Bulk import behaviour against mocked ports.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::domain::CommerceEntity;
use crate::domain::ports::{MockCommerceSource, MockRecordReconciler, StoreError};
use crate::domain::test_fixtures::{raw_booking, raw_order};

fn accepting_reconciler(seen: Arc<Mutex<Vec<i64>>>) -> MockRecordReconciler {
    let mut reconciler = MockRecordReconciler::new();
    reconciler.expect_upsert().returning(move |record| {
        seen.lock().expect("seen lock").push(record.external_id());
        Ok(record.receipt(Uuid::nil()))
    });
    reconciler
}

fn service(source: MockCommerceSource, reconciler: MockRecordReconciler) -> BulkImportService {
    BulkImportService::new(Arc::new(source), Arc::new(reconciler))
}

fn orders(ids: impl IntoIterator<Item = i64>) -> Vec<Value> {
    ids.into_iter().map(|id| raw_order(id, "processing")).collect()
}

#[rstest]
#[tokio::test]
async fn one_unmappable_record_does_not_abort_the_batch() {
    let mut page = orders(1..=10);
    page[4] = json!({"status": "processing", "total": "5.00"});
    let mut source = MockCommerceSource::new();
    source
        .expect_fetch_page()
        .with(eq(CommerceEntity::Order), eq(1), eq(50))
        .times(1)
        .return_once(move |_, _, _| Ok(page));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let summary = service(source, accepting_reconciler(Arc::clone(&seen)))
        .import(BulkImportRequest::all(CommerceEntity::Order))
        .await
        .expect("import completes");

    assert_eq!(summary.total, 10);
    assert_eq!(summary.upserted, 9);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].id, None);
    assert_eq!(summary.failures[0].error, "missing id");
    assert_eq!(seen.lock().expect("seen lock").len(), 9);
}

#[rstest]
#[tokio::test]
async fn full_page_then_empty_page_stops_after_page_two() {
    let mut source = MockCommerceSource::new();
    source
        .expect_fetch_page()
        .with(eq(CommerceEntity::Order), eq(1), eq(50))
        .times(1)
        .return_once(|_, _, _| Ok(orders(1..=50)));
    source
        .expect_fetch_page()
        .with(eq(CommerceEntity::Order), eq(2), eq(50))
        .times(1)
        .return_once(|_, _, _| Ok(Vec::new()));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let request = BulkImportRequest {
        per_page: Some(50),
        ..BulkImportRequest::all(CommerceEntity::Order)
    };
    let summary = service(source, accepting_reconciler(Arc::clone(&seen)))
        .import(request)
        .await
        .expect("import completes");

    assert_eq!(summary.total, 50);
    assert_eq!(summary.upserted, 50);
    assert_eq!(summary.pages, 2);
    let seen = seen.lock().expect("seen lock");
    assert_eq!(*seen, (1..=50).collect::<Vec<_>>());
}

#[rstest]
#[tokio::test]
async fn short_page_ends_pagination() {
    let mut source = MockCommerceSource::new();
    source
        .expect_fetch_page()
        .times(1)
        .return_once(|_, _, _| Ok(orders(1..=3)));

    let request = BulkImportRequest {
        per_page: Some(10),
        ..BulkImportRequest::all(CommerceEntity::Order)
    };
    let summary = service(source, accepting_reconciler(Arc::default()))
        .import(request)
        .await
        .expect("import completes");

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.upserted, 3);
}

#[rstest]
#[tokio::test]
async fn page_ceiling_bounds_the_run() {
    let mut source = MockCommerceSource::new();
    source
        .expect_fetch_page()
        .times(2)
        .returning(|_, page, _| Ok(orders((1..=2).map(|n| i64::from(page) * 10 + n))));

    let request = BulkImportRequest {
        per_page: Some(2),
        max_pages: Some(2),
        ..BulkImportRequest::all(CommerceEntity::Order)
    };
    let summary = service(source, accepting_reconciler(Arc::default()))
        .import(request)
        .await
        .expect("import completes");

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.total, 4);
}

#[rstest]
#[case(Some(0), 1)]
#[case(Some(500), 100)]
#[case(None, 50)]
#[tokio::test]
async fn page_size_is_clamped(#[case] requested: Option<u32>, #[case] expected: u32) {
    let mut source = MockCommerceSource::new();
    source
        .expect_fetch_page()
        .with(eq(CommerceEntity::Booking), eq(1), eq(expected))
        .times(1)
        .return_once(|_, _, _| Ok(Vec::new()));

    let request = BulkImportRequest {
        per_page: requested,
        ..BulkImportRequest::all(CommerceEntity::Booking)
    };
    service(source, MockRecordReconciler::new())
        .import(request)
        .await
        .expect("import completes");
}

#[rstest]
#[tokio::test]
async fn page_fetch_error_aborts_the_import() {
    let mut source = MockCommerceSource::new();
    source
        .expect_fetch_page()
        .with(eq(CommerceEntity::Order), eq(1), eq(2))
        .return_once(|_, _, _| Ok(orders([1, 2])));
    source
        .expect_fetch_page()
        .with(eq(CommerceEntity::Order), eq(2), eq(2))
        .return_once(|_, _, _| Err(CommerceSourceError::timeout("after 30s")));

    let request = BulkImportRequest {
        per_page: Some(2),
        ..BulkImportRequest::all(CommerceEntity::Order)
    };
    let err = service(source, accepting_reconciler(Arc::default()))
        .import(request)
        .await
        .expect_err("fetch error aborts");

    assert_eq!(
        err,
        BulkImportError::source("commerce platform timeout: after 30s")
    );
}

#[rstest]
#[tokio::test]
async fn store_errors_are_recorded_per_record() {
    let mut source = MockCommerceSource::new();
    source
        .expect_fetch_page()
        .return_once(|_, _, _| Ok(orders([7, 8])));
    let mut reconciler = MockRecordReconciler::new();
    reconciler.expect_upsert().returning(|record| {
        if record.external_id() == 8 {
            Err(StoreError::query("deadlock detected"))
        } else {
            Ok(record.receipt(Uuid::nil()))
        }
    });

    let summary = service(source, reconciler)
        .import(BulkImportRequest::all(CommerceEntity::Order))
        .await
        .expect("import completes");

    assert_eq!(summary.upserted, 1);
    assert_eq!(
        summary.failures,
        vec![ImportFailure {
            id: Some(8),
            error: "record store query failed: deadlock detected".to_owned(),
        }]
    );
}

#[rstest]
#[tokio::test]
async fn filters_skip_without_failing() {
    let page = vec![
        raw_booking(1, "confirmed"),
        raw_booking(2, "Cancelled"),
        raw_booking(3, "paid"),
        json!({"id": 4, "status": "confirmed", "date_modified": "2020-01-01T00:00:00Z"}),
        json!({"id": 5, "status": "CONFIRMED"}),
    ];
    let mut source = MockCommerceSource::new();
    source.expect_fetch_page().return_once(move |_, _, _| Ok(page));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let request = BulkImportRequest {
        statuses: vec!["confirmed".to_owned(), " cancelled ".to_owned()],
        since: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single(),
        ..BulkImportRequest::all(CommerceEntity::Booking)
    };
    let summary = service(source, accepting_reconciler(Arc::clone(&seen)))
        .import(request)
        .await
        .expect("import completes");

    assert_eq!(summary.total, 5);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.upserted, 3);
    assert!(summary.failures.is_empty());
    assert_eq!(*seen.lock().expect("seen lock"), vec![1, 2, 5]);
}

#[rstest]
#[case(&["processing"][..], &["processing"][..])]
#[case(&["processing, completed"][..], &["processing", "completed"][..])]
#[case(&["on-hold", " ,", "cancelled"][..], &["on-hold", "cancelled"][..])]
fn splits_comma_separated_statuses(#[case] raw: &[&str], #[case] expected: &[&str]) {
    assert_eq!(split_statuses(raw.iter().copied()), expected);
}
