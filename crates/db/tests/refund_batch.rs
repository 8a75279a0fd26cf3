//! Integration tests for refund batch processing.
//!
//! Covers both batch actions against a real database:
//! - Idempotent skips and per-item errors for `mark_refunded`
//! - One credit per child with the exact summed amount for
//!   `generate_payment`
//! - The settlement invariant holding across batch mutations

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;

use mensa_core::settlement::build_settlements;
use mensa_db::models::cancellation::{CancellationFilter, CreateCancellation, MealCancellation};
use mensa_db::models::child::{Child, CreateChild};
use mensa_db::models::payment::REFUND_REASON;
use mensa_db::repositories::{CancellationRepo, ChildRepo, GroupRepo, RefundBatchRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

async fn seed_child(pool: &PgPool, group_name: &str, first: &str, last: &str) -> Child {
    let group = GroupRepo::create(pool, group_name).await.unwrap();
    ChildRepo::create(
        pool,
        &CreateChild {
            group_id: group.id,
            first_name: first.to_string(),
            last_name: last.to_string(),
        },
    )
    .await
    .unwrap()
}

async fn seed_cancellation(
    pool: &PgPool,
    child_id: i64,
    day: u32,
    price: Decimal,
) -> MealCancellation {
    CancellationRepo::create(
        pool,
        &CreateCancellation {
            child_id,
            date: date(day),
            meal_type: "lunch".to_string(),
            meal_price: price,
        },
    )
    .await
    .unwrap()
}

/// For every child in the ledger, unrefunded + refunded must equal the sum
/// of all snapshot prices.
async fn assert_settlement_invariant(pool: &PgPool) {
    let rows = CancellationRepo::list_filtered(pool, &CancellationFilter::default())
        .await
        .unwrap();
    let report = build_settlements(rows.into_iter().map(Into::into).collect());
    for child in &report.per_child {
        let price_sum: Decimal = child.cancellations.iter().map(|c| c.meal_price).sum();
        assert_eq!(
            child.total_unrefunded + child.total_refunded,
            price_sum,
            "settlement totals drifted for child {}",
            child.child_id
        );
    }
}

// ---------------------------------------------------------------------------
// Test: mark_refunded
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_refunded_flips_rows(pool: PgPool) {
    let child = seed_child(&pool, "Sunflowers", "Paula", "Ahrens").await;
    let a = seed_cancellation(&pool, child.id, 10, dec!(4.20)).await;
    let b = seed_cancellation(&pool, child.id, 11, dec!(4.20)).await;

    let outcome = RefundBatchRepo::mark_refunded(&pool, &[a.id, b.id])
        .await
        .unwrap();
    assert_eq!(outcome.succeeded, vec![a.id, b.id]);
    assert!(outcome.skipped.is_empty());
    assert!(outcome.errors.is_empty());

    let row = CancellationRepo::find_by_id(&pool, a.id).await.unwrap().unwrap();
    assert!(row.refunded);
    assert_settlement_invariant(&pool).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_refunded_is_idempotent(pool: PgPool) {
    let child = seed_child(&pool, "Sunflowers", "Paula", "Ahrens").await;
    let a = seed_cancellation(&pool, child.id, 10, dec!(4.20)).await;

    RefundBatchRepo::mark_refunded(&pool, &[a.id]).await.unwrap();
    let second = RefundBatchRepo::mark_refunded(&pool, &[a.id]).await.unwrap();

    // Already refunded lands in skipped, not errors.
    assert!(second.succeeded.is_empty());
    assert_eq!(second.skipped, vec![a.id]);
    assert!(second.errors.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mixed_batch_produces_per_item_outcomes(pool: PgPool) {
    let child = seed_child(&pool, "Sunflowers", "Paula", "Ahrens").await;
    let valid = seed_cancellation(&pool, child.id, 10, dec!(4.20)).await;
    let refunded = seed_cancellation(&pool, child.id, 11, dec!(4.20)).await;
    RefundBatchRepo::mark_refunded(&pool, &[refunded.id])
        .await
        .unwrap();

    let outcome = RefundBatchRepo::mark_refunded(&pool, &[valid.id, refunded.id, 4711])
        .await
        .unwrap();

    assert_eq!(outcome.succeeded, vec![valid.id]);
    assert_eq!(outcome.skipped, vec![refunded.id]);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].id, 4711);

    let row = CancellationRepo::find_by_id(&pool, valid.id).await.unwrap().unwrap();
    assert!(row.refunded, "the valid id must still be processed");
}

// ---------------------------------------------------------------------------
// Test: generate_payment
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_generate_payment_credits_the_summed_amount(pool: PgPool) {
    let child = seed_child(&pool, "Sunflowers", "Paula", "Ahrens").await;
    let a = seed_cancellation(&pool, child.id, 10, dec!(5.00)).await;
    let b = seed_cancellation(&pool, child.id, 11, dec!(5.00)).await;
    let c = seed_cancellation(&pool, child.id, 12, dec!(12.00)).await;

    let (payments, outcome) = RefundBatchRepo::generate_payments(&pool, &[a.id, b.id, c.id])
        .await
        .unwrap();

    assert_eq!(payments.len(), 1, "exactly one credit per child");
    assert_eq!(payments[0].child_id, child.id);
    assert_eq!(payments[0].amount, dec!(22.00));
    assert_eq!(payments[0].reason, REFUND_REASON);
    assert_eq!(outcome.succeeded.len(), 3);

    // The settlement view flips from outstanding to refunded.
    let rows = CancellationRepo::list_filtered(
        &pool,
        &CancellationFilter {
            child_id: Some(child.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let report = build_settlements(rows.into_iter().map(Into::into).collect());
    assert_eq!(report.per_child[0].total_unrefunded, Decimal::ZERO);
    assert_eq!(report.per_child[0].total_refunded, dec!(22.00));
    assert_settlement_invariant(&pool).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_generate_payment_one_credit_per_child(pool: PgPool) {
    let paula = seed_child(&pool, "Sunflowers", "Paula", "Ahrens").await;
    let jonas = ChildRepo::create(
        &pool,
        &CreateChild {
            group_id: paula.group_id,
            first_name: "Jonas".to_string(),
            last_name: "Bode".to_string(),
        },
    )
    .await
    .unwrap();

    let a = seed_cancellation(&pool, paula.id, 10, dec!(4.20)).await;
    let b = seed_cancellation(&pool, paula.id, 11, dec!(4.20)).await;
    let c = seed_cancellation(&pool, jonas.id, 10, dec!(3.80)).await;

    let (mut payments, outcome) =
        RefundBatchRepo::generate_payments(&pool, &[a.id, b.id, c.id])
            .await
            .unwrap();

    payments.sort_by_key(|p| p.child_id);
    let mut expected = vec![(paula.id, dec!(8.40)), (jonas.id, dec!(3.80))];
    expected.sort_by_key(|(id, _)| *id);

    assert_eq!(payments.len(), 2);
    assert_eq!(
        payments.iter().map(|p| (p.child_id, p.amount)).collect::<Vec<_>>(),
        expected
    );
    assert_eq!(outcome.succeeded.len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_generate_payment_skips_already_refunded(pool: PgPool) {
    let child = seed_child(&pool, "Sunflowers", "Paula", "Ahrens").await;
    let open = seed_cancellation(&pool, child.id, 10, dec!(4.20)).await;
    let refunded = seed_cancellation(&pool, child.id, 11, dec!(4.20)).await;
    RefundBatchRepo::mark_refunded(&pool, &[refunded.id])
        .await
        .unwrap();

    let (payments, outcome) =
        RefundBatchRepo::generate_payments(&pool, &[open.id, refunded.id, 4711])
            .await
            .unwrap();

    // The credit covers only the open row; the rest is reported per item.
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount, dec!(4.20));
    assert_eq!(outcome.succeeded, vec![open.id]);
    assert_eq!(outcome.skipped, vec![refunded.id]);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].id, 4711);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_generate_payment_with_nothing_refundable_creates_no_credit(pool: PgPool) {
    let child = seed_child(&pool, "Sunflowers", "Paula", "Ahrens").await;
    let refunded = seed_cancellation(&pool, child.id, 10, dec!(4.20)).await;
    RefundBatchRepo::mark_refunded(&pool, &[refunded.id])
        .await
        .unwrap();

    let (payments, outcome) = RefundBatchRepo::generate_payments(&pool, &[refunded.id])
        .await
        .unwrap();

    assert!(payments.is_empty());
    assert_eq!(outcome.skipped, vec![refunded.id]);
}
