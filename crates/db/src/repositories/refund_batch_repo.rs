//! Batch refund processing over the cancellation ledger.
//!
//! Both actions are best-effort bulk operations: every requested id ends up
//! in exactly one outcome bucket and one bad id never aborts the rest. For
//! `generate_payment` the credit insert and the refund flips of one child
//! commit in a single transaction, so the credited amount always equals the
//! sum of the rows actually flipped; a failure for one child rolls back
//! only that child's group.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use mensa_core::batch::{partition_refundable, BatchOutcome, ChildRefundGroup, RefundableRow};
use mensa_core::types::DbId;

use crate::models::cancellation::MealCancellation;
use crate::models::payment::{PaymentRecord, REFUND_REASON};
use crate::repositories::CancellationRepo;

/// Column list for payment rows returned from credit inserts.
const PAYMENT_COLUMNS: &str = "id, child_id, amount, reason, created_at";

/// Per-item reason for ids that do not exist in the ledger.
const REASON_NOT_FOUND: &str = "cancellation not found";

/// Per-item reason when a child's payment transaction failed.
const REASON_PAYMENT_FAILED: &str = "payment generation failed";

/// Processes staff refund batches against the cancellation ledger.
pub struct RefundBatchRepo;

impl RefundBatchRepo {
    /// Mark the given cancellations as refunded.
    ///
    /// Missing ids produce per-item errors; already-refunded ids are
    /// idempotent skips. The refund check is part of each UPDATE, so a row
    /// refunded by a concurrent batch between fetch and update degrades to
    /// a skip instead of a double transition.
    pub async fn mark_refunded(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<BatchOutcome, sqlx::Error> {
        let rows = CancellationRepo::find_many(pool, ids).await?;
        let partition = partition_refundable(ids, &to_refundable(&rows));

        let mut outcome = BatchOutcome::default();
        for id in partition.missing {
            outcome.fail(id, REASON_NOT_FOUND);
        }
        for id in partition.skipped {
            outcome.skip(id);
        }

        for group in partition.groups {
            for id in group.cancellation_ids {
                let result = sqlx::query(
                    "UPDATE meal_cancellations SET refunded = true \
                     WHERE id = $1 AND refunded = false",
                )
                .bind(id)
                .execute(pool)
                .await?;

                if result.rows_affected() > 0 {
                    outcome.succeed(id);
                } else {
                    outcome.skip(id);
                }
            }
        }

        Ok(outcome)
    }

    /// Refund the given cancellations and emit one payment credit per child.
    ///
    /// Returns the created payment records alongside the per-item outcome.
    pub async fn generate_payments(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<(Vec<PaymentRecord>, BatchOutcome), sqlx::Error> {
        let rows = CancellationRepo::find_many(pool, ids).await?;
        let partition = partition_refundable(ids, &to_refundable(&rows));

        let mut outcome = BatchOutcome::default();
        for id in partition.missing {
            outcome.fail(id, REASON_NOT_FOUND);
        }
        for id in partition.skipped {
            outcome.skip(id);
        }

        let mut payments = Vec::new();
        for group in partition.groups {
            match Self::pay_child_group(pool, &group).await {
                Ok((payment, group_outcome)) => {
                    payments.extend(payment);
                    outcome.merge(group_outcome);
                }
                Err(err) => {
                    // One child's failure must not stop the other groups.
                    tracing::error!(
                        child_id = group.child_id,
                        error = %err,
                        "Refund payment transaction failed"
                    );
                    for id in group.cancellation_ids {
                        outcome.fail(id, REASON_PAYMENT_FAILED);
                    }
                }
            }
        }

        Ok((payments, outcome))
    }

    /// Process one child's group: flip the refund flags and insert the
    /// matching credit in a single transaction.
    ///
    /// Rows are re-checked under `FOR UPDATE`; anything that was deleted or
    /// refunded since the initial fetch drops out of the credit and is
    /// reported per-item instead.
    async fn pay_child_group(
        pool: &PgPool,
        group: &ChildRefundGroup,
    ) -> Result<(Option<PaymentRecord>, BatchOutcome), sqlx::Error> {
        let mut outcome = BatchOutcome::default();
        let mut tx: Transaction<'_, Postgres> = pool.begin().await?;

        let locked: Vec<MealCancellation> = sqlx::query_as(
            "SELECT id, child_id, date, meal_type, meal_price, refunded, created_at \
             FROM meal_cancellations WHERE id = ANY($1) FOR UPDATE",
        )
        .bind(&group.cancellation_ids)
        .fetch_all(&mut *tx)
        .await?;

        let mut refundable_ids: Vec<DbId> = Vec::new();
        let mut amount = Decimal::ZERO;
        for id in &group.cancellation_ids {
            match locked.iter().find(|row| row.id == *id) {
                None => outcome.fail(*id, REASON_NOT_FOUND),
                Some(row) if row.refunded => outcome.skip(*id),
                Some(row) => {
                    refundable_ids.push(*id);
                    amount += row.meal_price;
                }
            }
        }

        // Everything raced away: nothing to credit, nothing to commit.
        if refundable_ids.is_empty() {
            return Ok((None, outcome));
        }

        sqlx::query("UPDATE meal_cancellations SET refunded = true WHERE id = ANY($1)")
            .bind(&refundable_ids)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO meal_refund_payments (child_id, amount, reason) \
             VALUES ($1, $2, $3) \
             RETURNING {PAYMENT_COLUMNS}"
        );
        let payment: PaymentRecord = sqlx::query_as(&query)
            .bind(group.child_id)
            .bind(amount)
            .bind(REFUND_REASON)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        for id in refundable_ids {
            outcome.succeed(id);
        }
        Ok((Some(payment), outcome))
    }
}

fn to_refundable(rows: &[MealCancellation]) -> Vec<RefundableRow> {
    rows.iter()
        .map(|row| RefundableRow {
            id: row.id,
            child_id: row.child_id,
            meal_price: row.meal_price,
            refunded: row.refunded,
        })
        .collect()
}
