//! Refund batch vocabulary, outcome envelope, and partitioning logic.
//!
//! A refund batch is a best-effort bulk operation: every requested id
//! produces an explicit outcome (succeeded, skipped, or a per-item error)
//! and no single bad id aborts the rest. The partitioning step that groups
//! refundable rows per child is pure and lives here; the transactional
//! writes live in the repository layer.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::DbId;

/// Flip the refund flag without touching the payments ledger.
pub const ACTION_MARK_REFUNDED: &str = "mark_refunded";

/// Flip the refund flag and emit one payment credit per child.
pub const ACTION_GENERATE_PAYMENT: &str = "generate_payment";

/// All valid batch actions.
pub const VALID_BATCH_ACTIONS: &[&str] = &[ACTION_MARK_REFUNDED, ACTION_GENERATE_PAYMENT];

/// Validate that a batch action string is one of the accepted values.
pub fn validate_batch_action(action: &str) -> Result<(), String> {
    if VALID_BATCH_ACTIONS.contains(&action) {
        Ok(())
    } else {
        Err(format!(
            "Invalid batch action '{action}'. Must be one of: {}",
            VALID_BATCH_ACTIONS.join(", ")
        ))
    }
}

/// A per-item failure inside a batch, with a stable reason string.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemError {
    pub id: DbId,
    pub reason: String,
}

/// Structured result of a refund batch.
///
/// `skipped` holds idempotent no-ops (already refunded); `errors` holds
/// genuine per-item failures. Partial success is the normal outcome.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub succeeded: Vec<DbId>,
    pub skipped: Vec<DbId>,
    pub errors: Vec<BatchItemError>,
}

impl BatchOutcome {
    pub fn succeed(&mut self, id: DbId) {
        self.succeeded.push(id);
    }

    pub fn skip(&mut self, id: DbId) {
        self.skipped.push(id);
    }

    pub fn fail(&mut self, id: DbId, reason: impl Into<String>) {
        self.errors.push(BatchItemError {
            id,
            reason: reason.into(),
        });
    }

    pub fn merge(&mut self, other: BatchOutcome) {
        self.succeeded.extend(other.succeeded);
        self.skipped.extend(other.skipped);
        self.errors.extend(other.errors);
    }
}

/// The ledger fields the partitioner needs from a fetched row.
#[derive(Debug, Clone)]
pub struct RefundableRow {
    pub id: DbId,
    pub child_id: DbId,
    pub meal_price: Decimal,
    pub refunded: bool,
}

/// One child's share of a `generate_payment` batch: the unrefunded
/// cancellations selected for that child and the credit amount their
/// snapshot prices sum to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRefundGroup {
    pub child_id: DbId,
    pub cancellation_ids: Vec<DbId>,
    pub total: Decimal,
}

/// Result of partitioning a requested id set against the fetched rows.
#[derive(Debug, Clone, Default)]
pub struct RefundPartition {
    /// Per-child groups of valid, not-yet-refunded cancellations,
    /// ordered by child id.
    pub groups: Vec<ChildRefundGroup>,
    /// Requested ids that are already refunded (idempotent skips).
    pub skipped: Vec<DbId>,
    /// Requested ids with no matching row.
    pub missing: Vec<DbId>,
}

/// Partition the requested ids by child, separating out already-refunded
/// and missing ids.
///
/// `rows` are the ledger rows actually found for the request. Duplicate
/// requested ids collapse to one occurrence. Group order (by child id) and
/// id order within a group (ascending) are deterministic regardless of
/// request order.
pub fn partition_refundable(requested_ids: &[DbId], rows: &[RefundableRow]) -> RefundPartition {
    let by_id: HashMap<DbId, &RefundableRow> = rows.iter().map(|r| (r.id, r)).collect();

    let mut partition = RefundPartition::default();
    let mut groups_by_child: HashMap<DbId, ChildRefundGroup> = HashMap::new();
    let mut seen: Vec<DbId> = Vec::new();

    for &id in requested_ids {
        if seen.contains(&id) {
            continue;
        }
        seen.push(id);

        match by_id.get(&id) {
            None => partition.missing.push(id),
            Some(row) if row.refunded => partition.skipped.push(id),
            Some(row) => {
                let group =
                    groups_by_child
                        .entry(row.child_id)
                        .or_insert_with(|| ChildRefundGroup {
                            child_id: row.child_id,
                            cancellation_ids: Vec::new(),
                            total: Decimal::ZERO,
                        });
                group.cancellation_ids.push(id);
                group.total += row.meal_price;
            }
        }
    }

    let mut groups: Vec<ChildRefundGroup> = groups_by_child.into_values().collect();
    groups.sort_by_key(|g| g.child_id);
    for group in &mut groups {
        group.cancellation_ids.sort_unstable();
    }
    partition.groups = groups;
    partition.skipped.sort_unstable();
    partition.missing.sort_unstable();
    partition
}
