//! Settlement aggregation over cancellation records.
//!
//! Builds the per-child and roster-wide financial view of a filtered set of
//! cancellations. This is a read-only projection: it takes plain rows
//! (already fetched and ordered by the repository layer) and folds them
//! into totals. For every child, `total_unrefunded + total_refunded`
//! always equals the sum of that child's snapshot prices.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// One cancellation record as seen by the aggregator.
///
/// Produced from a ledger row joined with the roster; `child_name` is the
/// display name used for ordering and presentation.
#[derive(Debug, Clone, Serialize)]
pub struct CancellationEntry {
    pub id: DbId,
    pub child_id: DbId,
    pub child_name: String,
    pub date: NaiveDate,
    pub meal_type: String,
    pub meal_price: Decimal,
    pub refunded: bool,
    pub created_at: Timestamp,
}

/// Financial summary for a single child over the queried range.
#[derive(Debug, Clone, Serialize)]
pub struct ChildSettlement {
    pub child_id: DbId,
    pub child_name: String,
    pub cancellations: Vec<CancellationEntry>,
    pub total_unrefunded: Decimal,
    pub total_refunded: Decimal,
}

/// Roster-wide summary across all children in the report.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementSummary {
    pub total_children: u32,
    pub total_cancellations: u32,
    pub grand_total_unrefunded: Decimal,
    pub grand_total_refunded: Decimal,
}

/// Per-child settlements plus the roster-wide summary.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementReport {
    pub per_child: Vec<ChildSettlement>,
    pub summary: SettlementSummary,
}

/// Fold a filtered, ordered list of cancellations into a settlement report.
///
/// Children appear in the order their first entry appears in the input, so
/// the repository's ordering (surname, then date) carries through to the
/// report. The input list is consumed; each entry lands in exactly one
/// child group.
pub fn build_settlements(entries: Vec<CancellationEntry>) -> SettlementReport {
    let mut per_child: Vec<ChildSettlement> = Vec::new();
    let mut index_by_child: HashMap<DbId, usize> = HashMap::new();

    let total_cancellations = entries.len() as u32;

    for entry in entries {
        let idx = match index_by_child.get(&entry.child_id) {
            Some(&idx) => idx,
            None => {
                per_child.push(ChildSettlement {
                    child_id: entry.child_id,
                    child_name: entry.child_name.clone(),
                    cancellations: Vec::new(),
                    total_unrefunded: Decimal::ZERO,
                    total_refunded: Decimal::ZERO,
                });
                let idx = per_child.len() - 1;
                index_by_child.insert(entry.child_id, idx);
                idx
            }
        };

        let child = &mut per_child[idx];
        if entry.refunded {
            child.total_refunded += entry.meal_price;
        } else {
            child.total_unrefunded += entry.meal_price;
        }
        child.cancellations.push(entry);
    }

    let summary = SettlementSummary {
        total_children: per_child.len() as u32,
        total_cancellations,
        grand_total_unrefunded: per_child.iter().map(|c| c.total_unrefunded).sum(),
        grand_total_refunded: per_child.iter().map(|c| c.total_refunded).sum(),
    };

    SettlementReport { per_child, summary }
}
