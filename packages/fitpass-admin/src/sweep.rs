//! Referential-integrity sweep.
//!
//! Deletes child rows whose foreign key names no existing parent row,
//! classifying against one snapshot of each table. The two snapshots are
//! read at different instants and nothing is locked: the sweep is only
//! correct relative to what it read.
//!
//! Failure model:
//! - Either read fails: abort with [`SweepError`] before any delete.
//! - A delete fails: record it on that row and keep going.

use std::collections::HashSet;
use table_store::{Row, RowId, StoreError, TableStore};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Which parent/child relationship to enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepTarget {
    pub parent_table: &'static str,
    pub parent_key: &'static str,
    pub child_table: &'static str,
    pub foreign_key: &'static str,
}

impl SweepTarget {
    /// Every booking must reference an existing class.
    pub const fn bookings_to_classes() -> Self {
        Self {
            parent_table: "classes",
            parent_key: "id",
            child_table: "bookings",
            foreign_key: "class_id",
        }
    }
}

/// The sweep could not read the data it needs; nothing was deleted.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("failed to read {table}: {source}")]
    Fetch {
        table: &'static str,
        #[source]
        source: StoreError,
    },
}

/// Outcome for one child row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Reference resolves; row left untouched.
    Valid,
    /// Dangling; the store removed the row.
    Deleted,
    /// Dangling, but the delete matched no rows. Either another sweep got
    /// there first or a row-level policy refused it; the row is not
    /// confirmed gone.
    NothingMatched,
    /// Dangling, and the delete could not be carried out.
    DeleteFailed(String),
}

/// One classified child row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checked {
    /// The row's own id, if it has a usable one.
    pub id: Option<RowId>,
    /// The referenced parent id, if the foreign key holds one.
    pub reference: Option<RowId>,
    pub verdict: Verdict,
}

/// Everything one sweep observed and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub target: SweepTarget,
    /// Parent ids in the snapshot, in store order.
    pub parent_ids: Vec<RowId>,
    /// Child rows in the order the store returned them.
    pub checked: Vec<Checked>,
}

impl SweepReport {
    pub fn children_read(&self) -> usize {
        self.checked.len()
    }

    pub fn valid(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Valid))
    }

    /// Dangling rows found, whatever became of them.
    pub fn invalid(&self) -> usize {
        self.children_read() - self.valid()
    }

    /// Dangling rows the store confirmed removing.
    pub fn removed(&self) -> usize {
        self.count(|v| matches!(v, Verdict::Deleted))
    }

    /// Deletes that were accepted but removed nothing.
    pub fn unmatched(&self) -> usize {
        self.count(|v| matches!(v, Verdict::NothingMatched))
    }

    pub fn failed(&self) -> usize {
        self.count(|v| matches!(v, Verdict::DeleteFailed(_)))
    }

    /// Every dangling row was confirmed removed.
    pub fn is_clean(&self) -> bool {
        self.removed() == self.invalid()
    }

    fn count(&self, pred: impl Fn(&Verdict) -> bool) -> usize {
        self.checked.iter().filter(|c| pred(&c.verdict)).count()
    }
}

/// Remove every booking whose class no longer exists.
pub async fn sweep_dangling_bookings<S>(store: &S) -> Result<SweepReport, SweepError>
where
    S: TableStore + ?Sized,
{
    run_sweep(store, SweepTarget::bookings_to_classes()).await
}

/// Remove every child row of `target` whose parent no longer exists.
pub async fn run_sweep<S>(store: &S, target: SweepTarget) -> Result<SweepReport, SweepError>
where
    S: TableStore + ?Sized,
{
    let parents = fetch(store, target.parent_table).await?;
    let children = fetch(store, target.child_table).await?;

    let parent_ids: Vec<RowId> = parents
        .iter()
        .filter_map(|row| RowId::of(row, target.parent_key))
        .collect();
    let valid: HashSet<&RowId> = parent_ids.iter().collect();

    info!(
        parents = parent_ids.len(),
        children = children.len(),
        parent_table = target.parent_table,
        child_table = target.child_table,
        "Checking references"
    );

    let mut checked = Vec::with_capacity(children.len());
    for child in &children {
        let id = RowId::of_row(child);
        let reference = RowId::of(child, target.foreign_key);

        if reference.as_ref().is_some_and(|r| valid.contains(r)) {
            debug!(id = ?id, reference = ?reference, "Valid reference");
            checked.push(Checked {
                id,
                reference,
                verdict: Verdict::Valid,
            });
            continue;
        }

        debug!(id = ?id, reference = ?reference, "Dangling reference");
        let verdict = match &id {
            Some(id) => delete(store, target.child_table, id).await,
            None => {
                warn!(child_table = target.child_table, "Dangling row has no usable id");
                Verdict::DeleteFailed("row has no usable id".to_string())
            }
        };
        checked.push(Checked {
            id,
            reference,
            verdict,
        });
    }

    let report = SweepReport {
        target,
        parent_ids,
        checked,
    };
    info!(
        valid = report.valid(),
        removed = report.removed(),
        unmatched = report.unmatched(),
        failed = report.failed(),
        "Sweep finished"
    );
    Ok(report)
}

async fn fetch<S>(store: &S, table: &'static str) -> Result<Vec<Row>, SweepError>
where
    S: TableStore + ?Sized,
{
    store.list_rows(table).await.map_err(|source| {
        warn!(table, error = %source, "Sweep aborted before any delete");
        SweepError::Fetch { table, source }
    })
}

async fn delete<S>(store: &S, table: &str, id: &RowId) -> Verdict
where
    S: TableStore + ?Sized,
{
    match store.delete_row(table, id).await {
        Ok(0) => {
            warn!(table, %id, "Delete matched no rows");
            Verdict::NothingMatched
        }
        Ok(_) => {
            info!(table, %id, "Deleted dangling row");
            Verdict::Deleted
        }
        Err(e) => {
            warn!(table, %id, error = %e, "Delete failed");
            Verdict::DeleteFailed(e.to_string())
        }
    }
}
