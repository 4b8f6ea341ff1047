//! Purge ledger: durable bookkeeping for accepted candidates.
//!
//! One row per accepted candidate. `purged` flips to true exactly once,
//! after a successful drop; rows are never deleted, so reruns can tell
//! completed work from pending work.

use crate::find::Candidate;
use crate::Result;

/// DDL for the ledger table. Idempotent.
pub const CREATE_LEDGER_SQL: &str = "\
CREATE TABLE IF NOT EXISTS scour_purge_record (
    id BIGSERIAL PRIMARY KEY,
    table_name TEXT NOT NULL,
    column_name TEXT NOT NULL,
    model_id BIGINT NOT NULL,
    purged BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

pub const INSERT_RECORD_SQL: &str = "\
INSERT INTO scour_purge_record (table_name, column_name, model_id)
VALUES ($1, $2, $3)
RETURNING id";

pub const SELECT_RECORDS_SQL: &str = "\
SELECT id, table_name, column_name, model_id, purged
  FROM scour_purge_record
 WHERE id = ANY($1)";

pub const MARK_PURGED_SQL: &str = "\
UPDATE scour_purge_record SET purged = true WHERE id = $1";

/// A persisted purge record.
///
/// `purged = true` means the column either was dropped through this record
/// or had already disappeared by the time it was processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeRecord {
    pub id: i64,
    pub table_name: String,
    pub column_name: String,
    pub model_id: i64,
    pub purged: bool,
}

impl PurgeRecord {
    /// A pending record for an accepted candidate.
    pub fn pending(id: i64, candidate: &Candidate) -> Self {
        Self {
            id,
            table_name: candidate.table.clone(),
            column_name: candidate.column.clone(),
            model_id: candidate.model_id,
            purged: false,
        }
    }
}

/// Persistence operations for purge records, plus the durability boundary
/// of the purge loop.
#[allow(async_fn_in_trait)]
pub trait PurgeLedger {
    /// Create the ledger table if it does not exist yet.
    async fn ensure_ledger(&mut self) -> Result<()>;

    /// Persist accepted candidates as pending records.
    async fn record_candidates(&mut self, candidates: &[Candidate]) -> Result<Vec<PurgeRecord>>;

    /// Load records by id, in the order the ids were given.
    ///
    /// Fails with [`Error::UnknownRecord`](crate::Error::UnknownRecord) if
    /// any id is missing from the ledger.
    async fn load_records(&self, ids: &[i64]) -> Result<Vec<PurgeRecord>>;

    /// Flip a record to purged. Joins the open unit of work; durable only
    /// after [`commit`](Self::commit).
    async fn mark_purged(&mut self, id: i64) -> Result<()>;

    /// Durably commit the open unit of work, if any.
    async fn commit(&mut self) -> Result<()>;
}
