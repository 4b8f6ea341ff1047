//! Purge executor: drop accepted orphans, one durable step at a time.
//!
//! Per record: skip if already purged, re-check the column still exists
//! (inheritance such as two models sharing a table can lead to double
//! attempts at removal, and the schema may have changed since detection),
//! drop it, mark the record purged, commit. The commit after each record is
//! the system's only atomicity contract: an interruption loses nothing that
//! was already committed and reruns pick up exactly the remainder.

use crate::catalog::Catalog;
use crate::ledger::PurgeLedger;
use crate::Result;

/// Outcome of a purge run, partitioned by what happened to each record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    /// Dropped and marked purged in this run.
    pub purged: Vec<i64>,
    /// Column was already gone at execution time; skipped, left pending.
    pub missing: Vec<i64>,
    /// Record was already purged before this run; skipped.
    pub already_purged: Vec<i64>,
}

impl PurgeReport {
    /// Total number of records processed.
    pub fn len(&self) -> usize {
        self.purged.len() + self.missing.len() + self.already_purged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Purge the given ledger records, strictly in the order supplied.
///
/// Already-purged records are skipped unconditionally, so calling this
/// twice with the same ids is a no-op the second time. A record whose
/// column has already disappeared is skipped without being marked purged —
/// the ledger keeps it pending, which mirrors what detection would say.
/// A catalog error aborts the loop; records committed before the failure
/// stay purged.
pub async fn purge_columns<S>(session: &mut S, ids: &[i64]) -> Result<PurgeReport>
where
    S: Catalog + PurgeLedger,
{
    let records = session.load_records(ids).await?;
    let mut report = PurgeReport::default();

    for record in records {
        if record.purged {
            report.already_purged.push(record.id);
            continue;
        }

        if !session
            .column_exists(&record.table_name, &record.column_name)
            .await?
        {
            tracing::debug!(
                table = %record.table_name,
                column = %record.column_name,
                "column already gone, skipping"
            );
            report.missing.push(record.id);
            continue;
        }

        tracing::info!(
            table = %record.table_name,
            column = %record.column_name,
            "dropping column"
        );
        session
            .drop_column(&record.table_name, &record.column_name)
            .await?;
        session.mark_purged(record.id).await?;
        session.commit().await?;
        report.purged.push(record.id);
    }

    Ok(report)
}
