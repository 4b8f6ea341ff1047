//! The single database session.
//!
//! Introspection, mutation and ledger bookkeeping all run on one
//! `tokio_postgres::Client` — the system assumes exclusive, serialized
//! access to it. Every statement is logged via tracing. Mutations join a
//! lazily opened transaction; `commit` is the durability boundary the purge
//! loop leans on.

use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Row};
use tracing::Instrument;

use crate::catalog::{COLUMN_EXISTS_SQL, Catalog, SCAN_COLUMNS_SQL};
use crate::find::Candidate;
use crate::ledger::{
    CREATE_LEDGER_SQL, INSERT_RECORD_SQL, MARK_PURGED_SQL, PurgeLedger, PurgeRecord,
    SELECT_RECORDS_SQL,
};
use crate::sql::drop_column_sql;
use crate::{Error, Result};

/// A single Postgres session implementing [`Catalog`] and [`PurgeLedger`].
pub struct PgSession {
    client: Client,
    in_txn: bool,
}

impl PgSession {
    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            in_txn: false,
        }
    }

    /// Connect to the database and spawn the connection driver.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "database connection error");
            }
        });

        Ok(Self::new(client))
    }

    /// Get the inner client (for cases where you need the raw connection).
    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>> {
        let span = tracing::debug_span!(
            "db.query",
            sql = %sql,
            params = params.len(),
            rows = tracing::field::Empty,
        );
        let rows = self.client.query(sql, params).instrument(span.clone()).await?;
        span.record("rows", rows.len());
        Ok(rows)
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Row> {
        let span = tracing::debug_span!(
            "db.query",
            sql = %sql,
            params = params.len(),
            rows = 1u64,
        );
        Ok(self.client.query_one(sql, params).instrument(span).await?)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<u64> {
        let span = tracing::debug_span!(
            "db.execute",
            sql = %sql,
            params = params.len(),
            affected = tracing::field::Empty,
        );
        let affected = self
            .client
            .execute(sql, params)
            .instrument(span.clone())
            .await?;
        span.record("affected", affected);
        Ok(affected)
    }

    async fn batch(&self, sql: &str) -> Result<()> {
        let span = tracing::debug_span!("db.execute", sql = %sql);
        self.client.batch_execute(sql).instrument(span).await?;
        Ok(())
    }

    /// Open a transaction if none is open; mutations between here and
    /// `commit` form one durable unit.
    async fn begin_if_needed(&mut self) -> Result<()> {
        if !self.in_txn {
            self.batch("BEGIN").await?;
            self.in_txn = true;
        }
        Ok(())
    }
}

impl Catalog for PgSession {
    async fn columns(&self, table: &str) -> Result<Vec<String>> {
        let rows = self.query(SCAN_COLUMNS_SQL, &[&table]).await?;
        rows.iter().map(|row| Ok(row.try_get(0)?)).collect()
    }

    async fn column_exists(&self, table: &str, column: &str) -> Result<bool> {
        let row = self.query_one(COLUMN_EXISTS_SQL, &[&table, &column]).await?;
        let count: i64 = row.try_get(0)?;
        Ok(count > 0)
    }

    async fn drop_column(&mut self, table: &str, column: &str) -> Result<()> {
        self.begin_if_needed().await?;
        self.execute(&drop_column_sql(table, column), &[]).await?;
        Ok(())
    }
}

impl PurgeLedger for PgSession {
    async fn ensure_ledger(&mut self) -> Result<()> {
        self.batch(CREATE_LEDGER_SQL).await
    }

    async fn record_candidates(&mut self, candidates: &[Candidate]) -> Result<Vec<PurgeRecord>> {
        // Each insert autocommits; acceptance does not share the purge
        // loop's transaction machinery.
        let mut records = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let row = self
                .query_one(
                    INSERT_RECORD_SQL,
                    &[&candidate.table, &candidate.column, &candidate.model_id],
                )
                .await?;
            let id: i64 = row.try_get(0)?;
            records.push(PurgeRecord::pending(id, candidate));
        }
        Ok(records)
    }

    async fn load_records(&self, ids: &[i64]) -> Result<Vec<PurgeRecord>> {
        let id_list: Vec<i64> = ids.to_vec();
        let rows = self.query(SELECT_RECORDS_SQL, &[&id_list]).await?;

        let mut by_id = std::collections::HashMap::with_capacity(rows.len());
        for row in &rows {
            let record = PurgeRecord {
                id: row.try_get(0)?,
                table_name: row.try_get(1)?,
                column_name: row.try_get(2)?,
                model_id: row.try_get(3)?,
                purged: row.try_get(4)?,
            };
            by_id.insert(record.id, record);
        }

        // Preserve the caller's order; the loop contract is order-sensitive.
        ids.iter()
            .map(|id| by_id.remove(id).ok_or(Error::UnknownRecord { id: *id }))
            .collect()
    }

    async fn mark_purged(&mut self, id: i64) -> Result<()> {
        self.begin_if_needed().await?;
        self.execute(MARK_PURGED_SQL, &[&id]).await?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if self.in_txn {
            self.batch("COMMIT").await?;
            self.in_txn = false;
        }
        Ok(())
    }
}
