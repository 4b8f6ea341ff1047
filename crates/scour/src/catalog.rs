//! Catalog access seam.
//!
//! The analyzer and the purge executor talk to the database through this
//! trait so the algorithms stay testable against in-memory fakes. The real
//! implementation is [`PgSession`](crate::PgSession).

use crate::Result;

/// Physical column names of a table, in catalog order.
///
/// Excludes columns already marked as dropped (`attisdropped`) and the
/// catalog-internal system columns, which Postgres exposes with the type
/// names `cid`, `tid`, `oid` and `xid` — row identifiers and transaction id
/// markers, never user data.
pub const SCAN_COLUMNS_SQL: &str = "\
SELECT a.attname
  FROM pg_catalog.pg_class c
  JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid
 WHERE c.relname = $1
   AND NOT a.attisdropped
   AND pg_catalog.format_type(a.atttypid, a.atttypmod)
       NOT IN ('cid', 'tid', 'oid', 'xid')
 ORDER BY a.attnum";

/// Re-check that a single column still exists on a table.
pub const COLUMN_EXISTS_SQL: &str = "\
SELECT count(a.attname)
  FROM pg_catalog.pg_attribute a
 WHERE a.attrelid = (SELECT oid FROM pg_catalog.pg_class WHERE relname = $1)
   AND a.attname = $2
   AND NOT a.attisdropped";

/// Catalog introspection and mutation.
///
/// `columns` and `column_exists` are reads; `drop_column` is the one
/// structural mutation in the system and is not reversible once committed.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// All physical column names on `table`, in catalog order, with
    /// dropped-but-not-vacuumed and system columns already filtered out.
    async fn columns(&self, table: &str) -> Result<Vec<String>>;

    /// Whether `column` is physically present on `table` right now.
    async fn column_exists(&self, table: &str, column: &str) -> Result<bool>;

    /// Drop `column` from `table`. Fails loudly if either does not exist.
    async fn drop_column(&mut self, table: &str, column: &str) -> Result<()>;
}
