//! Postgres schema reconciliation: find and purge orphaned columns.
//!
//! Applications whose models evolve over time leave columns behind: a field
//! is removed from a model, but the physical column it was backed by stays
//! in the table. This crate computes which columns are safe to consider
//! orphaned and drops them with durable per-item bookkeeping.
//!
//! # Pipeline
//!
//! 1. [`find_orphans`] enumerates the model registry, groups models by
//!    physical table (several models can share one table through
//!    inheritance), and asks the schema analyzer for columns no surviving
//!    field explains.
//! 2. The candidate list crosses a confirmation boundary (a CLI prompt, a
//!    UI) and the approved subset is written to the purge ledger.
//! 3. [`purge_columns`] re-validates each record, drops the column, marks
//!    the record purged, and commits before moving to the next one, so a
//!    crash mid-run never redoes completed work.
//!
//! # Example
//!
//! ```ignore
//! use scour::{PgSession, PurgeLedger, PurgeRules, find_orphans, purge_columns};
//!
//! let mut session = PgSession::connect(&database_url).await?;
//! let rules = PurgeRules::default();
//!
//! let candidates = find_orphans(&session, &registry, &rules).await?;
//! // ... show `candidates` to a human, keep the approved subset ...
//!
//! session.ensure_ledger().await?;
//! let records = session.record_candidates(&candidates).await?;
//! let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
//! let report = purge_columns(&mut session, &ids).await?;
//! ```

mod analyze;
mod catalog;
mod error;
mod find;
mod ledger;
mod purge;
mod registry;
mod rules;
mod session;
pub mod sql;

pub use analyze::{find_orphaned_columns, orphaned_columns};
pub use catalog::Catalog;
pub use error::Error;
pub use find::{Candidate, TableGroup, find_orphans, group_by_table};
pub use ledger::{PurgeLedger, PurgeRecord};
pub use purge::{PurgeReport, purge_columns};
pub use registry::{FieldDef, ModelDescriptor, ModelRef, ModelRegistry};
pub use rules::PurgeRules;
pub use session::PgSession;

/// Result type for scour operations.
pub type Result<T> = std::result::Result<T, Error>;
