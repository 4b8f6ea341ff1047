use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// A run found zero orphaned columns. Informational, not a failure of
    /// the system; callers are expected to match on it and tell the user.
    #[error("no orphaned columns found")]
    NothingToDo,

    /// A purge was requested for a record id the ledger does not contain.
    #[error("unknown purge record: {id}")]
    UnknownRecord { id: i64 },
}

impl Error {
    /// True for the "nothing to do" condition, which is surfaced to the
    /// user rather than treated as an error.
    pub fn is_nothing_to_do(&self) -> bool {
        matches!(self, Error::NothingToDo)
    }
}
