/// Outcome of a statement execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    rows_affected: u64,
    last_insert_id: Option<i64>,
}

impl ExecResult {
    pub fn new(rows_affected: u64, last_insert_id: Option<i64>) -> Self {
        Self {
            rows_affected,
            last_insert_id,
        }
    }

    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// The store-generated key of the last inserted row.
    ///
    /// `None` when the dialect or statement has no meaningful value for it
    /// (e.g. UPDATE, or Postgres inserts without RETURNING).
    pub fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }
}
