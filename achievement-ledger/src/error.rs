//! Error types for ledger operations.

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Submission names an assignment the ledger does not know
    #[error("Assignment not found: {0}")]
    UnknownAssignment(String),

    /// Report not found
    #[error("Report not found: {0}")]
    UnknownReport(String),

    /// Report points at a submission the ledger does not know
    #[error("Submission not found: {0}")]
    UnknownSubmission(String),

    /// A record with this ID already exists
    #[error("Duplicate {kind}: {id}")]
    DuplicateRecord { kind: &'static str, id: String },

    /// Notification not found
    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    /// Notification delivery failed
    #[error("Delivery error: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
