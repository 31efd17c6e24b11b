// errors.rs
use std::fmt;

/// Errors originating from the persistence layer. One listing's failure
/// is contained by the caller; nothing here aborts the monitor.
#[derive(Debug)]
pub enum StoreError {
    Db(String),
    Internal,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Db(msg) => write!(f, "Database Error: {msg}"),
            StoreError::Internal => write!(f, "Internal Store Error"),
        }
    }
}

impl std::error::Error for StoreError {}
