//! Error type for parsing and validating fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address {0:?}: expected 0x followed by 40 hex digits")]
    InvalidAddress(String),

    #[error("unknown workflow phase {0:?}")]
    UnknownPhase(String),
}
