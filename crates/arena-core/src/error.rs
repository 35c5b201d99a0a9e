//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they surface core failures.

use thiserror::Error;

use crate::ActorId;

/// The top-level error type for `arena-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `arena-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
