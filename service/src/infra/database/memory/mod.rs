//! In-memory [`Database`] implementation.
//!
//! Keeps all the records in a single [`State`] guarded by a [`RwLock`].
//! A transaction holds the write lock for its whole lifetime and mutates a
//! private copy of the [`State`], which replaces the shared one on commit
//! only, so uncommitted changes are never observable.
//!
//! [`RwLock`]: tokio::sync::RwLock

pub mod client;
mod impls;
pub mod state;

use derive_more::{Deref, Display, Error as StdError};

#[cfg(doc)]
use crate::infra::Database;

pub use self::{
    client::{Connection, NonTx, Tx},
    state::State,
};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self(NonTx::new(State::default()))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Transaction is already committed.
    #[display("Transaction is already committed")]
    TxFinished,

    /// Unique constraint is violated.
    #[display("Unique constraint `{_0}` is violated")]
    UniqueViolation(#[error(not(source))] &'static str),
}

impl Error {
    /// Checks if the error is a unique violation of the specified constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            Self::UniqueViolation(c) => constraint.map_or(true, |x| x == *c),
            Self::TxFinished => false,
        }
    }
}
