//! [`Memory`] database client definitions.
//!
//! [`Memory`]: super::Memory

pub mod non_tx;
pub mod tx;

use std::future::Future;

use tracerr::Traced;

use crate::infra::database::{self, memory};

use super::State;

pub use self::{non_tx::NonTx, tx::Tx};

/// Generic connection to a [`State`].
pub trait Connection {
    /// Reads the [`State`] with the provided function.
    ///
    /// # Errors
    ///
    /// If the [`State`] is not accessible anymore.
    fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;

    /// Modifies the [`State`] with the provided function.
    ///
    /// The function must leave the [`State`] untouched whenever it fails.
    ///
    /// # Errors
    ///
    /// If the [`State`] is not accessible anymore, or the provided function
    /// fails.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, memory::Error>,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;
}
