//! [`Tx`] client definitions.

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedRwLockWriteGuard};
use tracerr::Traced;

use crate::infra::database::{self, memory};

use super::{Connection, NonTx, State};

/// Transactional in-memory database client.
///
/// Holds the exclusive lock of the shared [`State`] until committed or
/// dropped, so any [`NonTx`] operation of the same database waits for it.
/// Dropping a [`Tx`] without [committing] discards all its changes.
///
/// Starting a [`Tx`] copies the whole [`State`], so every transaction costs
/// time proportional to the database size.
///
/// [committing]: Tx::commit
#[derive(Clone, Debug)]
pub struct Tx {
    /// Inner representation of this client.
    inner: Arc<Mutex<Option<Inner>>>,
}

/// Inner representation of the [`Tx`] client.
#[derive(Debug)]
struct Inner {
    /// Exclusive lock of the shared [`State`].
    shared: OwnedRwLockWriteGuard<State>,

    /// Private copy of the [`State`] this [`Tx`] operates on.
    staged: State,
}

impl Tx {
    /// Starts a new [`Tx`] upon the [`State`] of the provided [`NonTx`]
    /// client.
    pub(crate) async fn from_non_tx(client: &NonTx) -> Self {
        let shared = Arc::clone(&client.state).write_owned().await;
        let staged = shared.clone();
        Self {
            inner: Arc::new(Mutex::new(Some(Inner { shared, staged }))),
        }
    }

    /// Commits this [`Tx`] client, publishing all its changes at once.
    ///
    /// # Errors
    ///
    /// If this [`Tx`] client is already committed.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Inner { mut shared, staged } = self
            .inner
            .lock()
            .await
            .take()
            .ok_or(memory::Error::TxFinished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        *shared = staged;
        Ok(())
    }
}

impl Connection for Tx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let inner = self.inner.lock().await;
        let Inner { staged, .. } = inner
            .as_ref()
            .ok_or(memory::Error::TxFinished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        Ok(f(staged))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, memory::Error>,
    ) -> Result<R, Traced<database::Error>> {
        let mut inner = self.inner.lock().await;
        let Inner { staged, .. } = inner
            .as_mut()
            .ok_or(memory::Error::TxFinished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        f(staged).map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}
