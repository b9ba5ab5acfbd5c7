//! [`NonTx`] client definitions.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracerr::Traced;

use crate::infra::database::{self, memory};

use super::{Connection, State};

/// Non-transactional in-memory database client.
///
/// Every operation is applied to the shared [`State`] immediately.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// Shared [`State`] of the database.
    pub(crate) state: Arc<RwLock<State>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client owning the provided [`State`].
    #[must_use]
    pub(crate) fn new(state: State) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

impl Connection for NonTx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&*self.state.read().await))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, memory::Error>,
    ) -> Result<R, Traced<database::Error>> {
        f(&mut *self.state.write().await)
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}
