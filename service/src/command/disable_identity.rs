//! [`Command`] for disabling an [`Identity`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{identity, Identity},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for disabling an [`Identity`], so it cannot authenticate
/// anymore.
///
/// [`Identity`]s are never deleted.
#[derive(Clone, Copy, Debug, From)]
pub struct DisableIdentity {
    /// ID of the [`Identity`] to disable.
    pub identity_id: identity::Id,
}

impl<Db> Command<DisableIdentity> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Identity>, identity::Id>>,
            Ok = Option<Identity>,
            Err = Traced<database::Error>,
        > + Database<Update<Identity>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Identity;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DisableIdentity,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DisableIdentity { identity_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut identity = tx
            .execute(Select(By::<Option<Identity>, _>::new(identity_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::IdentityNotExists(identity_id))
            .map_err(tracerr::wrap!())?;
        if !identity.is_enabled {
            return Ok(identity);
        }

        identity.is_enabled = false;
        tx.execute(Update(identity.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::info!(identity.id = %identity.id, "`Identity` disabled");

        Ok(identity)
    }
}

/// Error of [`DisableIdentity`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Identity`] doesn't exist.
    #[display("`Identity(id: {_0})` does not exist")]
    #[from(ignore)]
    IdentityNotExists(#[error(not(source))] identity::Id),
}
