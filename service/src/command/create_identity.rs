//! [`Command`] for creating a new [`Identity`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tokio::task::{self, JoinError};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::identity::{Email, Password, Roles};
use crate::{
    domain::{identity, Identity},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Identity`].
#[derive(Debug)]
pub struct CreateIdentity {
    /// [`Email`] of a new [`Identity`].
    pub email: identity::Email,

    /// [`Password`] of a new [`Identity`].
    pub password: SecretBox<identity::Password>,

    /// [`Roles`] granted to a new [`Identity`].
    pub roles: identity::Roles,
}

impl<Db> Command<CreateIdentity> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: for<'l> Database<
            Select<By<Option<Identity>, &'l identity::Email>>,
            Ok = Option<Identity>,
            Err = Traced<database::Error>,
        > + Database<Insert<Identity>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Identity;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateIdentity) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateIdentity {
            email,
            password,
            roles,
        } = cmd;

        // Argon2id is CPU-bound.
        let password_hash = task::spawn_blocking(move || {
            identity::PasswordHash::new(password.expose_secret())
        })
        .await
        .map_err(tracerr::from_and_wrap!(=> E))?
        .map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let existing = tx
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let identity = Identity {
            id: identity::Id::new(),
            email,
            password_hash,
            is_enabled: true,
            roles,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(identity.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            identity.id = %identity.id,
            roles = ?identity.roles,
            "`Identity` created",
        );

        Ok(identity)
    }
}

/// Error of [`CreateIdentity`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Blocking hashing task failed to complete.
    #[display("`Password` hashing task failed: {_0}")]
    Blocking(JoinError),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`identity::Email`] is already occupied.
    #[display("`{_0}` email is occupied")]
    #[from(ignore)]
    EmailOccupied(#[error(not(source))] identity::Email),

    /// [`Password`] cannot be hashed.
    #[display("{_0}")]
    PasswordHash(identity::HashError),
}
