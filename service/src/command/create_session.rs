//! [`Command`] for creating a [`Session`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tokio::task::{self, JoinError};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::identity::{session::Token, Email, Password};
use crate::{
    auth::token,
    domain::{
        identity::{self, session, Session},
        Identity,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`].
#[derive(Debug, From)]
pub enum CreateSession {
    /// Create a new [`Session`] by [`Identity`] credentials.
    ByCredentials {
        /// [`Email`] of an [`Identity`].
        email: identity::Email,

        /// [`Password`] of an [`Identity`].
        password: SecretBox<identity::Password>,
    },

    /// Create a new [`Session`] by [`Identity`] ID.
    ByIdentityId(identity::Id),
}

/// Output of [`CreateSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// Claims of the created [`Session`].
    pub session: Session,

    /// [`Identity`] whose [`Session`] has been created.
    pub identity: Identity,
}

impl<Db> Command<CreateSession> for Service<Db>
where
    Db: Database<
            Select<By<Option<Identity>, identity::Id>>,
            Ok = Option<Identity>,
            Err = Traced<database::Error>,
        > + for<'l> Database<
            Select<By<Option<Identity>, &'l identity::Email>>,
            Ok = Option<Identity>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateSession) -> Result<Self::Ok, Self::Err> {
        use CreateSession as Cmd;
        use ExecutionError as E;

        let identity = match cmd {
            Cmd::ByCredentials { email, password } => {
                let identity = self
                    .database()
                    .execute(Select(By::new(&email)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::WrongCredentials)
                    .map_err(tracerr::wrap!())?;

                let hash = identity.password_hash.clone();
                let matches = task::spawn_blocking(move || {
                    hash.verify(password.expose_secret())
                })
                .await
                .map_err(tracerr::from_and_wrap!(=> E))?;
                if !matches {
                    return Err(tracerr::new!(E::WrongCredentials));
                }

                identity
            }
            Cmd::ByIdentityId(id) => self
                .database()
                .execute(Select(By::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::IdentityNotExists(id))
                .map_err(tracerr::wrap!())?,
        };
        if !identity.is_enabled {
            return Err(tracerr::new!(E::IdentityDisabled(identity.id)));
        }

        let (token, session) = self
            .config()
            .tokens
            .issue(session::Subject::from(&identity.email))
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tracing::debug!(
            identity.id = %identity.id,
            expires_at = %session.expires_at.to_rfc3339(),
            "`Session` issued",
        );

        Ok(Output {
            token,
            session,
            identity,
        })
    }
}

/// Error of [`CreateSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Blocking verification task failed to complete.
    #[display("`Password` verification task failed: {_0}")]
    Blocking(JoinError),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Identity`] is disabled.
    #[display("`Identity(id: {_0})` is disabled")]
    #[from(ignore)]
    IdentityDisabled(#[error(not(source))] identity::Id),

    /// [`Identity`] with the provided ID does not exist.
    #[display("`Identity(id: {_0})` does not exist")]
    #[from(ignore)]
    IdentityNotExists(#[error(not(source))] identity::Id),

    /// [`Token`] cannot be issued.
    #[display("{_0}")]
    Token(token::IssueError),

    /// [`CreateSession::ByCredentials`] contains wrong credentials.
    #[display("Wrong `Identity` credentials")]
    WrongCredentials,
}
