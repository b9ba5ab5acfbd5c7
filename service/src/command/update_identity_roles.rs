//! [`Command`] for updating [`identity::Roles`] of an [`Identity`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{identity, Identity},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for replacing [`identity::Roles`] of an [`Identity`].
///
/// Already issued [`Session`]s are not affected: the new [`identity::Roles`]
/// apply to the requests authorized after this [`Command`] completes.
///
/// [`Session`]: identity::Session
#[derive(Clone, Debug)]
pub struct UpdateIdentityRoles {
    /// ID of the [`Identity`] to update.
    pub identity_id: identity::Id,

    /// New [`identity::Roles`] of the [`Identity`].
    pub roles: identity::Roles,
}

impl<Db> Command<UpdateIdentityRoles> for Service<Db>
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
        cmd: UpdateIdentityRoles,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateIdentityRoles { identity_id, roles } = cmd;

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
        if identity.roles == roles {
            return Ok(identity);
        }

        identity.roles = roles;
        tx.execute(Update(identity.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::info!(
            identity.id = %identity.id,
            roles = ?identity.roles,
            "`Identity` roles updated",
        );

        Ok(identity)
    }
}

/// Error of [`UpdateIdentityRoles`] [`Command`] execution.
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

#[cfg(test)]
mod spec {
    use crate::{
        command::{fixture, UpdateIdentityRoles},
        domain::identity::{self, Role, Roles},
        query, Command as _, Query as _,
    };

    use super::ExecutionError;

    #[tokio::test]
    async fn replaces_roles() {
        let service = fixture::service();
        let identity =
            fixture::identity(&service, "luigi@example.it", &[Role::Tenant])
                .await;

        let updated = service
            .execute(UpdateIdentityRoles {
                identity_id: identity.id,
                roles: Roles::new([Role::Manager]),
            })
            .await
            .unwrap();

        assert_eq!(updated.roles, Roles::new([Role::Manager]));
        let stored = service
            .execute(query::identity::ById::by(identity.id))
            .await
            .unwrap()
            .unwrap();
        assert!(stored.roles.contains(Role::Manager));
        assert!(!stored.roles.contains(Role::Tenant));
    }

    #[tokio::test]
    async fn requires_existing_identity() {
        let service = fixture::service();

        let err = service
            .execute(UpdateIdentityRoles {
                identity_id: identity::Id::new(),
                roles: Roles::new([Role::Admin]),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::IdentityNotExists(_)));
    }
}
