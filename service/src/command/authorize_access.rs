//! [`Command`] for authorizing an access of a [`Principal`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    auth::{policy, Access, Denial, Principal, Resource},
    domain::{
        contract, installment, maintenance, tenant, Contract, Installment,
        Maintenance, Tenant,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for authorizing an access of a [`Principal`] to an action and,
/// optionally, to a [`Tenant`]-scoped [`Resource`].
///
/// The route-level [`Access`] is always checked first, so an absent
/// [`Principal`] is never reported as a forbidden one.
#[derive(Clone, Debug)]
pub struct AuthorizeAccess {
    /// [`Principal`] performing the action, if authenticated.
    pub principal: Option<Principal>,

    /// Route-level [`Access`] requirement of the action.
    pub access: Access,

    /// [`Resource`] the action is performed upon, if any.
    pub resource: Option<Resource>,
}

impl<Db> Command<AuthorizeAccess> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Installment>, installment::Id>>,
            Ok = Option<Installment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Maintenance>, maintenance::Id>>,
            Ok = Option<Maintenance>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Tenant>, tenant::Id>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeAccess,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeAccess {
            principal,
            access,
            resource,
        } = cmd;

        access
            .check(principal.as_ref())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let (Some(principal), Some(resource)) = (principal, resource) else {
            return Ok(());
        };
        if principal.roles.is_elevated() {
            return Ok(());
        }

        let owner = self.owner_of(resource).await?;
        policy::check_ownership(&principal, owner).map_err(|e| {
            tracing::debug!(
                identity.id = %principal.identity_id,
                %resource,
                "`Resource` access denied",
            );
            tracerr::new!(E::Denied(e))
        })
    }
}

impl<Db> Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Installment>, installment::Id>>,
            Ok = Option<Installment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Maintenance>, maintenance::Id>>,
            Ok = Option<Maintenance>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Tenant>, tenant::Id>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        >,
{
    /// Resolves the ID of the [`Tenant`] owning the provided [`Resource`].
    async fn owner_of(
        &self,
        resource: Resource,
    ) -> Result<tenant::Id, Traced<ExecutionError>> {
        use ExecutionError as E;

        let contract_owner = |id: contract::Id| async move {
            self.database()
                .execute(Select(By::<Option<Contract>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(|c| c.map(|c| c.tenant_id))
        };

        let owner = match resource {
            Resource::Tenant(id) => self
                .database()
                .execute(Select(By::<Option<Tenant>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .map(|t| t.id),
            Resource::Contract(id) => contract_owner(id).await?,
            Resource::Installment(id) => {
                match self
                    .database()
                    .execute(Select(By::<Option<Installment>, _>::new(id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                {
                    Some(i) => contract_owner(i.contract_id).await?,
                    None => None,
                }
            }
            Resource::Maintenance(id) => self
                .database()
                .execute(Select(By::<Option<Maintenance>, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .map(|m| m.tenant_id),
        };

        owner
            .ok_or(E::ResourceNotExists(resource))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`AuthorizeAccess`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Access is denied.
    #[display("Access denied: {_0}")]
    Denied(Denial),

    /// [`Resource`] doesn't exist.
    #[display("`{_0}` does not exist")]
    #[from(ignore)]
    ResourceNotExists(#[error(not(source))] Resource),
}
