//! [`Command`] for creating a new [`Tenant`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{identity, tenant, Identity, Tenant},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Tenant`] profile of an existing
/// [`Identity`].
#[derive(Clone, Debug)]
pub struct CreateTenant {
    /// ID of the [`Identity`] to link a new [`Tenant`] to.
    pub identity_id: identity::Id,

    /// [`tenant::TaxCode`] of a new [`Tenant`].
    pub tax_code: tenant::TaxCode,

    /// First [`tenant::Name`] of a new [`Tenant`].
    pub first_name: tenant::Name,

    /// Last [`tenant::Name`] of a new [`Tenant`].
    pub last_name: tenant::Name,

    /// Contact [`identity::Email`] of a new [`Tenant`].
    pub email: Option<identity::Email>,

    /// [`tenant::Phone`] of a new [`Tenant`].
    pub phone: Option<tenant::Phone>,
}

impl<Db> Command<CreateTenant> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Identity>, identity::Id>>,
            Ok = Option<Identity>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Tenant>, identity::Id>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        > + for<'l> Database<
            Select<By<Option<Tenant>, &'l tenant::TaxCode>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        > + Database<Insert<Tenant>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Tenant;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateTenant) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateTenant {
            identity_id,
            tax_code,
            first_name,
            last_name,
            email,
            phone,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Select(By::<Option<Identity>, _>::new(identity_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::IdentityNotExists(identity_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let linked = tx
            .execute(Select(By::<Option<Tenant>, _>::new(identity_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if linked.is_some() {
            return Err(tracerr::new!(E::IdentityAlreadyLinked(identity_id)));
        }

        let occupied = tx
            .execute(Select(By::<Option<Tenant>, _>::new(&tax_code)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if occupied.is_some() {
            return Err(tracerr::new!(E::TaxCodeOccupied(tax_code)));
        }

        let tenant = Tenant {
            id: tenant::Id::new(),
            identity_id,
            tax_code,
            first_name,
            last_name,
            email,
            phone,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(tenant.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            tenant.id = %tenant.id,
            identity.id = %identity_id,
            "`Tenant` created",
        );

        Ok(tenant)
    }
}

/// Error of [`CreateTenant`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Identity`] is already linked to another [`Tenant`].
    #[display("`Identity(id: {_0})` already has a `Tenant`")]
    #[from(ignore)]
    IdentityAlreadyLinked(#[error(not(source))] identity::Id),

    /// [`Identity`] doesn't exist.
    #[display("`Identity(id: {_0})` does not exist")]
    #[from(ignore)]
    IdentityNotExists(#[error(not(source))] identity::Id),

    /// [`tenant::TaxCode`] is already occupied.
    #[display("`{_0}` tax code is occupied")]
    #[from(ignore)]
    TaxCodeOccupied(#[error(not(source))] tenant::TaxCode),
}
