//! [`Tenant`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{identity, tenant, Tenant},
    infra::{
        database::{
            self,
            memory::{self, state::constraint, Connection},
            Memory,
        },
        Database,
    },
};

impl<C> Database<Select<By<Option<Tenant>, tenant::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Tenant>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Tenant>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.tenants.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Tenant>, identity::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Tenant>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Tenant>, identity::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let identity_id = by.into_inner();
        self.read(|s| {
            s.tenants
                .values()
                .find(|t| t.identity_id == identity_id)
                .cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Tenant>, &tenant::TaxCode>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Tenant>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Tenant>, &tenant::TaxCode>>,
    ) -> Result<Self::Ok, Self::Err> {
        let tax_code = by.into_inner();
        self.read(|s| {
            s.tenants.values().find(|t| &t.tax_code == tax_code).cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Tenant>, ()>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<Tenant>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Tenant>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|s| {
            let mut tenants = s.tenants.values().cloned().collect::<Vec<_>>();
            tenants.sort_by_key(|t| t.created_at);
            tenants
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Tenant>> for Memory<C>
where
    C: Connection,
    Self: Database<Update<Tenant>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(tenant): Insert<Tenant>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(tenant)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Tenant>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(tenant): Update<Tenant>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            for other in s.tenants.values().filter(|t| t.id != tenant.id) {
                if other.identity_id == tenant.identity_id {
                    return Err(memory::Error::UniqueViolation(
                        constraint::TENANT_IDENTITY,
                    ));
                }
                if other.tax_code == tenant.tax_code {
                    return Err(memory::Error::UniqueViolation(
                        constraint::TENANT_TAX_CODE,
                    ));
                }
            }
            drop(s.tenants.insert(tenant.id, tenant));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
