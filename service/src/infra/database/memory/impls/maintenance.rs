//! [`Maintenance`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{maintenance, tenant, Maintenance},
    infra::{
        database::{self, memory::Connection, Memory},
        Database,
    },
};

impl<C> Database<Select<By<Option<Maintenance>, maintenance::Id>>>
    for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Maintenance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Maintenance>, maintenance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.maintenance.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Maintenance>, tenant::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<Maintenance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Maintenance>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let tenant_id = by.into_inner();
        self.read(|s| {
            let mut requests = s
                .maintenance
                .values()
                .filter(|m| m.tenant_id == tenant_id)
                .cloned()
                .collect::<Vec<_>>();
            requests.sort_by_key(|m| m.created_at);
            requests
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Maintenance>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(maintenance): Insert<Maintenance>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            drop(s.maintenance.insert(maintenance.id, maintenance));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
