//! [`Contract`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{contract, tenant, Contract},
    infra::{
        database::{self, memory::Connection, Memory},
        Database,
    },
};

impl<C> Database<Select<By<Option<Contract>, contract::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.contracts.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Contract>, tenant::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let tenant_id = by.into_inner();
        self.read(|s| {
            let mut contracts = s
                .contracts
                .values()
                .filter(|c| c.tenant_id == tenant_id)
                .cloned()
                .collect::<Vec<_>>();
            contracts.sort_by_key(|c| (c.start_date, c.created_at));
            contracts
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Contract>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            drop(s.contracts.insert(contract.id, contract));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
