//! [`Installment`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{contract, installment, Installment},
    infra::{
        database::{
            self,
            memory::{self, state::constraint, Connection},
            Memory,
        },
        Database,
    },
};

impl<C> Database<Select<By<Option<Installment>, installment::Id>>>
    for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Installment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Installment>, installment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.installments.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Installment>, contract::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<Installment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Installment>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let contract_id = by.into_inner();
        self.read(|s| {
            let mut installments = s
                .installments
                .values()
                .filter(|i| i.contract_id == contract_id)
                .cloned()
                .collect::<Vec<_>>();
            installments.sort_by_key(|i| i.number);
            installments
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Vec<Installment>>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(installments): Insert<Vec<Installment>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            let taken = |i: &Installment, stored: &Installment| {
                i.id != stored.id
                    && i.contract_id == stored.contract_id
                    && i.number == stored.number
            };
            for (n, i) in installments.iter().enumerate() {
                if s.installments.values().any(|stored| taken(i, stored))
                    || installments[..n].iter().any(|prev| taken(i, prev))
                {
                    return Err(memory::Error::UniqueViolation(
                        constraint::INSTALLMENT_NUMBER,
                    ));
                }
            }
            s.installments.extend(installments.into_iter().map(|i| (i.id, i)));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Installment>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(installment): Update<Installment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            drop(s.installments.insert(installment.id, installment));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
