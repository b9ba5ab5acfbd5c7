//! [`Identity`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{identity, Identity},
    infra::{
        database::{
            self,
            memory::{self, state::constraint, Connection},
            Memory,
        },
        Database,
    },
};

impl<C> Database<Select<By<Option<Identity>, identity::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Identity>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Identity>, identity::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.identities.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Identity>, &identity::Email>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Identity>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Identity>, &identity::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        self.read(|s| {
            s.identities.values().find(|i| &i.email == email).cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Identity>> for Memory<C>
where
    C: Connection,
    Self: Database<Update<Identity>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(identity): Insert<Identity>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(identity))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Identity>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(identity): Update<Identity>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            if s.identities
                .values()
                .any(|i| i.id != identity.id && i.email == identity.email)
            {
                return Err(memory::Error::UniqueViolation(
                    constraint::IDENTITY_EMAIL,
                ));
            }
            drop(s.identities.insert(identity.id, identity));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
