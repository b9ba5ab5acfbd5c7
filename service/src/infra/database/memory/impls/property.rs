//! [`Property`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{property, Property},
    infra::{
        database::{
            self,
            memory::{self, state::constraint, Connection},
            Memory,
        },
        Database,
    },
};

impl<C> Database<Select<By<Option<Property>, property::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.properties.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Property>, property::Hash>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Hash>>,
    ) -> Result<Self::Ok, Self::Err> {
        let hash = by.into_inner();
        self.read(|s| s.properties.values().find(|p| p.hash == hash).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Property>, ()>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Property>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|s| {
            let mut properties =
                s.properties.values().cloned().collect::<Vec<_>>();
            properties.sort_by_key(|p| p.created_at);
            properties
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Property>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            if s.properties.values().any(|p| p.hash == property.hash) {
                return Err(memory::Error::UniqueViolation(
                    constraint::PROPERTY_HASH,
                ));
            }
            drop(s.properties.insert(property.id, property));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
