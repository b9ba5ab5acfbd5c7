//! [`Command`] for creating a new [`Property`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::property::{Address, City, Surface, Variant};
use crate::{
    domain::{property, Property},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Property`].
#[derive(Clone, Debug)]
pub struct CreateProperty {
    /// [`Address`] of a new [`Property`].
    pub address: property::Address,

    /// [`City`] of a new [`Property`].
    pub city: property::City,

    /// [`Surface`] of a new [`Property`].
    pub surface: property::Surface,

    /// [`Variant`] of a new [`Property`].
    pub variant: property::Variant,
}

impl<Db> Command<CreateProperty> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Property>, property::Hash>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Insert<Property>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProperty {
            address,
            city,
            surface,
            variant,
        } = cmd;

        let hash = property::Hash::new(&address, &city, variant.kind());

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let existing = tx
            .execute(Select(By::new(hash)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(property) = existing {
            return Err(tracerr::new!(E::PropertyDuplicated(property.id)));
        }

        let property = Property {
            id: property::Id::new(),
            hash,
            address,
            city,
            surface,
            variant,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            property.id = %property.id,
            kind = %property.kind(),
            "`Property` created",
        );

        Ok(property)
    }
}

/// Error of [`CreateProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// The same [`Property`] is registered already.
    #[display("`Property(id: {_0})` with the same address is registered")]
    #[from(ignore)]
    PropertyDuplicated(#[error(not(source))] property::Id),
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::{
        command::{fixture, CreateProperty},
        domain::property,
        Command as _,
    };

    use super::ExecutionError;

    #[tokio::test]
    async fn rejects_same_location_of_same_kind() {
        let service = fixture::service();
        let existing = fixture::property(&service, "Via Roma 1").await;

        let err = service
            .execute(CreateProperty {
                address: property::Address::new("VIA ROMA 1").unwrap(),
                city: property::City::new("milano").unwrap(),
                surface: property::Surface::new(Decimal::from(95)).unwrap(),
                variant: property::Variant::Residential { floor: 0, rooms: 4 },
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PropertyDuplicated(id) if *id == existing.id,
        ));
    }

    #[tokio::test]
    async fn allows_another_kind_at_same_location() {
        let service = fixture::service();
        let residential = fixture::property(&service, "Via Roma 1").await;

        let office = service
            .execute(CreateProperty {
                address: property::Address::new("Via Roma 1").unwrap(),
                city: property::City::new("Milano").unwrap(),
                surface: property::Surface::new(Decimal::from(40)).unwrap(),
                variant: property::Variant::Office {
                    workstations: 6,
                    meeting_rooms: 1,
                },
            })
            .await
            .unwrap();

        assert_ne!(office.id, residential.id);
        assert_eq!(office.kind(), property::Kind::Office);
    }
}
