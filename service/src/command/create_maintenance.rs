//! [`Command`] for requesting a new [`Maintenance`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::maintenance::Description;
use crate::{
    domain::{maintenance, property, tenant, Maintenance, Property, Tenant},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for requesting a new [`Maintenance`] of a [`Property`].
#[derive(Clone, Debug)]
pub struct CreateMaintenance {
    /// ID of the [`Tenant`] requesting a new [`Maintenance`].
    pub tenant_id: tenant::Id,

    /// ID of the [`Property`] to be maintained.
    pub property_id: property::Id,

    /// [`Description`] of the requested work.
    pub description: maintenance::Description,
}

impl<Db> Command<CreateMaintenance> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Tenant>, tenant::Id>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<Insert<Maintenance>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Maintenance;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateMaintenance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateMaintenance {
            tenant_id,
            property_id,
            description,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Select(By::<Option<Tenant>, _>::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TenantNotExists(tenant_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;
        tx.execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let maintenance = Maintenance {
            id: maintenance::Id::new(),
            tenant_id,
            property_id,
            description,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(maintenance.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            maintenance.id = %maintenance.id,
            tenant.id = %tenant_id,
            property.id = %property_id,
            "`Maintenance` requested",
        );

        Ok(maintenance)
    }
}

/// Error of [`CreateMaintenance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Property`] doesn't exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`Tenant`] doesn't exist.
    #[display("`Tenant(id: {_0})` does not exist")]
    #[from(ignore)]
    TenantNotExists(#[error(not(source))] tenant::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        command::{fixture, CreateMaintenance},
        domain::{maintenance, property, Maintenance},
        infra::Database as _,
        Command as _,
    };

    use super::ExecutionError;

    #[tokio::test]
    async fn lists_requests_of_tenant() {
        let service = fixture::service();
        let tenant =
            fixture::tenant(&service, "mario@example.it", "12345678901").await;
        let property = fixture::property(&service, "Via Roma 1").await;

        let created = service
            .execute(CreateMaintenance {
                tenant_id: tenant.id,
                property_id: property.id,
                description: "Leaking boiler".parse().unwrap(),
            })
            .await
            .unwrap();

        let listed = service
            .database()
            .execute(Select(By::<Vec<Maintenance>, _>::new(tenant.id)))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].description.as_ref(), "Leaking boiler");
    }

    #[tokio::test]
    async fn requires_existing_property() {
        let service = fixture::service();
        let tenant =
            fixture::tenant(&service, "mario@example.it", "12345678901").await;

        let err = service
            .execute(CreateMaintenance {
                tenant_id: tenant.id,
                property_id: property::Id::new(),
                description: maintenance::Description::new("Broken window")
                    .unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::PropertyNotExists(_)));
    }
}
