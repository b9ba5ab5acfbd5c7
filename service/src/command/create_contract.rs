//! [`Command`] for creating a new [`Contract`] along with its payment
//! schedule.

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Date, DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::contract::schedule::generate;
use crate::{
    domain::{
        contract::{self, schedule, Frequency},
        property, tenant, Contract, Installment, Property, Tenant,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Contract`].
///
/// The whole schedule of [`Installment`]s is [`generate`]d once and persisted
/// atomically with the [`Contract`] itself.
#[derive(Clone, Copy, Debug)]
pub struct CreateContract {
    /// ID of the [`Tenant`] renting the [`Property`].
    pub tenant_id: tenant::Id,

    /// ID of the [`Property`] being rented.
    pub property_id: property::Id,

    /// [`Date`] a new [`Contract`] starts at.
    pub start_date: Date,

    /// Duration of a new [`Contract`] in whole years.
    pub duration_years: u16,

    /// Rent to be paid every year.
    pub annual_rent: Money,

    /// [`Frequency`] of the rent payments.
    pub frequency: Frequency,
}

/// Output of [`CreateContract`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Created [`Contract`].
    pub contract: Contract,

    /// [`Installment`]s of the created [`Contract`], ordered by their
    /// numbers.
    pub installments: Vec<Installment>,
}

impl<Db> Command<CreateContract> for Service<Db>
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
        > + Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Insert<Vec<Installment>>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            tenant_id,
            property_id,
            start_date,
            duration_years,
            annual_rent,
            frequency,
        } = cmd;

        let drafts =
            schedule::generate(start_date, duration_years, annual_rent, frequency)
                .map_err(tracerr::from_and_wrap!(=> E))?;

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

        let contract = Contract {
            id: contract::Id::new(),
            tenant_id,
            property_id,
            start_date,
            duration_years,
            annual_rent,
            frequency,
            created_at: DateTime::now().coerce(),
        };
        let installments = drafts
            .into_iter()
            .map(|d| Installment::from_draft(contract.id, d))
            .collect::<Vec<_>>();

        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(installments.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            contract.id = %contract.id,
            tenant.id = %tenant_id,
            property.id = %property_id,
            installments = installments.len(),
            "`Contract` created",
        );

        Ok(Output {
            contract,
            installments,
        })
    }
}

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Property`] doesn't exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// Payment schedule cannot be generated.
    #[display("Invalid payment schedule: {_0}")]
    Schedule(schedule::Error),

    /// [`Tenant`] doesn't exist.
    #[display("`Tenant(id: {_0})` does not exist")]
    #[from(ignore)]
    TenantNotExists(#[error(not(source))] tenant::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        money::Currency,
        operations::{By, Select},
        Date, Money,
    };
    use rust_decimal::Decimal;

    use crate::{
        command::{fixture, CreateContract},
        domain::{
            contract::{schedule, Frequency},
            installment, property, tenant, Contract, Installment,
        },
        infra::Database as _,
        Command as _,
    };

    use super::ExecutionError;

    fn eur(amount: i64) -> Money {
        Money {
            amount: Decimal::from(amount),
            currency: Currency::Eur,
        }
    }

    #[tokio::test]
    async fn persists_full_schedule() {
        let service = fixture::service();
        let tenant =
            fixture::tenant(&service, "mario@example.it", "12345678901").await;
        let property = fixture::property(&service, "Via Roma 1").await;

        let output = service
            .execute(CreateContract {
                tenant_id: tenant.id,
                property_id: property.id,
                start_date: Date::from_calendar(2024, 1, 31).unwrap(),
                duration_years: 2,
                annual_rent: eur(1000),
                frequency: Frequency::Monthly,
            })
            .await
            .unwrap();

        let stored = service
            .database()
            .execute(Select(By::<Vec<Installment>, _>::new(output.contract.id)))
            .await
            .unwrap();
        assert_eq!(stored.len(), 24);
        assert_eq!(
            stored.iter().map(|i| i.number).collect::<Vec<_>>(),
            (1..=24)
                .map(|n| installment::Number::new(n).unwrap())
                .collect::<Vec<_>>(),
        );
        assert!(stored.iter().all(|i| !i.is_paid()));
        assert_eq!(
            stored[1].due_date,
            Date::from_calendar(2024, 2, 29).unwrap(),
        );
        assert_eq!(stored[0].amount.amount, "83.33".parse().unwrap());
    }

    #[tokio::test]
    async fn schedule_failure_persists_nothing() {
        let service = fixture::service();
        let tenant =
            fixture::tenant(&service, "mario@example.it", "12345678901").await;
        let property = fixture::property(&service, "Via Roma 1").await;

        let zero_rent = service
            .execute(CreateContract {
                tenant_id: tenant.id,
                property_id: property.id,
                start_date: Date::from_calendar(2024, 1, 15).unwrap(),
                duration_years: 1,
                annual_rent: eur(0),
                frequency: Frequency::Quarterly,
            })
            .await
            .unwrap_err();
        let too_long = service
            .execute(CreateContract {
                tenant_id: tenant.id,
                property_id: property.id,
                start_date: Date::from_calendar(2024, 1, 15).unwrap(),
                duration_years: 100,
                annual_rent: eur(1200),
                frequency: Frequency::Quarterly,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            zero_rent.as_ref(),
            ExecutionError::Schedule(schedule::Error::NonPositiveAmount(_)),
        ));
        assert!(matches!(
            too_long.as_ref(),
            ExecutionError::Schedule(schedule::Error::DurationTooLong(100)),
        ));
        assert!(service
            .database()
            .execute(Select(By::<Vec<Contract>, _>::new(tenant.id)))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn requires_existing_parties() {
        let service = fixture::service();
        let tenant =
            fixture::tenant(&service, "mario@example.it", "12345678901").await;
        let property = fixture::property(&service, "Via Roma 1").await;
        let cmd = CreateContract {
            tenant_id: tenant.id,
            property_id: property.id,
            start_date: Date::from_calendar(2024, 1, 15).unwrap(),
            duration_years: 1,
            annual_rent: eur(1200),
            frequency: Frequency::default(),
        };

        let no_tenant = service
            .execute(CreateContract {
                tenant_id: tenant::Id::new(),
                ..cmd
            })
            .await
            .unwrap_err();
        let no_property = service
            .execute(CreateContract {
                property_id: property::Id::new(),
                ..cmd
            })
            .await
            .unwrap_err();

        assert!(matches!(
            no_tenant.as_ref(),
            ExecutionError::TenantNotExists(_),
        ));
        assert!(matches!(
            no_property.as_ref(),
            ExecutionError::PropertyNotExists(_),
        ));
        assert!(service
            .database()
            .execute(Select(By::<Vec<Contract>, _>::new(tenant.id)))
            .await
            .unwrap()
            .is_empty());
    }
}
