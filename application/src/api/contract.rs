//! [`domain::Contract`] endpoints.

use axum::Json;
use common::{money::Currency, Date, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::{
    auth::{Access, Resource},
    command::{self, Command as _},
    domain::{
        self,
        contract::{self, Frequency},
        property, tenant,
    },
    query,
};

use crate::{
    api::{self, installment::InstallmentView},
    error::{Failure, Kind, PathParams, Payload, Validator},
    AsError, Context, Error,
};

/// Public view of a [`domain::Contract`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractView {
    /// ID of the [`domain::Contract`].
    pub id: contract::Id,

    /// ID of the renting [`domain::Tenant`].
    pub tenant_id: tenant::Id,

    /// ID of the rented [`domain::Property`].
    pub property_id: property::Id,

    /// `YYYY-MM-DD` date the [`domain::Contract`] starts at.
    pub start_date: Date,

    /// `YYYY-MM-DD` date the [`domain::Contract`] ends at (exclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,

    /// Duration in whole years.
    pub duration_years: u16,

    /// Rent to be paid every year.
    pub annual_rent: Decimal,

    /// [`Currency`] of the `annual_rent`.
    pub currency: Currency,

    /// [`Frequency`] of the rent payments.
    pub frequency: Frequency,

    /// Total number of installments.
    pub installment_count: u32,

    /// [RFC 3339] moment the [`domain::Contract`] was created at.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: contract::CreationDateTime,
}

impl From<domain::Contract> for ContractView {
    fn from(c: domain::Contract) -> Self {
        Self {
            id: c.id,
            tenant_id: c.tenant_id,
            property_id: c.property_id,
            start_date: c.start_date,
            end_date: c.end_date(),
            duration_years: c.duration_years,
            annual_rent: c.annual_rent.amount,
            currency: c.annual_rent.currency,
            frequency: c.frequency,
            installment_count: c.installment_count(),
            created_at: c.created_at,
        }
    }
}

/// Created [`domain::Contract`] along with its whole payment schedule.
#[derive(Clone, Debug, Serialize)]
pub struct CreatedContractView {
    /// Created [`domain::Contract`].
    pub contract: ContractView,

    /// Generated [`domain::Installment`]s.
    pub installments: Vec<InstallmentView>,
}

/// Request creating a new [`domain::Contract`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContract {
    /// ID of the renting [`domain::Tenant`].
    pub tenant_id: String,

    /// ID of the rented [`domain::Property`].
    pub property_id: String,

    /// `YYYY-MM-DD` start date.
    pub start_date: String,

    /// Duration in whole years.
    pub duration_years: i64,

    /// Rent to be paid every year.
    pub annual_rent: Decimal,

    /// [`Currency`] of the `annual_rent`.
    #[serde(default = "default_currency")]
    pub currency: Currency,

    /// [`Frequency`] of the rent payments.
    #[serde(default)]
    pub frequency: Option<String>,
}

/// Returns the [`Currency`] assumed when none is provided.
const fn default_currency() -> Currency {
    Currency::Eur
}

impl NewContract {
    /// Validates this [`NewContract`] into a [`command::CreateContract`].
    ///
    /// Non-positive rents and unsupported durations are left for the
    /// payment schedule generation to reject.
    ///
    /// # Errors
    ///
    /// If any field is malformed.
    fn validate(self) -> Result<command::CreateContract, Error> {
        let mut v = Validator::default();
        let tenant_id =
            v.field("tenantId", self.tenant_id.parse::<tenant::Id>());
        let property_id =
            v.field("propertyId", self.property_id.parse::<property::Id>());
        let start_date = v.field("startDate", self.start_date.parse::<Date>());
        let duration_years = v.field(
            "durationYears",
            u16::try_from(self.duration_years).map_err(|_| {
                if self.duration_years < 0 {
                    "must not be negative"
                } else {
                    "is too large"
                }
            }),
        );
        let frequency = v.field(
            "frequency",
            self.frequency
                .map(|f| {
                    f.parse::<Frequency>().map_err(|_| {
                        "must be one of MENSILE, BIMESTRALE, TRIMESTRALE, \
                         SEMESTRALE, ANNUALE"
                    })
                })
                .transpose()
                .map(Option::unwrap_or_default),
        );
        v.finish(|| {
            Some(command::CreateContract {
                tenant_id: tenant_id?,
                property_id: property_id?,
                start_date: start_date?,
                duration_years: duration_years?,
                annual_rent: Money {
                    amount: self.annual_rent,
                    currency: self.currency,
                },
                frequency: frequency?,
            })
        })
    }
}

/// Creates a new [`domain::Contract`] along with its payment schedule.
#[tracing::instrument(skip_all, fields(http.route = "/contracts"))]
pub async fn create(
    ctx: Context,
    body: Result<Payload<NewContract>, Failure>,
) -> Result<Json<CreatedContractView>, Failure> {
    drop(ctx.authenticate(Access::STAFF).await?);
    let Payload(new) = body?;
    let cmd = new.validate().map_err(ctx.error())?;

    ctx.service()
        .execute(cmd)
        .await
        .map(|out| {
            Json(CreatedContractView {
                contract: out.contract.into(),
                installments: out
                    .installments
                    .into_iter()
                    .map(Into::into)
                    .collect(),
            })
        })
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

/// Returns a single [`domain::Contract`] the caller may act upon.
#[tracing::instrument(skip_all, fields(http.route = "/contracts/:id"))]
pub async fn get(
    ctx: Context,
    id: Result<PathParams<contract::Id>, Failure>,
) -> Result<Json<ContractView>, Failure> {
    let principal = ctx.authenticate(Access::Authenticated).await?;
    let PathParams(id) = id?;
    ctx.authorize_resource(&principal, Resource::Contract(id)).await?;

    ctx.service()
        .execute(query::contract::ById::by(id))
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())?
        .map(|c| Json(c.into()))
        .ok_or_else(|| ctx.error()(api::NotFound::Contract.into()))
}

/// Lists [`domain::Contract`]s of a [`domain::Tenant`] the caller may act
/// upon.
#[tracing::instrument(
    skip_all,
    fields(http.route = "/tenants/:id/contracts"),
)]
pub async fn list_by_tenant(
    ctx: Context,
    id: Result<PathParams<tenant::Id>, Failure>,
) -> Result<Json<Vec<ContractView>>, Failure> {
    let principal = ctx.authenticate(Access::Authenticated).await?;
    let PathParams(id) = id?;
    ctx.authorize_resource(&principal, Resource::Tenant(id)).await?;

    ctx.service()
        .execute(query::contracts::ByTenantId::by(id))
        .await
        .map(|cs| Json(cs.into_iter().map(Into::into).collect()))
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

impl AsError for command::create_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => Some(api::NotFound::Property.into()),
            Self::Schedule(e) => Some(Error::new(
                Kind::BusinessRuleViolated,
                e.to_string(),
            )),
            Self::TenantNotExists(_) => Some(api::NotFound::Tenant.into()),
        }
    }
}
