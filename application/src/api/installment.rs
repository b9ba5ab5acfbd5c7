//! [`domain::Installment`] endpoints.

use axum::Json;
use common::money::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::{
    auth::{Access, Resource},
    command::{self, Command as _},
    domain::{self, contract, installment},
    query,
};

use crate::{
    api,
    define_error,
    error::{Failure, PathParams, QueryParams},
    AsError, Context, Error,
};

/// Public view of an [`domain::Installment`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentView {
    /// ID of the [`domain::Installment`].
    pub id: installment::Id,

    /// ID of the [`domain::Contract`] the [`domain::Installment`] belongs
    /// to.
    pub contract_id: contract::Id,

    /// 1-based sequence number within the [`domain::Contract`].
    pub number: installment::Number,

    /// `YYYY-MM-DD` date the [`domain::Installment`] is due at.
    pub due_date: common::Date,

    /// Amount to be paid.
    pub amount: Decimal,

    /// [`Currency`] of the `amount`.
    pub currency: Currency,

    /// Paid flag.
    pub paid: PaidFlag,

    /// [RFC 3339] moment the [`domain::Installment`] was paid at, if it was.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
}

impl InstallmentView {
    /// Creates a new [`InstallmentView`], projecting its paid flag into a
    /// boolean if `paid_as_boolean` is set.
    #[must_use]
    pub fn new(i: domain::Installment, paid_as_boolean: bool) -> Self {
        Self {
            id: i.id,
            contract_id: i.contract_id,
            number: i.number,
            due_date: i.due_date,
            amount: i.amount.amount,
            currency: i.amount.currency,
            paid: if paid_as_boolean {
                PaidFlag::Boolean(i.status.is_paid())
            } else {
                PaidFlag::Code(i.status)
            },
            paid_at: i.paid_at.map(|at| at.to_rfc3339()),
        }
    }
}

impl From<domain::Installment> for InstallmentView {
    fn from(i: domain::Installment) -> Self {
        Self::new(i, false)
    }
}

/// Paid flag of an [`InstallmentView`].
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(untagged)]
pub enum PaidFlag {
    /// Single-character `S`/`N` code.
    Code(installment::Status),

    /// Boolean projection of the code.
    Boolean(bool),
}

/// Query parameters of [`list_by_contract()`].
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListParams {
    /// Indicator whether the paid flag should be rendered as a boolean.
    pub paid_as_boolean: bool,
}

/// Lists [`domain::Installment`]s of a [`domain::Contract`] ordered by their
/// sequence numbers.
#[tracing::instrument(
    skip_all,
    fields(http.route = "/contracts/:id/installments"),
)]
pub async fn list_by_contract(
    ctx: Context,
    id: Result<PathParams<contract::Id>, Failure>,
    params: Result<QueryParams<ListParams>, Failure>,
) -> Result<Json<Vec<InstallmentView>>, Failure> {
    let principal = ctx.authenticate(Access::Authenticated).await?;
    let PathParams(id) = id?;
    let QueryParams(ListParams { paid_as_boolean }) = params?;
    ctx.authorize_resource(&principal, Resource::Contract(id)).await?;

    // Distinguishes an unknown contract from one without installments.
    ctx.service()
        .execute(query::contract::ById::by(id))
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())?
        .ok_or_else(|| ctx.error()(api::NotFound::Contract.into()))?;

    ctx.service()
        .execute(query::installments::ByContractId::by(id))
        .await
        .map(|is| {
            Json(
                is.into_iter()
                    .map(|i| InstallmentView::new(i, paid_as_boolean))
                    .collect(),
            )
        })
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

/// Marks an [`domain::Installment`] as paid.
#[tracing::instrument(skip_all, fields(http.route = "/installments/:id/pay"))]
pub async fn pay(
    ctx: Context,
    id: Result<PathParams<installment::Id>, Failure>,
) -> Result<Json<InstallmentView>, Failure> {
    drop(ctx.authenticate(Access::STAFF).await?);
    let PathParams(installment_id) = id?;

    ctx.service()
        .execute(command::PayInstallment { installment_id })
        .await
        .map(|i| Json(i.into()))
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

impl AsError for command::pay_installment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[kind = BusinessRuleViolated]
                #[message = "installment is already paid"]
                AlreadyPaid,
            }
        }

        match self {
            Self::AlreadyPaid(_) => Some(Error::AlreadyPaid.into()),
            Self::Db(e) => e.try_as_error(),
            Self::InstallmentNotExists(_) => {
                Some(api::NotFound::Installment.into())
            }
        }
    }
}
