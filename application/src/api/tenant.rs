//! [`domain::Tenant`] endpoints.

use axum::Json;
use serde::{Deserialize, Serialize};
use service::{
    auth::{Access, Resource},
    command::{self, Command as _},
    domain::{
        self,
        identity::{self, Email},
        tenant,
    },
    query,
};

use crate::{
    api,
    define_error,
    error::{Failure, PathParams, Payload, Validator},
    AsError, Context, Error,
};

/// Public view of a [`domain::Tenant`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantView {
    /// ID of the [`domain::Tenant`].
    pub id: tenant::Id,

    /// ID of the [`domain::Identity`] owning the [`domain::Tenant`].
    pub identity_id: identity::Id,

    /// Fiscal code or VAT number.
    pub tax_code: String,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Contact email, if any.
    pub email: Option<Email>,

    /// Contact phone, if any.
    pub phone: Option<String>,

    /// [RFC 3339] moment the [`domain::Tenant`] was created at.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: tenant::CreationDateTime,
}

impl From<domain::Tenant> for TenantView {
    fn from(t: domain::Tenant) -> Self {
        Self {
            id: t.id,
            identity_id: t.identity_id,
            tax_code: t.tax_code.to_string(),
            first_name: t.first_name.to_string(),
            last_name: t.last_name.to_string(),
            email: t.email,
            phone: t.phone.map(|p| p.to_string()),
            created_at: t.created_at,
        }
    }
}

/// Request registering a new [`domain::Tenant`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    /// ID of the [`domain::Identity`] to link.
    pub identity_id: String,

    /// Fiscal code or VAT number.
    pub tax_code: String,

    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,

    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
}

impl NewTenant {
    /// Validates this [`NewTenant`] into a [`command::CreateTenant`].
    ///
    /// # Errors
    ///
    /// If any field is malformed.
    fn validate(self) -> Result<command::CreateTenant, Error> {
        let mut v = Validator::default();
        let identity_id =
            v.field("identityId", self.identity_id.parse::<identity::Id>());
        let tax_code =
            v.field("taxCode", self.tax_code.parse::<tenant::TaxCode>());
        let first_name =
            v.field("firstName", self.first_name.parse::<tenant::Name>());
        let last_name =
            v.field("lastName", self.last_name.parse::<tenant::Name>());
        let email = v.field(
            "email",
            self.email.map(|e| e.parse::<Email>()).transpose(),
        );
        let phone = v.field(
            "phone",
            self.phone.map(|p| p.parse::<tenant::Phone>()).transpose(),
        );
        v.finish(|| {
            Some(command::CreateTenant {
                identity_id: identity_id?,
                tax_code: tax_code?,
                first_name: first_name?,
                last_name: last_name?,
                email: email?,
                phone: phone?,
            })
        })
    }
}

/// Registers a new [`domain::Tenant`].
#[tracing::instrument(skip_all, fields(http.route = "/tenants"))]
pub async fn create(
    ctx: Context,
    body: Result<Payload<NewTenant>, Failure>,
) -> Result<Json<TenantView>, Failure> {
    drop(ctx.authenticate(Access::STAFF).await?);
    let Payload(new) = body?;
    let cmd = new.validate().map_err(ctx.error())?;

    ctx.service()
        .execute(cmd)
        .await
        .map(|t| Json(t.into()))
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

/// Lists all the registered [`domain::Tenant`]s.
#[tracing::instrument(skip_all, fields(http.route = "/tenants"))]
pub async fn list(ctx: Context) -> Result<Json<Vec<TenantView>>, Failure> {
    drop(ctx.authenticate(Access::STAFF).await?);

    ctx.service()
        .execute(query::tenants::All::by(()))
        .await
        .map(|ts| Json(ts.into_iter().map(Into::into).collect()))
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

/// Returns a single [`domain::Tenant`] the caller may act upon.
#[tracing::instrument(skip_all, fields(http.route = "/tenants/:id"))]
pub async fn get(
    ctx: Context,
    id: Result<PathParams<tenant::Id>, Failure>,
) -> Result<Json<TenantView>, Failure> {
    let principal = ctx.authenticate(Access::Authenticated).await?;
    let PathParams(id) = id?;
    ctx.authorize_resource(&principal, Resource::Tenant(id)).await?;

    ctx.service()
        .execute(query::tenant::ById::by(id))
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())?
        .map(|t| Json(t.into()))
        .ok_or_else(|| ctx.error()(api::NotFound::Tenant.into()))
}

impl AsError for command::create_tenant::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[kind = BusinessRuleViolated]
                #[message = "identity is already linked to a tenant"]
                IdentityAlreadyLinked,

                #[kind = BusinessRuleViolated]
                #[message = "tax code is occupied"]
                TaxCodeOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::IdentityAlreadyLinked(_) => {
                Some(Error::IdentityAlreadyLinked.into())
            }
            Self::IdentityNotExists(_) => Some(api::NotFound::Identity.into()),
            Self::TaxCodeOccupied(_) => Some(Error::TaxCodeOccupied.into()),
        }
    }
}
