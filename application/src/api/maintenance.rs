//! [`domain::Maintenance`] endpoints.

use axum::Json;
use serde::{Deserialize, Serialize};
use service::{
    auth::{Access, Resource},
    command::{self, Command as _},
    domain::{self, maintenance, property, tenant},
    query,
};

use crate::{
    api,
    error::{Failure, PathParams, Payload, Validator},
    AsError, Context, Error,
};

/// Public view of a [`domain::Maintenance`] request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceView {
    /// ID of the [`domain::Maintenance`].
    pub id: maintenance::Id,

    /// ID of the requesting [`domain::Tenant`].
    pub tenant_id: tenant::Id,

    /// ID of the [`domain::Property`] to be serviced.
    pub property_id: property::Id,

    /// What has to be done.
    pub description: String,

    /// [RFC 3339] moment the [`domain::Maintenance`] was requested at.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: maintenance::CreationDateTime,
}

impl From<domain::Maintenance> for MaintenanceView {
    fn from(m: domain::Maintenance) -> Self {
        Self {
            id: m.id,
            tenant_id: m.tenant_id,
            property_id: m.property_id,
            description: m.description.to_string(),
            created_at: m.created_at,
        }
    }
}

/// Request creating a new [`domain::Maintenance`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMaintenance {
    /// ID of the requesting [`domain::Tenant`].
    pub tenant_id: String,

    /// ID of the [`domain::Property`] to be serviced.
    pub property_id: String,

    /// What has to be done.
    pub description: String,
}

impl NewMaintenance {
    /// Validates this [`NewMaintenance`] into a
    /// [`command::CreateMaintenance`].
    ///
    /// # Errors
    ///
    /// If any field is malformed.
    fn validate(self) -> Result<command::CreateMaintenance, Error> {
        let mut v = Validator::default();
        let tenant_id =
            v.field("tenantId", self.tenant_id.parse::<tenant::Id>());
        let property_id =
            v.field("propertyId", self.property_id.parse::<property::Id>());
        let description = v.field(
            "description",
            self.description.parse::<maintenance::Description>(),
        );
        v.finish(|| {
            Some(command::CreateMaintenance {
                tenant_id: tenant_id?,
                property_id: property_id?,
                description: description?,
            })
        })
    }
}

/// Requests a new [`domain::Maintenance`] on behalf of a
/// [`domain::Tenant`] the caller may act upon.
#[tracing::instrument(skip_all, fields(http.route = "/maintenance"))]
pub async fn create(
    ctx: Context,
    body: Result<Payload<NewMaintenance>, Failure>,
) -> Result<Json<MaintenanceView>, Failure> {
    let principal = ctx.authenticate(Access::Authenticated).await?;
    let Payload(new) = body?;
    let cmd = new.validate().map_err(ctx.error())?;
    ctx.authorize_resource(&principal, Resource::Tenant(cmd.tenant_id))
        .await?;

    ctx.service()
        .execute(cmd)
        .await
        .map(|m| Json(m.into()))
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

/// Returns a single [`domain::Maintenance`] request the caller may act upon.
#[tracing::instrument(skip_all, fields(http.route = "/maintenance/:id"))]
pub async fn get(
    ctx: Context,
    id: Result<PathParams<maintenance::Id>, Failure>,
) -> Result<Json<MaintenanceView>, Failure> {
    let principal = ctx.authenticate(Access::Authenticated).await?;
    let PathParams(id) = id?;
    ctx.authorize_resource(&principal, Resource::Maintenance(id)).await?;

    ctx.service()
        .execute(query::maintenance::ById::by(id))
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())?
        .map(|m| Json(m.into()))
        .ok_or_else(|| ctx.error()(api::NotFound::Maintenance.into()))
}

/// Lists [`domain::Maintenance`] requests of a [`domain::Tenant`] the
/// caller may act upon.
#[tracing::instrument(
    skip_all,
    fields(http.route = "/tenants/:id/maintenance"),
)]
pub async fn list_by_tenant(
    ctx: Context,
    id: Result<PathParams<tenant::Id>, Failure>,
) -> Result<Json<Vec<MaintenanceView>>, Failure> {
    let principal = ctx.authenticate(Access::Authenticated).await?;
    let PathParams(id) = id?;
    ctx.authorize_resource(&principal, Resource::Tenant(id)).await?;

    ctx.service()
        .execute(query::maintenance::ByTenantId::by(id))
        .await
        .map(|ms| Json(ms.into_iter().map(Into::into).collect()))
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

impl AsError for command::create_maintenance::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyNotExists(_) => Some(api::NotFound::Property.into()),
            Self::TenantNotExists(_) => Some(api::NotFound::Tenant.into()),
        }
    }
}
