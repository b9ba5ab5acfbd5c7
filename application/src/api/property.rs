//! [`domain::Property`] endpoints.

use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::{
    auth::Access,
    command::{self, Command as _},
    domain::{self, property},
    query,
};

use crate::{
    api,
    define_error,
    error::{Failure, PathParams, Payload, Validator},
    AsError, Context, Error,
};

/// Public view of a [`domain::Property`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyView {
    /// ID of the [`domain::Property`].
    pub id: property::Id,

    /// Street address of the [`domain::Property`].
    pub address: String,

    /// City of the [`domain::Property`].
    pub city: String,

    /// Surface area in square meters.
    pub surface: property::Surface,

    /// Kind-specific payload, tagged by `kind`.
    #[serde(flatten)]
    pub variant: property::Variant,

    /// [RFC 3339] moment the [`domain::Property`] was created at.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: property::CreationDateTime,
}

impl From<domain::Property> for PropertyView {
    fn from(p: domain::Property) -> Self {
        Self {
            id: p.id,
            address: p.address.to_string(),
            city: p.city.to_string(),
            surface: p.surface,
            variant: p.variant,
            created_at: p.created_at,
        }
    }
}

/// Request registering a new [`domain::Property`].
#[derive(Clone, Debug, Deserialize)]
pub struct NewProperty {
    /// Street address.
    pub address: String,

    /// City.
    pub city: String,

    /// Surface area in square meters.
    pub surface: Decimal,

    /// Kind-specific payload, tagged by `kind`.
    #[serde(flatten)]
    pub variant: property::Variant,
}

impl NewProperty {
    /// Validates this [`NewProperty`] into a [`command::CreateProperty`].
    ///
    /// # Errors
    ///
    /// If any field is malformed.
    fn validate(self) -> Result<command::CreateProperty, Error> {
        let mut v = Validator::default();
        let address =
            v.field("address", self.address.parse::<property::Address>());
        let city = v.field("city", self.city.parse::<property::City>());
        let surface =
            v.field("surface", property::Surface::try_from(self.surface));
        v.finish(|| {
            Some(command::CreateProperty {
                address: address?,
                city: city?,
                surface: surface?,
                variant: self.variant,
            })
        })
    }
}

/// Registers a new [`domain::Property`].
#[tracing::instrument(skip_all, fields(http.route = "/properties"))]
pub async fn create(
    ctx: Context,
    body: Result<Payload<NewProperty>, Failure>,
) -> Result<Json<PropertyView>, Failure> {
    drop(ctx.authenticate(Access::STAFF).await?);
    let Payload(new) = body?;
    let cmd = new.validate().map_err(ctx.error())?;

    ctx.service()
        .execute(cmd)
        .await
        .map(|p| Json(p.into()))
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

/// Lists all the registered [`domain::Property`]s.
#[tracing::instrument(skip_all, fields(http.route = "/properties"))]
pub async fn list(ctx: Context) -> Result<Json<Vec<PropertyView>>, Failure> {
    drop(ctx.authenticate(Access::Authenticated).await?);

    ctx.service()
        .execute(query::properties::All::by(()))
        .await
        .map(|ps| Json(ps.into_iter().map(Into::into).collect()))
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

/// Returns a single [`domain::Property`].
#[tracing::instrument(skip_all, fields(http.route = "/properties/:id"))]
pub async fn get(
    ctx: Context,
    id: Result<PathParams<property::Id>, Failure>,
) -> Result<Json<PropertyView>, Failure> {
    drop(ctx.authenticate(Access::Authenticated).await?);
    let PathParams(id) = id?;

    ctx.service()
        .execute(query::property::ById::by(id))
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())?
        .map(|p| Json(p.into()))
        .ok_or_else(|| ctx.error()(api::NotFound::Property.into()))
}

impl AsError for command::create_property::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[kind = BusinessRuleViolated]
                #[message = "property with the same address and kind is \
                             already registered"]
                Duplicated,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PropertyDuplicated(_) => Some(Error::Duplicated.into()),
        }
    }
}
