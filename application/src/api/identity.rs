//! [`domain::Identity`] administration endpoints.

use axum::Json;
use serde::{Deserialize, Serialize};
use service::{
    auth::Access,
    command::{self, Command as _},
    domain::{
        self,
        identity::{self, Role, Roles},
    },
};

use crate::{
    api,
    error::{Failure, PathParams, Payload},
    AsError, Context, Error,
};

/// Public view of an [`domain::Identity`].
///
/// Never exposes the password hash.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityView {
    /// ID of the [`domain::Identity`].
    pub id: identity::Id,

    /// Email of the [`domain::Identity`].
    pub email: identity::Email,

    /// [`Roles`] granted to the [`domain::Identity`].
    pub roles: Roles,

    /// Indicator whether the [`domain::Identity`] may authenticate.
    pub enabled: bool,

    /// [RFC 3339] moment the [`domain::Identity`] was created at.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: identity::CreationDateTime,
}

impl From<domain::Identity> for IdentityView {
    fn from(identity: domain::Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
            roles: identity.roles,
            enabled: identity.is_enabled,
            created_at: identity.created_at,
        }
    }
}

/// Request replacing [`Roles`] of an [`domain::Identity`].
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateRoles {
    /// New set of [`Role`]s.
    pub roles: Vec<Role>,
}

/// Replaces [`Roles`] of an [`domain::Identity`].
#[tracing::instrument(
    skip_all,
    fields(http.route = "/identities/:id/roles"),
)]
pub async fn update_roles(
    ctx: Context,
    id: Result<PathParams<identity::Id>, Failure>,
    body: Result<Payload<UpdateRoles>, Failure>,
) -> Result<Json<IdentityView>, Failure> {
    drop(ctx.authenticate(Access::ADMIN).await?);
    let PathParams(identity_id) = id?;
    let Payload(UpdateRoles { roles }) = body?;

    ctx.service()
        .execute(command::UpdateIdentityRoles {
            identity_id,
            roles: Roles::new(roles),
        })
        .await
        .map(|i| Json(i.into()))
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

/// Disables an [`domain::Identity`], so it cannot authenticate anymore.
#[tracing::instrument(
    skip_all,
    fields(http.route = "/identities/:id/disable"),
)]
pub async fn disable(
    ctx: Context,
    id: Result<PathParams<identity::Id>, Failure>,
) -> Result<Json<IdentityView>, Failure> {
    drop(ctx.authenticate(Access::ADMIN).await?);
    let PathParams(identity_id) = id?;

    ctx.service()
        .execute(command::DisableIdentity { identity_id })
        .await
        .map(|i| Json(i.into()))
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

impl AsError for command::update_identity_roles::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::IdentityNotExists(_) => {
                Some(api::NotFound::Identity.into())
            }
        }
    }
}

impl AsError for command::disable_identity::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::IdentityNotExists(_) => {
                Some(api::NotFound::Identity.into())
            }
        }
    }
}
