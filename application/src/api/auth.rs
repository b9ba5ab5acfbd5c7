//! Authentication endpoints.

use axum::Json;
use derive_more::Debug;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    auth::{Access, Principal},
    command::{self, Command as _},
    domain::{
        identity::{self, Role, Roles},
        tenant,
    },
};

use crate::{
    api,
    define_error,
    error::{Failure, Payload, Validator},
    AsError, Context, Error,
};

/// Credentials of an [`identity::Identity`].
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Email of the [`identity::Identity`].
    pub email: String,

    /// Password of the [`identity::Identity`].
    #[debug(skip)]
    pub password: String,
}

impl Credentials {
    /// Validates these [`Credentials`].
    ///
    /// # Errors
    ///
    /// If the email or the password is malformed.
    fn validate(
        self,
    ) -> Result<(identity::Email, SecretBox<identity::Password>), Error> {
        let mut v = Validator::default();
        let email = v.field("email", self.email.parse::<identity::Email>());
        let password =
            v.field("password", self.password.parse::<identity::Password>());
        v.finish(|| Some((email?, SecretBox::new(Box::new(password?)))))
    }
}

/// Issued bearer token along with the [`identity::Identity`] it
/// authenticates.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Bearer token to put into the `Authorization` header.
    pub token: String,

    /// [RFC 3339] moment the `token` expires at.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub expires_at: String,

    /// Authenticated [`identity::Identity`].
    pub identity: api::identity::IdentityView,
}

impl From<command::create_session::Output> for SessionView {
    fn from(out: command::create_session::Output) -> Self {
        Self {
            token: out.token.as_ref().to_owned(),
            expires_at: out.session.expires_at.to_rfc3339(),
            identity: out.identity.into(),
        }
    }
}

/// Currently authenticated [`Principal`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeView {
    /// ID of the authenticated [`identity::Identity`].
    pub id: identity::Id,

    /// Email of the authenticated [`identity::Identity`].
    pub email: identity::Email,

    /// [`Roles`] of the authenticated [`identity::Identity`].
    pub roles: Roles,

    /// ID of the linked [`tenant::Tenant`], if any.
    pub tenant_id: Option<tenant::Id>,
}

impl From<Principal> for MeView {
    fn from(p: Principal) -> Self {
        Self {
            id: p.identity_id,
            email: p.email,
            roles: p.roles,
            tenant_id: p.tenant_id,
        }
    }
}

/// Registers a new [`identity::Identity`] with the [`Role::Tenant`] only and
/// signs it in.
#[tracing::instrument(skip_all, fields(http.route = "/auth/register"))]
pub async fn register(
    ctx: Context,
    Payload(creds): Payload<Credentials>,
) -> Result<Json<SessionView>, Failure> {
    drop(ctx.authorize(Access::Public).await?);
    let (email, password) = creds.validate().map_err(ctx.error())?;

    let identity = ctx
        .service()
        .execute(command::CreateIdentity {
            email,
            password,
            roles: Roles::new([Role::Tenant]),
        })
        .await
        .map_err(AsError::into_error)
        .map_err(ctx.error())?;

    ctx.service()
        .execute(command::CreateSession::ByIdentityId(identity.id))
        .await
        .map(|out| Json(out.into()))
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

/// Signs in an [`identity::Identity`] by its [`Credentials`].
#[tracing::instrument(skip_all, fields(http.route = "/auth/login"))]
pub async fn login(
    ctx: Context,
    Payload(creds): Payload<Credentials>,
) -> Result<Json<SessionView>, Failure> {
    drop(ctx.authorize(Access::Public).await?);
    let (email, password) = creds.validate().map_err(ctx.error())?;

    ctx.service()
        .execute(command::CreateSession::ByCredentials { email, password })
        .await
        .map(|out| Json(out.into()))
        .map_err(AsError::into_error)
        .map_err(ctx.error())
}

/// Returns the currently authenticated [`Principal`].
#[tracing::instrument(skip_all, fields(http.route = "/auth/me"))]
pub async fn me(ctx: Context) -> Result<Json<MeView>, Failure> {
    ctx.authenticate(Access::Authenticated)
        .await
        .map(|p| Json(p.into()))
}

impl AsError for command::create_identity::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[kind = BusinessRuleViolated]
                #[message = "email is occupied"]
                EmailOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(Error::EmailOccupied.into()),
            Self::Blocking(_) | Self::PasswordHash(_) => None,
        }
    }
}

impl AsError for command::create_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[kind = Unauthenticated]
                #[message = "login required"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::IdentityDisabled(_)
            | Self::IdentityNotExists(_)
            | Self::WrongCredentials => Some(Error::WrongCredentials.into()),
            Self::Blocking(_) | Self::Token(_) => None,
        }
    }
}
