//! [`Context`]-related definitions.

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use service::{
    auth::{token, Access, Denial, Principal, Resource},
    command::{self, Command as _},
    domain::identity::session,
};
use tokio::sync::OnceCell;

use crate::{
    define_error,
    error::{Failure, Kind},
    AsError, Error, Service,
};

/// Request context.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Path of the HTTP request.
    path: String,

    /// [`session::Token`] provided in the `Authorization` header, if any.
    token: Option<session::Token>,

    /// Outcome of the [`session::Token`] authorization.
    principal: OnceCell<Result<Option<Principal>, Error>>,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns path of the HTTP request of this [`Context`].
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Helper method attaching the request path to an [`Error`] inside
    /// [`Result::map_err()`] closure.
    pub fn error(&self) -> impl FnOnce(Error) -> Failure + '_ {
        move |error| Failure {
            error,
            path: self.path.clone(),
        }
    }

    /// Resolves the [`Principal`] of the provided [`session::Token`], if any.
    ///
    /// The outcome is resolved once and reused during the whole request.
    ///
    /// # Errors
    ///
    /// Errors if the provided [`session::Token`] is invalid, expired, or its
    /// identity is gone or disabled.
    pub async fn principal(&self) -> Result<Option<Principal>, Error> {
        self.principal
            .get_or_init(|| async {
                let Some(token) = self.token.clone() else {
                    return Ok(None);
                };
                self.service
                    .execute(command::AuthorizeSession { token })
                    .await
                    .map(Some)
                    .map_err(AsError::into_error)
            })
            .await
            .clone()
    }

    /// Checks the provided [`Access`] requirement of the route.
    ///
    /// Returns the acting [`Principal`], if any.
    ///
    /// # Errors
    ///
    /// Errors if the request is not permitted.
    pub async fn authorize(
        &self,
        access: Access,
    ) -> Result<Option<Principal>, Failure> {
        let principal = match self.principal().await {
            Ok(p) => p,
            Err(_) if access == Access::Public => None,
            Err(e) => return Err(self.error()(e)),
        };

        self.service
            .execute(command::AuthorizeAccess {
                principal: principal.clone(),
                access,
                resource: None,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(self.error())?;

        Ok(principal)
    }

    /// Same as [`Context::authorize()`], but requires the [`Principal`] to be
    /// present.
    ///
    /// # Errors
    ///
    /// Errors if the request is not authenticated or not permitted.
    pub async fn authenticate(
        &self,
        access: Access,
    ) -> Result<Principal, Failure> {
        self.authorize(access)
            .await?
            .ok_or_else(|| self.error()(AuthError::LoginRequired.into()))
    }

    /// Checks whether the provided [`Principal`] may act upon the provided
    /// [`Resource`].
    ///
    /// # Errors
    ///
    /// Errors if the [`Resource`] doesn't exist or is owned by someone else.
    pub async fn authorize_resource(
        &self,
        principal: &Principal,
        resource: Resource,
    ) -> Result<(), Failure> {
        self.service
            .execute(command::AuthorizeAccess {
                principal: Some(principal.clone()),
                access: Access::Authenticated,
                resource: Some(resource),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(self.error())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_owned();
        let service =
            parts.extensions.get::<Service>().cloned().ok_or_else(|| {
                Failure {
                    error: Error::internal(&"missing `Service` extension"),
                    path: path.clone(),
                }
            })?;

        // Missing or malformed header means an anonymous request.
        let token = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| {
                session::Token::new_unchecked(bearer.token().to_owned())
            });

        Ok(Self {
            service,
            path,
            token,
            principal: OnceCell::new(),
        })
    }
}

impl AsError for command::authorize_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Expired(_)
            | Self::IdentityDisabled(_)
            | Self::IdentityNotExists(_) => {
                Some(AuthError::LoginRequired.into())
            }
            Self::Token(token::ParseError::Invalid(_)) => {
                Some(AuthError::InvalidToken.into())
            }
            Self::Token(token::ParseError::Malformed(_)) => {
                Some(AuthError::MalformedToken.into())
            }
        }
    }
}

impl AsError for command::authorize_access::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Denied(Denial::Unauthenticated) => {
                Some(AuthError::LoginRequired.into())
            }
            Self::Denied(Denial::Forbidden) => {
                Some(AuthError::Forbidden.into())
            }
            Self::ResourceNotExists(r) => Some(Error::new(
                Kind::EntityNotFound,
                format!("{} not found", resource_name(*r)),
            )),
        }
    }
}

/// Returns the human-readable name of the provided [`Resource`] kind.
const fn resource_name(resource: Resource) -> &'static str {
    match resource {
        Resource::Tenant(_) => "Tenant",
        Resource::Contract(_) => "Contract",
        Resource::Installment(_) => "Installment",
        Resource::Maintenance(_) => "Maintenance",
    }
}

define_error! {
    enum AuthError {
        #[kind = Unauthenticated]
        #[message = "login required"]
        LoginRequired,

        #[kind = TokenInvalid]
        #[message = "token signature is invalid"]
        InvalidToken,

        #[kind = TokenMalformed]
        #[message = "token is malformed"]
        MalformedToken,

        #[kind = Forbidden]
        #[message = "insufficient permission"]
        Forbidden,
    }
}
