//! [`Error`]-related definitions.

use std::{collections::BTreeMap, fmt};

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    response::{IntoResponse, Response},
    Json,
};
use common::DateTime;
use derive_more::{Display, Error as StdError};
use itertools::Itertools as _;
use serde::{de::DeserializeOwned, Serialize};
use service::infra::database;
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[kind = $kind:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self::new(
                            $crate::error::Kind::$kind,
                            $message,
                        ),
                    )*
                }
            }
        }
    };
}

/// Kind of an [`Error`], determining its [`http::StatusCode`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Kind {
    /// Malformed or out-of-range input fields.
    #[display("VALIDATION_FAILED")]
    ValidationFailed,

    /// Broken domain rule.
    #[display("BUSINESS_RULE_VIOLATED")]
    BusinessRuleViolated,

    /// Referenced entity is absent.
    #[display("ENTITY_NOT_FOUND")]
    EntityNotFound,

    /// Missing, invalid or expired credentials.
    #[display("UNAUTHENTICATED")]
    Unauthenticated,

    /// Token signature doesn't verify.
    #[display("TOKEN_INVALID")]
    TokenInvalid,

    /// Token structure cannot be decoded.
    #[display("TOKEN_MALFORMED")]
    TokenMalformed,

    /// Role or ownership gate failed.
    #[display("FORBIDDEN")]
    Forbidden,

    /// Anything else.
    #[display("INTERNAL_SERVER_ERROR")]
    Unclassified,
}

impl Kind {
    /// Returns [`http::StatusCode`] of this [`Kind`].
    #[must_use]
    pub const fn status_code(self) -> http::StatusCode {
        use http::StatusCode as S;

        match self {
            Self::ValidationFailed | Self::BusinessRuleViolated => {
                S::BAD_REQUEST
            }
            Self::EntityNotFound => S::NOT_FOUND,
            Self::Unauthenticated | Self::TokenInvalid | Self::TokenMalformed => {
                S::UNAUTHORIZED
            }
            Self::Forbidden => S::FORBIDDEN,
            Self::Unclassified => S::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message exposed to clients instead of the actual one, if
    /// this [`Kind`] hides details.
    #[must_use]
    pub const fn public_message(self) -> Option<&'static str> {
        match self {
            Self::Unauthenticated | Self::TokenInvalid | Self::TokenMalformed => {
                Some("login required")
            }
            Self::Forbidden => Some("insufficient permission"),
            Self::Unclassified => Some("internal server error"),
            Self::ValidationFailed
            | Self::BusinessRuleViolated
            | Self::EntityNotFound => None,
        }
    }
}

/// Messages of invalid fields, keyed by field names.
pub type FieldErrors = BTreeMap<String, String>;

/// API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Kind`] of this [`Error`].
    pub kind: Kind,

    /// [`Error`] message.
    pub message: String,

    /// [`FieldErrors`] of a [`Kind::ValidationFailed`] [`Error`].
    pub fields: FieldErrors,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,
}

impl Error {
    /// Creates a new [`Error`] of the provided [`Kind`].
    #[must_use]
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: FieldErrors::new(),
            backtrace: None,
        }
    }

    /// Create a new [`Error`] representing an internal server error.
    ///
    /// The provided `msg` is never exposed to clients.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self::new(Kind::Unclassified, msg.to_string())
    }

    /// Creates a new [`Kind::ValidationFailed`] [`Error`] out of the provided
    /// [`FieldErrors`].
    #[must_use]
    pub fn validation(fields: FieldErrors) -> Self {
        Self {
            fields,
            ..Self::new(Kind::ValidationFailed, "validation failed")
        }
    }

    /// Returns [`http::StatusCode`] of this [`Error`].
    #[must_use]
    pub const fn status_code(&self) -> http::StatusCode {
        self.kind.status_code()
    }

    /// Renders this [`Error`] into its wire [`Body`] for the provided request
    /// `path`.
    #[must_use]
    pub fn body(&self, path: impl Into<String>) -> Body {
        Body {
            timestamp: DateTime::now().to_rfc3339(),
            status: self.status_code().as_u16(),
            error: self.kind,
            message: self
                .kind
                .public_message()
                .map_or_else(|| self.message.clone(), ToOwned::to_owned),
            path: path.into(),
            errors: self.fields.clone(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            kind,
            message,
            fields,
            backtrace,
        } = self;

        write!(f, "[{kind}]: {message}")?;
        if !fields.is_empty() {
            write!(
                f,
                " ({})",
                fields.iter().format_with(", ", |(field, msg), f| {
                    f(&format_args!("{field}: {msg}"))
                }),
            )?;
        }
        write!(
            f,
            "{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

/// Wire shape of an [`Error`] response.
#[derive(Clone, Debug, Serialize)]
pub struct Body {
    /// [RFC 3339] moment the [`Error`] was rendered at.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub timestamp: String,

    /// [`http::StatusCode`] of the response.
    pub status: u16,

    /// [`Kind`] of the [`Error`].
    #[serde(serialize_with = "serialize_display")]
    pub error: Kind,

    /// Human-readable message, sanitized according to the [`Kind`].
    pub message: String,

    /// Path of the failed request.
    pub path: String,

    /// [`FieldErrors`], if any.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FieldErrors,
}

/// Serializes the provided `value` as its [`fmt::Display`] string.
fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}

/// [`Error`] occurred while serving a request at some `path`.
#[derive(Clone, Debug)]
pub struct Failure {
    /// Occurred [`Error`].
    pub error: Error,

    /// Path of the failed request.
    pub path: String,
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let Self { error, path } = self;

        if error.kind == Kind::Unclassified {
            tracing::error!(%path, "request failed: {error}");
        } else {
            tracing::debug!(%path, "request rejected: {error}");
        }

        (error.status_code(), Json(error.body(path))).into_response()
    }
}

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError + fmt::Display> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }

    fn as_error(&self) -> Error {
        let mut error = self.as_ref().as_error();
        error.backtrace = Some(self.trace().clone());
        error
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for JsonRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::validation(FieldErrors::from([(
            "body".to_owned(),
            self.body_text(),
        )])))
    }
}

impl AsError for PathRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::validation(FieldErrors::from([(
            "path".to_owned(),
            self.body_text(),
        )])))
    }
}

impl AsError for QueryRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::validation(FieldErrors::from([(
            "query".to_owned(),
            self.body_text(),
        )])))
    }
}

/// Collector of [`FieldErrors`] of a request.
#[derive(Debug, Default)]
pub struct Validator {
    /// Collected [`FieldErrors`].
    errors: FieldErrors,
}

impl Validator {
    /// Records the provided `field` as invalid if its parsing `result` is an
    /// error.
    pub fn field<T, E>(&mut self, field: &str, result: Result<T, E>) -> Option<T>
    where
        E: fmt::Display,
    {
        result
            .map_err(|e| drop(self.errors.insert(field.to_owned(), e.to_string())))
            .ok()
    }

    /// Records the provided `field` as invalid with the provided `message`
    /// if its `value` is absent.
    pub fn require<T>(
        &mut self,
        field: &str,
        value: Option<T>,
        message: &str,
    ) -> Option<T> {
        self.field(field, value.ok_or(message))
    }

    /// Finishes the validation and `build`s the validated value.
    ///
    /// # Errors
    ///
    /// With [`Kind::ValidationFailed`] if any field is invalid.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, Error> {
        if !self.errors.is_empty() {
            return Err(Error::validation(self.errors));
        }
        build().ok_or_else(|| Error::internal(&"validated field is missing"))
    }
}

/// JSON request body, rejected with a [`Kind::ValidationFailed`] [`Failure`].
#[derive(Clone, Copy, Debug)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Failure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req.uri().path().to_owned();
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(v)| Self(v))
            .map_err(|e| Failure {
                error: e.into_error(),
                path,
            })
    }
}

/// URL path parameters, rejected with a [`Kind::ValidationFailed`]
/// [`Failure`].
#[derive(Clone, Copy, Debug)]
pub struct PathParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = Failure;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(v)| Self(v))
            .map_err(|e| Failure {
                error: e.into_error(),
                path: parts.uri.path().to_owned(),
            })
    }
}

/// URL query parameters, rejected with a [`Kind::ValidationFailed`]
/// [`Failure`].
#[derive(Clone, Copy, Debug)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Failure;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(v)| Self(v))
            .map_err(|e| Failure {
                error: e.into_error(),
                path: parts.uri.path().to_owned(),
            })
    }
}

#[cfg(test)]
mod spec {
    use http::StatusCode;

    use super::{Error, FieldErrors, Kind, Validator};

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(
            [
                Kind::ValidationFailed,
                Kind::BusinessRuleViolated,
                Kind::EntityNotFound,
                Kind::Unauthenticated,
                Kind::TokenInvalid,
                Kind::TokenMalformed,
                Kind::Forbidden,
                Kind::Unclassified,
            ]
            .map(Kind::status_code),
            [
                StatusCode::BAD_REQUEST,
                StatusCode::BAD_REQUEST,
                StatusCode::NOT_FOUND,
                StatusCode::UNAUTHORIZED,
                StatusCode::UNAUTHORIZED,
                StatusCode::UNAUTHORIZED,
                StatusCode::FORBIDDEN,
                StatusCode::INTERNAL_SERVER_ERROR,
            ],
        );
    }

    #[test]
    fn body_hides_internal_details() {
        let body = Error::internal(&"connection pool exhausted").body("/tenants");

        assert_eq!(body.status, 500);
        assert_eq!(body.message, "internal server error");
        assert_eq!(body.path, "/tenants");

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "INTERNAL_SERVER_ERROR");
        assert!(json.get("errors").is_none());
        assert!(!json.to_string().contains("pool"));
    }

    #[test]
    fn token_failures_look_alike() {
        for kind in [Kind::TokenInvalid, Kind::TokenMalformed] {
            let body = Error::new(kind, "signature mismatch").body("/auth/me");

            assert_eq!(body.status, 401);
            assert_eq!(body.message, "login required");
        }
    }

    #[test]
    fn validation_lists_every_field() {
        let mut v = Validator::default();
        let email = v.field("email", "nope".parse::<u8>());
        let port = v.field("port", "8080".parse::<u16>());
        let name = v.require("name", None::<String>, "required");

        let err = v.finish(|| Some((email?, port?, name?))).unwrap_err();
        let json = serde_json::to_value(err.body("/auth/register")).unwrap();

        assert_eq!(err.kind, Kind::ValidationFailed);
        assert_eq!(json["status"], 400);
        assert_eq!(json["errors"]["name"], "required");
        assert!(json["errors"]["email"].is_string());
        assert!(json["errors"].get("port").is_none());
        assert_eq!(
            Validator::default().finish(|| Some(42)).unwrap(),
            42,
        );
        assert!(Error::validation(FieldErrors::new()).fields.is_empty());
    }
}
