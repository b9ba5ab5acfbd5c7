//! [`Session`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::Identity;
use crate::domain::identity;

/// Claims of an authenticated [`Identity`] session, carried by its [`Token`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Session {
    /// [`Subject`] this [`Session`] was issued for.
    #[serde(rename = "sub")]
    pub subject: Subject,

    /// [`DateTime`] when this [`Session`] was issued.
    #[serde(rename = "iat", with = "common::datetime::serde::unix_timestamp")]
    pub issued_at: IssueDateTime,

    /// [`DateTime`] when this [`Session`] expires.
    #[serde(rename = "exp", with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

impl Session {
    /// Checks whether this [`Session`] is still valid at the provided moment.
    #[must_use]
    pub fn is_active_at(&self, now: ExpirationDateTime) -> bool {
        now < self.expires_at
    }
}

/// Login key of an [`Identity`] a [`Session`] is issued for.
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, PartialEq, Serialize,
)]
#[as_ref(str)]
#[serde(transparent)]
pub struct Subject(String);

impl From<&str> for Subject {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<&identity::Email> for Subject {
    fn from(email: &identity::Email) -> Self {
        Self(email.to_string())
    }
}

/// Signed access token of a [`Session`].
#[derive(AsRef, Clone, Debug, Display, FromStr)]
#[as_ref(str)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] without checking its contents.
    ///
    /// Malformed contents are detected on parsing only.
    #[must_use]
    pub const fn new_unchecked(token: String) -> Self {
        Self(token)
    }
}

/// [`DateTime`] of a [`Session`] issuance.
pub type IssueDateTime = DateTimeOf<(Session, unit::Issuance)>;

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;
