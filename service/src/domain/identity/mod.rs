//! [`Identity`] definitions.

pub mod session;

use std::{collections::BTreeSet, sync::LazyLock};

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher as _, PasswordVerifier as _,
};
#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::session::Session;

/// Authenticable account of the platform.
#[derive(Clone, Debug)]
pub struct Identity {
    /// ID of this [`Identity`].
    pub id: Id,

    /// [`Email`] of this [`Identity`], used as its unique login key.
    pub email: Email,

    /// [`PasswordHash`] of this [`Identity`].
    pub password_hash: PasswordHash,

    /// Indicator whether this [`Identity`] is allowed to authenticate.
    ///
    /// Identities are never deleted, only disabled.
    pub is_enabled: bool,

    /// [`Roles`] granted to this [`Identity`].
    pub roles: Roles,

    /// [`DateTime`] when this [`Identity`] was created.
    pub created_at: CreationDateTime,
}

/// ID of an [`Identity`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Named permission bucket granted to an [`Identity`]."]
    enum Role {
        #[doc = "Administrator of the whole platform."]
        Admin = 1,

        #[doc = "Manager of properties, tenants and contracts."]
        Manager = 2,

        #[doc = "Tenant acting upon its own records only."]
        Tenant = 3,
    }
}

impl Role {
    /// Indicates whether this [`Role`] is an elevated one, bypassing
    /// per-record ownership checks.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        match self {
            Self::Admin | Self::Manager => true,
            Self::Tenant => false,
        }
    }
}

/// Unordered set of unique [`Role`]s of an [`Identity`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Roles(BTreeSet<Role>);

impl Roles {
    /// Creates new [`Roles`] out of the provided ones, dropping duplicates.
    #[must_use]
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self(roles.into_iter().collect())
    }

    /// Checks whether these [`Roles`] contain the provided [`Role`].
    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Checks whether these [`Roles`] contain any of the `required` ones.
    #[must_use]
    pub fn intersects(&self, required: &[Role]) -> bool {
        required.iter().any(|r| self.0.contains(r))
    }

    /// Checks whether these [`Roles`] contain any [elevated] [`Role`].
    ///
    /// [elevated]: Role::is_elevated
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        self.0.iter().any(|r| r.is_elevated())
    }

    /// Returns an iterator over these [`Roles`], in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Role> for Roles {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Email address of an [`Identity`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(str)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    ///
    /// The `address` is lowercased, so emails are compared
    /// case-insensitively.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into().to_lowercase();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(
                r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
            )
            .expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 254 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

impl TryFrom<String> for Email {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// Password of an [`Identity`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        password.len() > 1 && password.len() <= 128
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("must be 2 to 128 characters long")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// [Argon2id] hash of a [`Password`] in a [PHC string format].
///
/// [Argon2id]: https://en.wikipedia.org/wiki/Argon2
/// [PHC string format]: https://github.com/P-H-C/phc-string-format
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes the given [`Password`] with a random salt.
    ///
    /// # Errors
    ///
    /// If the hashing algorithm fails.
    pub fn new(password: &Password) -> Result<Self, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.0.as_bytes(), &salt)
            .map(|h| Self(h.to_string()))
            .map_err(HashError)
    }

    /// Verifies whether the given [`Password`] matches this [`PasswordHash`].
    ///
    /// Malformed hashes never match.
    #[must_use]
    pub fn verify(&self, password: &Password) -> bool {
        argon2::PasswordHash::new(&self.0).is_ok_and(|hash| {
            Argon2::default()
                .verify_password(password.0.as_bytes(), &hash)
                .is_ok()
        })
    }
}

/// Error of hashing a [`Password`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("failed to hash `Password`: {_0}")]
pub struct HashError(#[error(not(source))] argon2::password_hash::Error);

/// [`DateTime`] when an [`Identity`] was created.
pub type CreationDateTime = DateTimeOf<(Identity, unit::Creation)>;
