//! [`Tenant`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::identity;
#[cfg(doc)]
use crate::domain::Identity;

/// Renter profile linked to exactly one [`Identity`].
#[derive(Clone, Debug)]
pub struct Tenant {
    /// ID of this [`Tenant`].
    pub id: Id,

    /// ID of the [`Identity`] owning this [`Tenant`].
    pub identity_id: identity::Id,

    /// [`TaxCode`] of this [`Tenant`].
    pub tax_code: TaxCode,

    /// First [`Name`] of this [`Tenant`].
    pub first_name: Name,

    /// Last [`Name`] of this [`Tenant`].
    pub last_name: Name,

    /// Contact [`identity::Email`] of this [`Tenant`], if any.
    pub email: Option<identity::Email>,

    /// [`Phone`] of this [`Tenant`], if any.
    pub phone: Option<Phone>,

    /// [`DateTime`] when this [`Tenant`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Tenant`].
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
    PartialEq,
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

/// Fiscal identifier of a [`Tenant`]: either an Italian personal fiscal code
/// (16 characters) or a VAT number (11 digits).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct TaxCode(String);

impl TaxCode {
    /// Creates a new [`TaxCode`] if the given `code` is valid.
    ///
    /// The `code` is trimmed and uppercased before validation.
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Option<Self> {
        let code = code.as_ref().trim().to_uppercase();
        Self::check(&code).then_some(Self(code))
    }

    /// Checks whether the given `code` is a valid [`TaxCode`].
    fn check(code: impl AsRef<str>) -> bool {
        /// Regular expression checking [`TaxCode`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(
                "^(?:[A-Z]{6}[0-9LMNPQRSTUV]{2}[ABCDEHLMPRST]\
                  [0-9LMNPQRSTUV]{2}[A-Z][0-9LMNPQRSTUV]{3}[A-Z]\
                  |[0-9]{11})$",
            )
            .expect("valid regex")
        });

        REGEX.is_match(code.as_ref())
    }
}

impl FromStr for TaxCode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid fiscal code or VAT number")
    }
}

/// Personal name of a [`Tenant`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("must be non-empty and not padded with spaces")
    }
}

/// Phone number of a [`Tenant`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(
                r"^\+?(?:[0-9]{1,3}[-\s]?)?[0-9]{2,4}[-\s]?[0-9]{3,4}[-\s]?[0-9]{2,4}$",
            )
            .expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// [`DateTime`] when a [`Tenant`] was created.
pub type CreationDateTime = DateTimeOf<(Tenant, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Name, Phone, TaxCode};

    #[test]
    fn tax_code_accepts_fiscal_codes_and_vat_numbers() {
        assert_eq!(
            TaxCode::new(" rssmra85t10a562s ").unwrap().as_ref(),
            "RSSMRA85T10A562S",
        );
        assert!(TaxCode::new("12345678901").is_some());

        assert!(TaxCode::new("RSSMRA85T10A562").is_none());
        assert!(TaxCode::new("RSSMRA85Z10A562S").is_none());
        assert!(TaxCode::new("1234567890").is_none());
        assert!(TaxCode::new("").is_none());
    }

    #[test]
    fn name_rejects_padding() {
        assert!(Name::new("Mario").is_some());
        assert!(Name::new(" Mario").is_none());
        assert!(Name::new("").is_none());
    }

    #[test]
    fn phone_format() {
        assert!(Phone::new("+39 06 1234 5678").is_some());
        assert!(Phone::new("333-123-4567").is_some());
        assert!(Phone::new("call me").is_none());
    }
}
