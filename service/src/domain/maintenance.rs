//! [`Maintenance`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, tenant};
#[cfg(doc)]
use crate::domain::{Property, Tenant};

/// Maintenance request of a [`Tenant`] for a [`Property`].
#[derive(Clone, Debug)]
pub struct Maintenance {
    /// ID of this [`Maintenance`].
    pub id: Id,

    /// ID of the [`Tenant`] who requested this [`Maintenance`].
    pub tenant_id: tenant::Id,

    /// ID of the [`Property`] to be maintained.
    pub property_id: property::Id,

    /// [`Description`] of the requested work.
    pub description: Description,

    /// [`DateTime`] when this [`Maintenance`] was requested.
    pub created_at: CreationDateTime,
}

/// ID of a [`Maintenance`].
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

/// Free-form description of a [`Maintenance`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Description`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 4096
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("must be non-blank and at most 4096 bytes long")
    }
}

/// [`DateTime`] when a [`Maintenance`] was requested.
pub type CreationDateTime = DateTimeOf<(Maintenance, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::Description;

    #[test]
    fn description_must_not_be_blank() {
        assert!(Description::new("Leaking faucet").is_some());
        assert!(Description::new("   ").is_none());
        assert!(Description::new("").is_none());
        assert!(Description::new("x".repeat(4097)).is_none());
    }
}
