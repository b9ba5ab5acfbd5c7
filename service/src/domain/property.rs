//! [`Property`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xxhash_rust::xxh3;

/// Rentable asset: a common attribute set plus exactly one [`Variant`].
#[derive(Clone, Debug)]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// [`Hash`] of this [`Property`] used for deduplication.
    ///
    /// [`Hash`]: struct@Hash
    pub hash: Hash,

    /// [`Address`] of this [`Property`].
    pub address: Address,

    /// [`City`] this [`Property`] is located in.
    pub city: City,

    /// [`Surface`] area of this [`Property`].
    pub surface: Surface,

    /// [`Variant`] of this [`Property`], fixed at creation.
    pub variant: Variant,

    /// [`DateTime`] when this [`Property`] was created.
    pub created_at: CreationDateTime,
}

impl Property {
    /// Returns [`Kind`] of this [`Property`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.variant.kind()
    }
}

/// Kind-specific payload of a [`Property`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Variant {
    /// Dwelling.
    #[serde(rename_all = "camelCase")]
    Residential {
        /// Floor the dwelling is located on (negative for basements).
        floor: i16,

        /// Number of rooms.
        rooms: u16,
    },

    /// Shop.
    #[serde(rename_all = "camelCase")]
    Retail {
        /// Number of storefront windows.
        storefronts: u16,

        /// [`Surface`] of the storage area.
        storage_area: Surface,
    },

    /// Office space.
    #[serde(rename_all = "camelCase")]
    Office {
        /// Number of workstations.
        workstations: u16,

        /// Number of meeting rooms.
        meeting_rooms: u16,
    },
}

impl Variant {
    /// Returns [`Kind`] of this [`Variant`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Residential { .. } => Kind::Residential,
            Self::Retail { .. } => Kind::Retail,
            Self::Office { .. } => Kind::Office,
        }
    }
}

define_kind! {
    #[doc = "Kind of a [`Property`]."]
    enum Kind {
        #[doc = "[`Variant::Residential`] [`Property`]."]
        Residential = 1,

        #[doc = "[`Variant::Retail`] [`Property`]."]
        Retail = 2,

        #[doc = "[`Variant::Office`] [`Property`]."]
        Office = 3,
    }
}

/// ID of a [`Property`].
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

/// Hash of a [`Property`] used for deduplication.
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
pub struct Hash(Uuid);

impl Hash {
    /// Calculates a new [`Hash`] for a [`Property`].
    ///
    /// Only the location and the [`Kind`] participate: the same place can't
    /// be registered twice as the same kind of asset.
    ///
    /// [`Hash`]: struct@Hash
    #[must_use]
    pub fn new(address: &Address, city: &City, kind: Kind) -> Self {
        use std::hash::Hash as _;

        // WARNING: Avoid changing the order of the fields in the hasher,
        //          because it will change all the existing hashes.
        let mut hasher = xxh3::Xxh3Builder::new().build();
        address.0.to_lowercase().hash(&mut hasher);
        city.0.to_lowercase().hash(&mut hasher);
        kind.hash(&mut hasher);

        Self(Uuid::from_u128(hasher.digest128()))
    }
}

/// Street address of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Address`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address && !address.is_empty() && address.len() <= 512
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("must be non-empty and not padded with spaces")
    }
}

/// City of a [`Property`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct City(String);

impl City {
    /// Creates a new [`City`] if the given `city` is valid.
    #[must_use]
    pub fn new(city: impl Into<String>) -> Option<Self> {
        let city = city.into();
        Self::check(&city).then_some(Self(city))
    }

    /// Checks whether the given `city` is a valid [`City`].
    fn check(city: impl AsRef<str>) -> bool {
        let city = city.as_ref();
        city.trim() == city && !city.is_empty() && city.len() <= 128
    }
}

impl FromStr for City {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("must be non-empty and not padded with spaces")
    }
}

/// Surface area in square meters.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Into, PartialEq, Serialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Surface(Decimal);

impl Surface {
    /// Creates a new [`Surface`] if the given `sqm` is strictly positive.
    #[must_use]
    pub fn new(sqm: Decimal) -> Option<Self> {
        (sqm > Decimal::ZERO).then_some(Self(sqm))
    }
}

impl TryFrom<Decimal> for Surface {
    type Error = &'static str;

    fn try_from(sqm: Decimal) -> Result<Self, Self::Error> {
        Self::new(sqm).ok_or("surface must be positive")
    }
}

/// [`DateTime`] when a [`Property`] was created.
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Address, City, Hash, Kind, Variant};

    #[test]
    fn hash_ignores_case_but_not_kind() {
        let address = Address::new("Via Roma 1").unwrap();
        let city = City::new("Milano").unwrap();

        assert_eq!(
            Hash::new(&address, &city, Kind::Office),
            Hash::new(
                &Address::new("VIA ROMA 1").unwrap(),
                &City::new("milano").unwrap(),
                Kind::Office,
            ),
        );
        assert_ne!(
            Hash::new(&address, &city, Kind::Office),
            Hash::new(&address, &city, Kind::Retail),
        );
    }

    #[test]
    fn variant_is_tagged_by_kind() {
        let variant: Variant = serde_json::from_str(
            r#"{"kind":"OFFICE","workstations":12,"meetingRooms":2}"#,
        )
        .unwrap();

        assert_eq!(variant, Variant::Office {
            workstations: 12,
            meeting_rooms: 2,
        });
        assert_eq!(variant.kind(), Kind::Office);
        assert!(serde_json::from_str::<Variant>(
            r#"{"kind":"CASTLE","towers":4}"#,
        )
        .is_err());
    }
}
