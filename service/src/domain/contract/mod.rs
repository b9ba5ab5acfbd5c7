//! [`Contract`] definitions.

pub mod frequency;
pub mod schedule;

#[cfg(doc)]
use common::DateTime;
use common::{unit, Date, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, tenant};
#[cfg(doc)]
use crate::domain::{Installment, Property, Tenant};

pub use self::frequency::Frequency;

/// Rental agreement binding one [`Tenant`] to one [`Property`].
///
/// Owns exactly `duration_years × installments_per_year(frequency)`
/// [`Installment`]s, all of them created together with the [`Contract`].
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the [`Tenant`] renting the [`Property`].
    pub tenant_id: tenant::Id,

    /// ID of the rented [`Property`].
    pub property_id: property::Id,

    /// [`Date`] this [`Contract`] starts at.
    pub start_date: Date,

    /// Duration of this [`Contract`] in whole years.
    pub duration_years: u16,

    /// Rent to be paid every year.
    pub annual_rent: Money,

    /// [`Frequency`] of the rent payments.
    pub frequency: Frequency,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,
}

impl Contract {
    /// Returns the number of [`Installment`]s this [`Contract`] owns.
    #[must_use]
    pub fn installment_count(&self) -> u32 {
        u32::from(self.duration_years) * self.frequency.installments_per_year()
    }

    /// Returns the [`Date`] this [`Contract`] ends at (exclusive).
    ///
    /// [`None`] is returned if the end is out of the supported date range.
    #[must_use]
    pub fn end_date(&self) -> Option<Date> {
        self.start_date.add_months(u32::from(self.duration_years) * 12)
    }
}

/// ID of a [`Contract`].
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

/// [`DateTime`] when a [`Contract`] was created.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;
