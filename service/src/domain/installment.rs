//! [`Installment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::contract::{self, schedule};
#[cfg(doc)]
use crate::domain::Contract;

/// Scheduled payment obligation of a [`Contract`].
#[derive(Clone, Debug)]
pub struct Installment {
    /// ID of this [`Installment`].
    pub id: Id,

    /// ID of the [`Contract`] this [`Installment`] belongs to.
    pub contract_id: contract::Id,

    /// 1-based sequence [`Number`] of this [`Installment`], unique within its
    /// [`Contract`].
    pub number: Number,

    /// [`Date`] this [`Installment`] is due at.
    pub due_date: Date,

    /// Amount to be paid.
    pub amount: Money,

    /// [`Status`] of this [`Installment`] payment.
    pub status: Status,

    /// [`DateTime`] when this [`Installment`] was paid, if it was.
    pub paid_at: Option<PaymentDateTime>,
}

impl Installment {
    /// Creates a new unpaid [`Installment`] of the provided [`Contract`] out of
    /// a [`schedule::Draft`].
    #[must_use]
    pub fn from_draft(contract_id: contract::Id, draft: schedule::Draft) -> Self {
        let schedule::Draft {
            number,
            due_date,
            amount,
            status,
        } = draft;
        Self {
            id: Id::new(),
            contract_id,
            number,
            due_date,
            amount,
            status,
            paid_at: None,
        }
    }

    /// Indicates whether this [`Installment`] has been paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.status.is_paid()
    }
}

/// ID of an [`Installment`].
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

/// 1-based sequence number of an [`Installment`] within its [`Contract`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct Number(u32);

impl Number {
    /// The first [`Number`] in a [`Contract`].
    pub const FIRST: Self = Self(1);

    /// Creates a new [`Number`] if the given `n` is not zero.
    #[must_use]
    pub const fn new(n: u32) -> Option<Self> {
        if n == 0 {
            None
        } else {
            Some(Self(n))
        }
    }
}

define_kind! {
    #[doc = "Payment status of an [`Installment`]."]
    enum Status {
        #[doc = "The [`Installment`] is paid."]
        #[wire = "S"]
        Paid = 1,

        #[doc = "The [`Installment`] is not paid yet."]
        #[wire = "N"]
        Unpaid = 2,
    }
}

impl Status {
    /// Projects this [`Status`] into a boolean flag.
    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Unpaid
    }
}

/// Marker type indicating an [`Installment`] payment.
#[derive(Clone, Copy, Debug)]
pub struct Payment;

/// [`DateTime`] when an [`Installment`] was paid.
pub type PaymentDateTime = DateTimeOf<(Installment, Payment)>;

#[cfg(test)]
mod spec {
    use super::{Number, Status};

    #[test]
    fn number_is_one_based() {
        assert_eq!(Number::new(0), None);
        assert_eq!(Number::new(1), Some(Number::FIRST));
    }

    #[test]
    fn status_wire_encoding() {
        assert_eq!(Status::Paid.to_string(), "S");
        assert_eq!(Status::Unpaid.to_string(), "N");
        assert_eq!("S".parse::<Status>().unwrap(), Status::Paid);
        assert_eq!(
            serde_json::to_string(&Status::Unpaid).unwrap(),
            r#""N""#,
        );
        assert!(Status::Paid.is_paid());
        assert!(!Status::default().is_paid());
    }
}
