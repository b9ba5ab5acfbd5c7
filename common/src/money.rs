//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal, RoundingStrategy};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Indicates whether the amount of this [`Money`] is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Rounds this [`Money`] to the minor unit of its [`Currency`], with
    /// midpoints rounded away from zero (`0.005` becomes `0.01`).
    #[must_use]
    pub fn round(self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                self.currency.minor_units(),
                RoundingStrategy::MidpointAwayFromZero,
            ),
            currency: self.currency,
        }
    }

    /// Divides this [`Money`] into `parts` equal shares, each one rounded to
    /// the minor unit of the [`Currency`].
    ///
    /// No remainder is redistributed, so the sum of shares may differ from the
    /// original amount by less than one minor unit per share.
    ///
    /// [`None`] is returned if `parts` is zero.
    #[must_use]
    pub fn share(self, parts: u32) -> Option<Self> {
        let amount = self.amount.checked_div(Decimal::from(parts))?;
        Some(
            Self {
                amount,
                currency: self.currency,
            }
            .round(),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        match amount.is_integer().then(|| amount.to_i128()).flatten() {
            Some(int) => write!(f, "{int}{currency}"),
            None => write!(f, "{}{currency}", amount.normalize()),
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Euro."]
        Eur = 1,

        #[doc = "US Dollar."]
        Usd = 2,

        #[doc = "Pound Sterling."]
        Gbp = 3,
    }
}

impl Currency {
    /// Returns the number of decimal digits in the minor unit of this
    /// [`Currency`].
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::Eur | Self::Usd | Self::Gbp => 2,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn eur(s: &str) -> Money {
        Money {
            amount: decimal(s),
            currency: Currency::Eur,
        }
    }

    #[test]
    fn from_str() {
        assert_eq!(Money::from_str("1200.50EUR").unwrap(), eur("1200.50"));
        assert_eq!(
            Money::from_str("99USD").unwrap(),
            Money {
                amount: decimal("99"),
                currency: Currency::Usd,
            },
        );

        assert!(Money::from_str("1200.50").is_err());
        assert!(Money::from_str("1200.50Eu").is_err());
        assert!(Money::from_str("1200.50euro").is_err());
        assert!(Money::from_str("abcEUR").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(eur("83.33").to_string(), "83.33EUR");
        assert_eq!(eur("300.00").to_string(), "300EUR");
        assert_eq!(eur("300").to_string(), "300EUR");
        assert_eq!(eur("12.50").to_string(), "12.5EUR");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(eur("10.005").round(), eur("10.01"));
        assert_eq!(eur("10.004").round(), eur("10.00"));
        assert_eq!(eur("10.015").round(), eur("10.02"));
        assert_eq!(eur("-10.005").round(), eur("-10.01"));
    }

    #[test]
    fn shares_evenly() {
        assert_eq!(eur("1200").share(4), Some(eur("300")));
        assert_eq!(eur("1000").share(12), Some(eur("83.33")));
        assert_eq!(eur("1000").share(6), Some(eur("166.67")));
        assert_eq!(eur("100").share(3), Some(eur("33.33")));
        assert_eq!(eur("100").share(0), None);
    }

    #[test]
    fn serializes_as_string() {
        assert_eq!(
            serde_json::to_string(&eur("83.33")).unwrap(),
            r#""83.33EUR""#,
        );
        assert_eq!(
            serde_json::from_str::<Money>(r#""1200EUR""#).unwrap(),
            eur("1200"),
        );
        assert!(serde_json::from_str::<Money>("1200").is_err());
    }
}
