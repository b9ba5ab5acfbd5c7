//! [`Frequency`] of [`Contract`] payments.

use common::define_kind;

#[cfg(doc)]
use crate::domain::{Contract, Installment};

define_kind! {
    #[doc = "How many [`Installment`]s per year a [`Contract`]'s annual \
             rent is divided into."]
    enum Frequency {
        #[doc = "Every month."]
        #[wire = "MENSILE"]
        Monthly = 1,

        #[doc = "Every two months."]
        #[wire = "BIMESTRALE"]
        Bimonthly = 2,

        #[doc = "Every three months."]
        #[wire = "TRIMESTRALE"]
        Quarterly = 3,

        #[doc = "Every six months."]
        #[wire = "SEMESTRALE"]
        Semiannual = 4,

        #[doc = "Once a year."]
        #[wire = "ANNUALE"]
        Annual = 5,
    }
}

impl Frequency {
    /// Returns the number of [`Installment`]s in a year.
    #[must_use]
    pub const fn installments_per_year(self) -> u32 {
        match self {
            Self::Monthly => 12,
            Self::Bimonthly => 6,
            Self::Quarterly => 4,
            Self::Semiannual => 2,
            Self::Annual => 1,
        }
    }

    /// Returns the number of months between two consecutive [`Installment`]s.
    #[must_use]
    pub const fn months_between(self) -> u32 {
        12 / self.installments_per_year()
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::Quarterly
    }
}

#[cfg(test)]
mod spec {
    use super::Frequency;

    #[test]
    fn installments_per_year() {
        assert_eq!(
            Frequency::ALL
                .iter()
                .map(|f| (f.installments_per_year(), f.months_between()))
                .collect::<Vec<_>>(),
            [(12, 1), (6, 2), (4, 3), (2, 6), (1, 12)],
        );
    }

    #[test]
    fn wire_values() {
        assert_eq!(Frequency::Monthly.to_string(), "MENSILE");
        assert_eq!(Frequency::Annual.to_string(), "ANNUALE");
        assert_eq!(
            "BIMESTRALE".parse::<Frequency>().unwrap(),
            Frequency::Bimonthly,
        );
        assert_eq!(
            serde_json::from_str::<Frequency>(r#""SEMESTRALE""#).unwrap(),
            Frequency::Semiannual,
        );
        assert_eq!(
            serde_json::to_string(&Frequency::Quarterly).unwrap(),
            r#""TRIMESTRALE""#,
        );
        assert_eq!(Frequency::default(), Frequency::Quarterly);
    }

    #[test]
    fn rejects_unknown_wire_value() {
        assert_eq!(
            "QUARTERLY".parse::<Frequency>(),
            Err(strum::ParseError::VariantNotFound),
        );
    }
}
