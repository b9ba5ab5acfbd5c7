//! Payment schedule generation of a [`Contract`].

use common::{Date, Money};
use derive_more::Display;

use crate::domain::installment;
#[cfg(doc)]
use crate::domain::{Contract, Installment};

use super::Frequency;

/// Maximum duration of a [`Contract`] in years.
pub const MAX_DURATION_YEARS: u16 = 99;

/// Not yet persisted [`Installment`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Draft {
    /// 1-based sequence number of the [`Installment`].
    pub number: installment::Number,

    /// [`Date`] the [`Installment`] is due at.
    pub due_date: Date,

    /// Amount to be paid.
    pub amount: Money,

    /// Payment status, always [`installment::Status::Unpaid`] on generation.
    pub status: installment::Status,
}

/// Generates the full ordered payment schedule of a [`Contract`].
///
/// The `annual` rent is divided into [`Frequency::installments_per_year()`]
/// equal shares rounded to the minor unit of its currency, and the very same
/// share is used for every [`Draft`]. The `k`-th [`Draft`] is due
/// `(k - 1) * months_between` calendar months after the `start` date.
///
/// Output depends on the arguments only.
///
/// # Errors
///
/// If `duration_years` is zero or exceeds [`MAX_DURATION_YEARS`], if the
/// `annual` amount is not positive, or if some due date is out of the
/// supported range.
pub fn generate(
    start: Date,
    duration_years: u16,
    annual: Money,
    frequency: Frequency,
) -> Result<Vec<Draft>, Error> {
    if duration_years == 0 {
        return Err(Error::NonPositiveDuration);
    }
    if duration_years > MAX_DURATION_YEARS {
        return Err(Error::DurationTooLong(duration_years));
    }
    if !annual.is_positive() {
        return Err(Error::NonPositiveAmount(annual));
    }

    let per_year = frequency.installments_per_year();
    let amount = annual
        .share(per_year)
        .ok_or(Error::NonPositiveAmount(annual))?;

    (0..u32::from(duration_years) * per_year)
        .map(|i| {
            Ok(Draft {
                number: installment::Number::new(i + 1)
                    .ok_or(Error::DateOutOfRange)?,
                due_date: start
                    .add_months(i * frequency.months_between())
                    .ok_or(Error::DateOutOfRange)?,
                amount,
                status: installment::Status::Unpaid,
            })
        })
        .collect()
}

/// Error of [`generate`]ing a payment schedule.
#[derive(Clone, Copy, Debug, Display, derive_more::Error, Eq, PartialEq)]
pub enum Error {
    /// Duration of a [`Contract`] is zero.
    #[display("duration must be at least 1 year")]
    NonPositiveDuration,

    /// Duration of a [`Contract`] is too long.
    #[display("duration of {_0} years exceeds {MAX_DURATION_YEARS} years")]
    DurationTooLong(#[error(not(source))] u16),

    /// Annual rent amount is not positive.
    #[display("annual amount must be positive, but `{_0}` is given")]
    NonPositiveAmount(#[error(not(source))] Money),

    /// Due date of some [`Installment`] is out of the supported range.
    #[display("due date is out of the supported range")]
    DateOutOfRange,
}
