//! [`Query`] collection related to the multiple [`Installment`]s.

use common::operations::By;

#[cfg(doc)]
use crate::domain::Contract;
use crate::domain::{contract, Installment};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries [`Installment`]s of the [`Contract`] with the provided
/// [`contract::Id`], ordered by their numbers.
pub type ByContractId = DatabaseQuery<By<Vec<Installment>, contract::Id>>;
