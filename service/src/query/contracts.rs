//! [`Query`] collection related to the multiple [`Contract`]s.

use common::operations::By;

#[cfg(doc)]
use crate::domain::Tenant;
use crate::domain::{tenant, Contract};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries [`Contract`]s of the [`Tenant`] with the provided [`tenant::Id`],
/// ordered by their start dates.
pub type ByTenantId = DatabaseQuery<By<Vec<Contract>, tenant::Id>>;
