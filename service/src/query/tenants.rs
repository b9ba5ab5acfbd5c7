//! [`Query`] collection related to the multiple [`Tenant`]s.

use common::operations::By;

use crate::domain::Tenant;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Tenant`]s, ordered by their creation.
pub type All = DatabaseQuery<By<Vec<Tenant>, ()>>;
