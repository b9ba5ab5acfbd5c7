//! [`Query`] collection related to the multiple [`Property`]s.

use common::operations::By;

use crate::domain::Property;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Property`]s, ordered by their creation.
pub type All = DatabaseQuery<By<Vec<Property>, ()>>;
