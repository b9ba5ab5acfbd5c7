//! [`Query`] collection related to [`Maintenance`] requests.

use common::operations::By;

#[cfg(doc)]
use crate::domain::Tenant;
use crate::domain::{maintenance, tenant, Maintenance};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Maintenance`] request by its [`maintenance::Id`].
pub type ById = DatabaseQuery<By<Option<Maintenance>, maintenance::Id>>;

/// Queries [`Maintenance`] requests of the [`Tenant`] with the provided
/// [`tenant::Id`], ordered by their creation.
pub type ByTenantId = DatabaseQuery<By<Vec<Maintenance>, tenant::Id>>;
