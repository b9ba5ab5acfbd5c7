//! [`Query`] collection related to a single [`Tenant`].

use common::operations::By;

#[cfg(doc)]
use crate::domain::Identity;
use crate::domain::{identity, tenant, Tenant};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Tenant`] by its [`tenant::Id`].
pub type ById = DatabaseQuery<By<Option<Tenant>, tenant::Id>>;

/// Queries a [`Tenant`] linked to the [`Identity`] with the provided
/// [`identity::Id`].
pub type ByIdentityId = DatabaseQuery<By<Option<Tenant>, identity::Id>>;
