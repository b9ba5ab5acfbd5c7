//! Authentication and authorization definitions.

pub mod policy;
pub mod token;

use crate::domain::{identity, tenant};
#[cfg(doc)]
use crate::domain::{Identity, Tenant};

pub use self::{
    policy::{Access, Denial, Resource},
    token::Tokens,
};

/// Authenticated [`Identity`] acting within a single request.
///
/// Holds a snapshot of the [`Identity`] state taken at authentication time,
/// which is never refreshed during the request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Principal {
    /// ID of the authenticated [`Identity`].
    pub identity_id: identity::Id,

    /// [`identity::Email`] of the authenticated [`Identity`].
    pub email: identity::Email,

    /// [`identity::Roles`] of the authenticated [`Identity`].
    pub roles: identity::Roles,

    /// Indicator whether the authenticated [`Identity`] is enabled.
    pub is_enabled: bool,

    /// ID of the [`Tenant`] linked to the authenticated [`Identity`], if any.
    pub tenant_id: Option<tenant::Id>,
}
