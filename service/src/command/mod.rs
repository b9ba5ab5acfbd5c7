//! [`Command`] definition.

pub mod authorize_access;
pub mod authorize_session;
pub mod create_contract;
pub mod create_identity;
pub mod create_maintenance;
pub mod create_property;
pub mod create_session;
pub mod create_tenant;
pub mod disable_identity;
#[cfg(test)]
pub(crate) mod fixture;
pub mod pay_installment;
pub mod update_identity_roles;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_access::AuthorizeAccess, authorize_session::AuthorizeSession,
    create_contract::CreateContract, create_identity::CreateIdentity,
    create_maintenance::CreateMaintenance, create_property::CreateProperty,
    create_session::CreateSession, create_tenant::CreateTenant,
    disable_identity::DisableIdentity, pay_installment::PayInstallment,
    update_identity_roles::UpdateIdentityRoles,
};
