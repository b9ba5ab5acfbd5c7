//! Two-tier authorization policy.
//!
//! The route-level gate ([`Access::check()`]) decides whether a [`Principal`]
//! may perform an action at all, while the ownership gate
//! ([`check_ownership()`]) decides whether it may touch a specific
//! [`Tenant`]-scoped record.

use derive_more::{Display, Error};

use crate::domain::{
    contract, identity::Role, installment, maintenance, tenant,
};
#[cfg(doc)]
use crate::domain::{Contract, Installment, Maintenance, Tenant};

use super::Principal;

/// Route-level access requirement of an action.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Access {
    /// No [`Principal`] is required.
    Public,

    /// Any enabled [`Principal`] is required.
    Authenticated,

    /// An enabled [`Principal`] having any of the listed [`Role`]s is
    /// required.
    Roles(&'static [Role]),
}

impl Access {
    /// [`Access`] granted to administrators only.
    pub const ADMIN: Self = Self::Roles(&[Role::Admin]);

    /// [`Access`] granted to administrators and managers.
    pub const STAFF: Self = Self::Roles(&[Role::Admin, Role::Manager]);

    /// Checks whether the provided [`Principal`] passes this [`Access`]
    /// requirement.
    ///
    /// A disabled [`Principal`] is treated as an absent one.
    ///
    /// # Errors
    ///
    /// [`Denial::Unauthenticated`] if a [`Principal`] is required but absent,
    /// or [`Denial::Forbidden`] if it lacks every required [`Role`].
    pub fn check(self, principal: Option<&Principal>) -> Result<(), Denial> {
        let principal = match (self, principal) {
            (Self::Public, _) => return Ok(()),
            (Self::Authenticated | Self::Roles(_), Some(p)) if p.is_enabled => {
                p
            }
            (Self::Authenticated | Self::Roles(_), _) => {
                return Err(Denial::Unauthenticated)
            }
        };

        match self {
            Self::Roles(required) if !principal.roles.intersects(required) => {
                Err(Denial::Forbidden)
            }
            Self::Public | Self::Authenticated | Self::Roles(_) => Ok(()),
        }
    }
}

/// Checks whether the provided [`Principal`] may act upon a record owned by
/// the [`Tenant`] with the provided ID.
///
/// [Elevated] [`Role`]s bypass this check entirely.
///
/// # Errors
///
/// [`Denial::Forbidden`] if the [`Principal`] is neither elevated nor linked
/// to the `owner`.
///
/// [Elevated]: Role::is_elevated
pub fn check_ownership(
    principal: &Principal,
    owner: tenant::Id,
) -> Result<(), Denial> {
    if principal.roles.is_elevated() || principal.tenant_id == Some(owner) {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

/// [`Tenant`]-scoped record subject to [`check_ownership()`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Resource {
    /// [`Tenant`] profile itself.
    #[display("Tenant({_0})")]
    Tenant(tenant::Id),

    /// [`Contract`] of a [`Tenant`].
    #[display("Contract({_0})")]
    Contract(contract::Id),

    /// [`Installment`] of a [`Tenant`]'s [`Contract`].
    #[display("Installment({_0})")]
    Installment(installment::Id),

    /// [`Maintenance`] requested by a [`Tenant`].
    #[display("Maintenance({_0})")]
    Maintenance(maintenance::Id),
}

/// Reason of an access denial.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum Denial {
    /// No enabled [`Principal`] is present.
    #[display("login required")]
    Unauthenticated,

    /// [`Principal`] is not permitted to perform the action.
    #[display("insufficient permission")]
    Forbidden,
}

#[cfg(test)]
mod spec {
    use crate::{
        auth::Principal,
        domain::{
            identity::{self, Email, Role, Roles},
            tenant,
        },
    };

    use super::{check_ownership, Access, Denial};

    fn principal(roles: &[Role], tenant_id: Option<tenant::Id>) -> Principal {
        Principal {
            identity_id: identity::Id::new(),
            email: Email::new("someone@example.it").unwrap(),
            roles: Roles::new(roles.iter().copied()),
            is_enabled: true,
            tenant_id,
        }
    }

    #[test]
    fn public_needs_nothing() {
        assert_eq!(Access::Public.check(None), Ok(()));
        assert_eq!(Access::Public.check(Some(&principal(&[], None))), Ok(()));
    }

    #[test]
    fn anonymous_is_unauthenticated_never_forbidden() {
        for access in [Access::Authenticated, Access::ADMIN, Access::STAFF] {
            assert_eq!(access.check(None), Err(Denial::Unauthenticated));
        }
    }

    #[test]
    fn disabled_is_unauthenticated() {
        let mut admin = principal(&[Role::Admin], None);
        admin.is_enabled = false;

        assert_eq!(
            Access::ADMIN.check(Some(&admin)),
            Err(Denial::Unauthenticated),
        );
        assert_eq!(
            Access::Authenticated.check(Some(&admin)),
            Err(Denial::Unauthenticated),
        );
    }

    #[test]
    fn role_gate() {
        let tenant = principal(&[Role::Tenant], Some(tenant::Id::new()));
        let manager = principal(&[Role::Manager], None);
        let admin = principal(&[Role::Admin], None);
        let nobody = principal(&[], None);

        assert_eq!(Access::Authenticated.check(Some(&nobody)), Ok(()));
        assert_eq!(Access::STAFF.check(Some(&tenant)), Err(Denial::Forbidden));
        assert_eq!(Access::STAFF.check(Some(&manager)), Ok(()));
        assert_eq!(Access::STAFF.check(Some(&admin)), Ok(()));
        assert_eq!(Access::ADMIN.check(Some(&manager)), Err(Denial::Forbidden));
        assert_eq!(Access::ADMIN.check(Some(&nobody)), Err(Denial::Forbidden));
    }

    #[test]
    fn ownership_gate() {
        let own = tenant::Id::new();
        let other = tenant::Id::new();
        let tenant = principal(&[Role::Tenant], Some(own));

        assert_eq!(check_ownership(&tenant, own), Ok(()));
        assert_eq!(check_ownership(&tenant, other), Err(Denial::Forbidden));
        assert_eq!(
            check_ownership(&principal(&[Role::Tenant], None), own),
            Err(Denial::Forbidden),
        );
        assert_eq!(
            check_ownership(&principal(&[Role::Admin], None), other),
            Ok(()),
        );
        assert_eq!(
            check_ownership(
                &principal(&[Role::Manager, Role::Tenant], Some(own)),
                other,
            ),
            Ok(()),
        );
    }
}
