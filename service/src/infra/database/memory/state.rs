//! [`State`] of a [`Memory`] database.
//!
//! [`Memory`]: super::Memory

use std::collections::HashMap;

use crate::domain::{
    contract, identity, installment, maintenance, property, tenant, Contract,
    Identity, Installment, Maintenance, Property, Tenant,
};

/// Names of unique constraints enforced by a [`State`].
pub mod constraint {
    /// [`Identity::email`] is unique.
    ///
    /// [`Identity::email`]: crate::domain::Identity::email
    pub const IDENTITY_EMAIL: &str = "identities_email_key";

    /// [`Tenant::identity_id`] is unique.
    ///
    /// [`Tenant::identity_id`]: crate::domain::Tenant::identity_id
    pub const TENANT_IDENTITY: &str = "tenants_identity_id_key";

    /// [`Tenant::tax_code`] is unique.
    ///
    /// [`Tenant::tax_code`]: crate::domain::Tenant::tax_code
    pub const TENANT_TAX_CODE: &str = "tenants_tax_code_key";

    /// [`Property::hash`] is unique.
    ///
    /// [`Property::hash`]: crate::domain::Property::hash
    pub const PROPERTY_HASH: &str = "properties_hash_key";

    /// [`Installment::number`] is unique within its [`Contract`].
    ///
    /// [`Contract`]: crate::domain::Contract
    /// [`Installment::number`]: crate::domain::Installment::number
    pub const INSTALLMENT_NUMBER: &str = "installments_contract_id_number_key";
}

/// All the records stored in a [`Memory`] database.
///
/// [`Memory`]: super::Memory
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Stored [`Identity`]s.
    pub(super) identities: HashMap<identity::Id, Identity>,

    /// Stored [`Tenant`]s.
    pub(super) tenants: HashMap<tenant::Id, Tenant>,

    /// Stored [`Property`]s.
    pub(super) properties: HashMap<property::Id, Property>,

    /// Stored [`Contract`]s.
    pub(super) contracts: HashMap<contract::Id, Contract>,

    /// Stored [`Installment`]s.
    pub(super) installments: HashMap<installment::Id, Installment>,

    /// Stored [`Maintenance`]s.
    pub(super) maintenance: HashMap<maintenance::Id, Maintenance>,
}
