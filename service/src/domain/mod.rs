//! Domain definitions.

pub mod contract;
pub mod identity;
pub mod installment;
pub mod maintenance;
pub mod property;
pub mod tenant;

pub use self::{
    contract::Contract, identity::Identity, installment::Installment,
    maintenance::Maintenance, property::Property, tenant::Tenant,
};
