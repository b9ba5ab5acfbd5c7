//! Shared setup of command tests.

use std::time::Duration;

use common::{money::Currency, Date, Money};
use rust_decimal::Decimal;
use secrecy::SecretBox;

use crate::{
    auth::Tokens,
    domain::{
        contract::Frequency,
        identity::{Email, Password, Role, Roles},
        property, tenant, Contract, Identity, Property, Tenant,
    },
    infra::Memory,
    Command as _, Config, Service,
};

use super::{CreateContract, CreateIdentity, CreateProperty, CreateTenant};

/// Creates a new [`Service`] backed by an empty in-memory database.
pub(crate) fn service() -> Service<Memory> {
    Service::new(
        Config {
            tokens: Tokens::new(b"test-secret", Duration::from_secs(60 * 60)),
        },
        Memory::new(),
    )
}

/// Creates a new [`Identity`] with the provided `email` and `roles`.
pub(crate) async fn identity(
    service: &Service<Memory>,
    email: &str,
    roles: &[Role],
) -> Identity {
    service
        .execute(CreateIdentity {
            email: Email::new(email).unwrap(),
            password: SecretBox::new(Box::new(Password::new("pass").unwrap())),
            roles: Roles::new(roles.iter().copied()),
        })
        .await
        .unwrap()
}

/// Creates a new [`Tenant`] along with its own [`Identity`].
pub(crate) async fn tenant(
    service: &Service<Memory>,
    email: &str,
    tax_code: &str,
) -> Tenant {
    let identity = identity(service, email, &[Role::Tenant]).await;
    service
        .execute(CreateTenant {
            identity_id: identity.id,
            tax_code: tenant::TaxCode::new(tax_code).unwrap(),
            first_name: tenant::Name::new("Mario").unwrap(),
            last_name: tenant::Name::new("Rossi").unwrap(),
            email: None,
            phone: None,
        })
        .await
        .unwrap()
}

/// Creates a new residential [`Property`] at the provided `address`.
pub(crate) async fn property(
    service: &Service<Memory>,
    address: &str,
) -> Property {
    service
        .execute(CreateProperty {
            address: property::Address::new(address).unwrap(),
            city: property::City::new("Milano").unwrap(),
            surface: property::Surface::new(Decimal::from(80)).unwrap(),
            variant: property::Variant::Residential { floor: 2, rooms: 3 },
        })
        .await
        .unwrap()
}

/// Creates a new yearly quarterly [`Contract`] of 1200 EUR.
pub(crate) async fn contract(
    service: &Service<Memory>,
    tenant: &Tenant,
    property: &Property,
) -> Contract {
    service
        .execute(CreateContract {
            tenant_id: tenant.id,
            property_id: property.id,
            start_date: Date::from_calendar(2024, 1, 15).unwrap(),
            duration_years: 1,
            annual_rent: Money {
                amount: Decimal::from(1200),
                currency: Currency::Eur,
            },
            frequency: Frequency::Quarterly,
        })
        .await
        .unwrap()
        .contract
}
