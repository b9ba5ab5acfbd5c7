//! Application provides API for interacting with the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod error;

use secrecy::SecretBox;
use service::{
    command::{self, Command as _},
    domain::identity::{self, Role, Roles},
};
// Used in binary.
use axum_client_ip as _;
use tower_http as _;
use tracing_subscriber as _;
// Used in tests.
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tower as _;

pub use self::{
    args::Args,
    config::Config,
    context::Context,
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Memory>;

/// Creates the configured administrator, unless its email is registered
/// already.
///
/// # Errors
///
/// If the credentials are malformed or the [`identity::Identity`] cannot be
/// created.
pub async fn bootstrap_admin(
    service: &Service,
    admin: &config::Admin,
) -> Result<(), Error> {
    let email = admin.email.parse::<identity::Email>().map_err(|e| {
        Error::internal(&format!("invalid administrator email: {e}"))
    })?;
    let password =
        admin.password.parse::<identity::Password>().map_err(|e| {
            Error::internal(&format!("invalid administrator password: {e}"))
        })?;

    match service
        .execute(command::CreateIdentity {
            email,
            password: SecretBox::new(Box::new(password)),
            roles: Roles::new([Role::Admin]),
        })
        .await
    {
        Ok(identity) => {
            tracing::info!(identity.id = %identity.id, "administrator created");
            Ok(())
        }
        Err(e) => match e.as_ref() {
            command::create_identity::ExecutionError::EmailOccupied(email) => {
                tracing::debug!(%email, "administrator is registered already");
                Ok(())
            }
            command::create_identity::ExecutionError::Blocking(_)
            | command::create_identity::ExecutionError::Db(_)
            | command::create_identity::ExecutionError::PasswordHash(_) => {
                Err(e.into_error())
            }
        },
    }
}

#[cfg(test)]
mod spec {
    use service::{
        domain::identity::{Email, Role},
        infra::Memory,
        query, Query as _,
    };

    use crate::{
        bootstrap_admin,
        config::{self, Admin},
        Service,
    };

    #[tokio::test]
    async fn bootstraps_admin_once() {
        let service =
            Service::new((&config::Service::default()).into(), Memory::new());
        let admin = Admin {
            email: "admin@example.it".to_owned(),
            password: "secret".to_owned(),
        };

        bootstrap_admin(&service, &admin).await.unwrap();
        bootstrap_admin(&service, &admin).await.unwrap();

        let email = Email::new("admin@example.it").unwrap();
        let identity = service
            .execute(query::identity::ByEmail::by(&email))
            .await
            .unwrap()
            .unwrap();
        assert!(identity.roles.contains(Role::Admin));
    }

    #[tokio::test]
    async fn rejects_malformed_admin() {
        let service =
            Service::new((&config::Service::default()).into(), Memory::new());
        let admin = Admin {
            email: "not-an-email".to_owned(),
            password: "secret".to_owned(),
        };

        assert!(bootstrap_admin(&service, &admin).await.is_err());
    }
}
