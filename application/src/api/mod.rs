//! REST API definitions.

pub mod auth;
pub mod contract;
pub mod identity;
pub mod installment;
pub mod maintenance;
pub mod property;
pub mod tenant;

use axum::{
    extract::OriginalUri,
    routing::{get, post, put},
    Extension, Router,
};

use crate::{define_error, error::Failure, Service};

/// Builds the [`Router`] serving the whole REST API on top of the provided
/// [`Service`].
pub fn router(service: Service) -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/identities/:id/roles", put(identity::update_roles))
        .route("/identities/:id/disable", post(identity::disable))
        .route("/properties", post(property::create).get(property::list))
        .route("/properties/:id", get(property::get))
        .route("/tenants", post(tenant::create).get(tenant::list))
        .route("/tenants/:id", get(tenant::get))
        .route("/tenants/:id/contracts", get(contract::list_by_tenant))
        .route("/tenants/:id/maintenance", get(maintenance::list_by_tenant))
        .route("/contracts", post(contract::create))
        .route("/contracts/:id", get(contract::get))
        .route(
            "/contracts/:id/installments",
            get(installment::list_by_contract),
        )
        .route("/installments/:id/pay", post(installment::pay))
        .route("/maintenance", post(maintenance::create))
        .route("/maintenance/:id", get(maintenance::get))
        .fallback(fallback)
        .layer(Extension(service))
}

/// Renders any unknown route as a [`NotFound::Route`] [`Failure`].
#[expect(clippy::unused_async, reason = "`async` is required by `axum`")]
async fn fallback(OriginalUri(uri): OriginalUri) -> Failure {
    Failure {
        error: NotFound::Route.into(),
        path: uri.path().to_owned(),
    }
}

define_error! {
    enum NotFound {
        #[kind = EntityNotFound]
        #[message = "Identity not found"]
        Identity,

        #[kind = EntityNotFound]
        #[message = "Tenant not found"]
        Tenant,

        #[kind = EntityNotFound]
        #[message = "Property not found"]
        Property,

        #[kind = EntityNotFound]
        #[message = "Contract not found"]
        Contract,

        #[kind = EntityNotFound]
        #[message = "Installment not found"]
        Installment,

        #[kind = EntityNotFound]
        #[message = "Maintenance not found"]
        Maintenance,

        #[kind = EntityNotFound]
        #[message = "Route not found"]
        Route,
    }
}
