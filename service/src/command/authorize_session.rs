//! [`Command`] for authorizing a [`Session`].

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    auth::{token, Principal},
    domain::{
        identity::{self, session, Session},
        Identity, Tenant,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`Session`] by its [`session::Token`].
///
/// Resolves the [`Principal`] the [`Session`] was issued for.
#[derive(Clone, Debug, From)]
pub struct AuthorizeSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db> Command<AuthorizeSession> for Service<Db>
where
    Db: for<'l> Database<
            Select<By<Option<Identity>, &'l identity::Email>>,
            Ok = Option<Identity>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Tenant>, identity::Id>>,
            Ok = Option<Tenant>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Principal;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeSession { token } = cmd;

        let session = self
            .config()
            .tokens
            .parse(&token)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        if !session.is_active_at(DateTime::now().coerce()) {
            return Err(tracerr::new!(E::Expired(session.expires_at)));
        }

        let identity = match identity::Email::new(session.subject.as_ref()) {
            Some(email) => self
                .database()
                .execute(Select(By::new(&email)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?,
            None => None,
        }
        .ok_or_else(|| E::IdentityNotExists(session.subject.clone()))
        .map_err(tracerr::wrap!())?;
        if !identity.is_enabled {
            return Err(tracerr::new!(E::IdentityDisabled(identity.id)));
        }

        let tenant = self
            .database()
            .execute(Select(By::<Option<Tenant>, _>::new(identity.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(Principal {
            identity_id: identity.id,
            email: identity.email,
            roles: identity.roles,
            is_enabled: identity.is_enabled,
            tenant_id: tenant.map(|t| t.id),
        })
    }
}

/// Error of [`AuthorizeSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Session`] has expired.
    #[display("`Session` expired at {}", _0.to_rfc3339())]
    #[from(ignore)]
    Expired(#[error(not(source))] session::ExpirationDateTime),

    /// [`Identity`] the [`Session`] was issued for is disabled.
    #[display("`Identity(id: {_0})` is disabled")]
    #[from(ignore)]
    IdentityDisabled(#[error(not(source))] identity::Id),

    /// [`Identity`] the [`Session`] was issued for does not exist.
    #[display("`Identity` of `{_0}` does not exist")]
    #[from(ignore)]
    IdentityNotExists(#[error(not(source))] session::Subject),

    /// [`session::Token`] cannot be parsed.
    #[display("{_0}")]
    Token(token::ParseError),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use secrecy::SecretBox;

    use crate::{
        auth::token::ParseError,
        command::{fixture, CreateIdentity, CreateTenant, DisableIdentity},
        domain::{
            identity::{
                session::{Subject, Token},
                Email, Password, Role, Roles,
            },
            tenant,
        },
        Command as _,
    };

    use super::{AuthorizeSession, ExecutionError};

    #[tokio::test]
    async fn resolves_principal_with_linked_tenant() {
        let service = fixture::service();
        let identity = service
            .execute(CreateIdentity {
                email: Email::new("mario@example.it").unwrap(),
                password: SecretBox::new(Box::new(
                    Password::new("pass").unwrap(),
                )),
                roles: Roles::new([Role::Tenant]),
            })
            .await
            .unwrap();
        let tenant = service
            .execute(CreateTenant {
                identity_id: identity.id,
                tax_code: tenant::TaxCode::new("RSSMRA85T10A562S").unwrap(),
                first_name: tenant::Name::new("Mario").unwrap(),
                last_name: tenant::Name::new("Rossi").unwrap(),
                email: None,
                phone: None,
            })
            .await
            .unwrap();
        let (token, _) = service
            .config()
            .tokens
            .issue(Subject::from(&identity.email))
            .unwrap();

        let principal =
            service.execute(AuthorizeSession { token }).await.unwrap();

        assert_eq!(principal.identity_id, identity.id);
        assert_eq!(principal.tenant_id, Some(tenant.id));
        assert!(principal.roles.contains(Role::Tenant));
    }

    #[tokio::test]
    async fn rejects_bad_tokens() {
        let service = fixture::service();
        let subject = Subject::from("mario@example.it");

        let malformed = service
            .execute(AuthorizeSession {
                token: Token::new_unchecked("garbage".into()),
            })
            .await
            .unwrap_err();
        let (expired, _) = service
            .config()
            .tokens
            .issue_at(
                subject.clone(),
                DateTime::now() - Duration::from_secs(25 * 60 * 60),
            )
            .unwrap();
        let expired = service
            .execute(AuthorizeSession { token: expired })
            .await
            .unwrap_err();
        let (unknown, _) = service.config().tokens.issue(subject).unwrap();
        let unknown = service
            .execute(AuthorizeSession { token: unknown })
            .await
            .unwrap_err();

        assert!(matches!(
            malformed.as_ref(),
            ExecutionError::Token(ParseError::Malformed(_)),
        ));
        assert!(matches!(expired.as_ref(), ExecutionError::Expired(_)));
        assert!(matches!(
            unknown.as_ref(),
            ExecutionError::IdentityNotExists(_),
        ));
    }

    #[tokio::test]
    async fn rejects_disabled_identity() {
        let service = fixture::service();
        let identity = service
            .execute(CreateIdentity {
                email: Email::new("mario@example.it").unwrap(),
                password: SecretBox::new(Box::new(
                    Password::new("pass").unwrap(),
                )),
                roles: Roles::new([Role::Admin]),
            })
            .await
            .unwrap();
        let (token, _) = service
            .config()
            .tokens
            .issue(Subject::from(&identity.email))
            .unwrap();
        drop(
            service
                .execute(DisableIdentity {
                    identity_id: identity.id,
                })
                .await
                .unwrap(),
        );

        let err = service.execute(AuthorizeSession { token }).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::IdentityDisabled(_)));
    }
}
