//! Issuing and validating of [`Session`] [`Token`]s.

use std::time::Duration;

use common::DateTime;
use derive_more::{Debug, Display, Error};
use jsonwebtoken::{
    errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::domain::identity::{
    session::{Subject, Token},
    Session,
};

/// Issuer and validator of stateless [HS256]-signed [JWT]s carrying
/// [`Session`] claims.
///
/// Issued [`Token`]s can't be revoked before they expire.
///
/// [HS256]: https://datatracker.ietf.org/doc/html/rfc7518#section-3.2
/// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
#[derive(Clone, Debug)]
pub struct Tokens {
    /// Key signing new [`Token`]s.
    #[debug(skip)]
    encoding_key: EncodingKey,

    /// Key verifying [`Token`] signatures.
    #[debug(skip)]
    decoding_key: DecodingKey,

    /// Lifetime of issued [`Token`]s.
    lifetime: Duration,
}

impl Tokens {
    /// Default lifetime of issued [`Token`]s.
    pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

    /// Creates new [`Tokens`] signing with the provided symmetric `secret`.
    #[must_use]
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime,
        }
    }

    /// Returns the lifetime of [`Token`]s issued by these [`Tokens`].
    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issues a new [`Token`] for the provided [`Subject`] valid from now.
    ///
    /// # Errors
    ///
    /// If the claims cannot be signed.
    pub fn issue(
        &self,
        subject: Subject,
    ) -> Result<(Token, Session), IssueError> {
        self.issue_at(subject, DateTime::now())
    }

    /// Issues a new [`Token`] for the provided [`Subject`] as if it was `now`.
    ///
    /// # Errors
    ///
    /// If the claims cannot be signed.
    pub fn issue_at(
        &self,
        subject: Subject,
        now: DateTime,
    ) -> Result<(Token, Session), IssueError> {
        let session = Session {
            subject,
            issued_at: now.coerce(),
            expires_at: (now + self.lifetime).coerce(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &session,
            &self.encoding_key,
        )
        .map_err(IssueError)?;

        Ok((Token::new_unchecked(token), session))
    }

    /// Parses the provided [`Token`] into its [`Session`] claims, verifying
    /// its signature.
    ///
    /// Expiration is not checked here, see [`Tokens::validate()`].
    ///
    /// # Errors
    ///
    /// [`ParseError::Invalid`] if the signature doesn't verify, or
    /// [`ParseError::Malformed`] if the [`Token`] cannot be decoded.
    pub fn parse(&self, token: &Token) -> Result<Session, ParseError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.decoding_key,
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            if matches!(
                e.kind(),
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm,
            ) {
                ParseError::Invalid(e)
            } else {
                ParseError::Malformed(e)
            }
        })
    }

    /// Checks whether the provided [`Token`] was signed by these [`Tokens`]
    /// for the `expected` [`Subject`] and has not expired yet.
    #[must_use]
    pub fn validate(&self, token: &Token, expected: &Subject) -> bool {
        self.validate_at(token, expected, DateTime::now())
    }

    /// Same as [`Tokens::validate()`], but checks expiration against the
    /// provided `now` moment.
    #[must_use]
    pub fn validate_at(
        &self,
        token: &Token,
        expected: &Subject,
        now: DateTime,
    ) -> bool {
        self.parse(token).is_ok_and(|s| {
            &s.subject == expected && s.is_active_at(now.coerce())
        })
    }
}

/// Error of issuing a [`Token`].
#[derive(Debug, Display, Error)]
#[display("failed to sign `Token`: {_0}")]
pub struct IssueError(jsonwebtoken::errors::Error);

/// Error of parsing a [`Token`].
#[derive(Debug, Display, Error)]
pub enum ParseError {
    /// [`Token`] signature doesn't verify.
    #[display("`Token` signature is invalid: {_0}")]
    Invalid(jsonwebtoken::errors::Error),

    /// [`Token`] structure cannot be decoded.
    #[display("`Token` is malformed: {_0}")]
    Malformed(jsonwebtoken::errors::Error),
}
