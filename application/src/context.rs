//! [`Context`]-related definitions.

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use service::{
    command::{self, Command as _},
    domain::{user::session, User},
};
use tokio::sync::OnceCell;

use crate::{define_error, AsError, Error, Service};

/// Request context.
///
/// Authenticates the current [`User`] lazily, only once it's asked for.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Parts of the HTTP request.
    parts: http::request::Parts,

    /// Authenticated [`User`] of the HTTP request.
    current_user: OnceCell<User>,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the [`User`] authenticated by the `Authorization: Bearer`
    /// header of the HTTP request.
    ///
    /// # Errors
    ///
    /// Errors if:
    /// - the HTTP request carries no token;
    /// - the token is invalid or expired;
    /// - the [`User`] of the token doesn't exist anymore.
    pub async fn current_user(&self) -> Result<&User, Error> {
        self.current_user
            .get_or_try_init(|| self.authenticate())
            .await
    }

    /// Performs the [`User`] authentication.
    async fn authenticate(&self) -> Result<User, Error> {
        let TypedHeader(Authorization(bearer)) = self
            .parts
            .clone()
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|e| {
                if e.is_missing() {
                    AuthError::AuthorizationRequired.into()
                } else {
                    e.into_error()
                }
            })?;

        self.service
            .execute(command::AuthorizeUserSession {
                token: session::Token::from(bearer.token().to_owned()),
            })
            .await
            .map_err(AsError::into_error)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service = parts
            .extensions
            .get::<Service>()
            .cloned()
            .ok_or_else(|| Error::internal(&"missing `Service` extension"))?;

        Ok(Self {
            service,
            parts: parts.clone(),
            current_user: OnceCell::new(),
        })
    }
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenDecodeError(_) => {
                Some(AuthError::InvalidToken.into())
            }
            Self::UserNotExists(_) => Some(AuthError::UnknownUser.into()),
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,

        #[code = "INVALID_TOKEN"]
        #[status = UNAUTHORIZED]
        #[message = "Invalid or expired token"]
        InvalidToken,

        #[code = "UNKNOWN_USER"]
        #[status = UNAUTHORIZED]
        #[message = "User of the token does not exist"]
        UnknownUser,
    }
}
