//! [`Command`] for authorizing a [`User`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`User`] by a [`Session`] token.
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db> Command<AuthorizeUserSession> for Service<Db>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let session = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config.jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        // Role is read from the storage, so revoked privileges apply to
        // already issued tokens too.
        self.database()
            .execute(Select(By::new(session.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::UserNotExists(session.user_id))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`User`] the [`Session`] belongs to does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use jsonwebtoken::{EncodingKey, Header};

    use crate::{
        command::Command as _,
        domain::user::{self, session, Session},
        infra::Memory,
        test_util::{service, user, SECRET},
    };

    use super::{AuthorizeUserSession, ExecutionError};

    fn token(user_id: user::Id, expires_in: i64) -> session::Token {
        let session = Session {
            user_id,
            expires_at: DateTime::from_unix_timestamp(
                DateTime::now().unix_timestamp() + expires_in,
            )
            .unwrap()
            .coerce(),
        };
        session::Token::from(
            jsonwebtoken::encode(
                &Header::default(),
                &session,
                &EncodingKey::from_secret(SECRET),
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn authorizes_existing_user() {
        let db = Memory::default();
        let admin = user(&db, user::Role::Admin).await;
        let svc = service(db);

        let authorized = svc
            .execute(AuthorizeUserSession {
                token: token(admin.id, 3600),
            })
            .await
            .unwrap();

        assert_eq!(authorized.id, admin.id);
        assert!(authorized.is_admin());
    }

    #[tokio::test]
    async fn rejects_unknown_user() {
        let svc = service(Memory::default());
        let id = user::Id::new();

        let err = svc
            .execute(AuthorizeUserSession {
                token: token(id, 3600),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::UserNotExists(missing) if *missing == id,
        ));
    }

    #[tokio::test]
    async fn rejects_expired_and_malformed_tokens() {
        let db = Memory::default();
        let user = user(&db, user::Role::User).await;
        let svc = service(db);

        let err = svc
            .execute(AuthorizeUserSession {
                token: token(user.id, -3600),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));

        let err = svc
            .execute(AuthorizeUserSession {
                token: session::Token::from("not-a-jwt".to_owned()),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }
}
