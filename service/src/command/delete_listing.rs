//! [`Command`] for deleting a [`Listing`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{listing, user, Listing, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Listing`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteListing {
    /// ID of the [`Listing`] to be deleted.
    pub listing_id: listing::Id,

    /// ID of the [`User`] who deletes the [`Listing`].
    pub initiator_id: user::Id,
}

impl<Db> Command<DeleteListing> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Listing, listing::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Listing>, listing::Id>>,
            Ok = Option<Listing>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Listing, listing::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteListing) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteListing {
            listing_id,
            initiator_id,
        } = cmd;

        let initiator = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(initiator_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent modifications of the same `Listing`.
        tx.execute(Lock(By::<Listing, _>::new(listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let listing = tx
            .execute(Select(By::<Option<Listing>, _>::new(listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ListingNotExists(listing_id))
            .map_err(tracerr::wrap!())?;

        if !listing.is_manageable_by(&initiator) {
            return Err(tracerr::new!(E::NotOwner(initiator_id)));
        }

        tx.execute(Delete(By::<Listing, _>::new(listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        log::info!(
            "`Listing(id: {listing_id})` deleted by `User(id: {initiator_id})`",
        );

        Ok(listing)
    }
}

/// Error of [`DeleteListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Listing`] with the provided ID does not exist.
    #[display("`Listing(id: {_0})` does not exist")]
    ListingNotExists(#[error(not(source))] listing::Id),

    /// [`User`] is neither the owner of the [`Listing`] nor an admin.
    #[display("`User(id: {_0})` is not allowed to delete the `Listing`")]
    NotOwner(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::Command as _,
        domain::{listing, user},
        infra::Memory,
        query::{self, Query as _},
        test_util::{listing, service, user},
    };

    use super::{DeleteListing, ExecutionError};

    #[tokio::test]
    async fn stranger_cannot_delete() {
        let db = Memory::default();
        let owner = user(&db, user::Role::User).await;
        let stranger = user(&db, user::Role::User).await;
        let listing = listing(&db, Some(owner.id), 100, 3).await;
        let svc = service(db);

        let err = svc
            .execute(DeleteListing {
                listing_id: listing.id,
                initiator_id: stranger.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NotOwner(_)));

        let kept = svc
            .execute(query::listing::ById::by(listing.id))
            .await
            .unwrap();
        assert!(kept.is_some());
    }

    #[tokio::test]
    async fn owner_and_admin_delete() {
        let db = Memory::default();
        let owner = user(&db, user::Role::User).await;
        let admin = user(&db, user::Role::Admin).await;
        let own = listing(&db, Some(owner.id), 100, 3).await;
        let orphan = listing(&db, None, 200, 2).await;
        let svc = service(db);

        for (listing_id, initiator_id) in [(own.id, owner.id), (orphan.id, admin.id)]
        {
            let deleted = svc
                .execute(DeleteListing {
                    listing_id,
                    initiator_id,
                })
                .await
                .unwrap();
            assert_eq!(deleted.id, listing_id);

            let gone = svc
                .execute(query::listing::ById::by(listing_id))
                .await
                .unwrap();
            assert!(gone.is_none());
        }

        let missing = listing::Id::new();
        let err = svc
            .execute(DeleteListing {
                listing_id: missing,
                initiator_id: admin.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::ListingNotExists(id) if *id == missing,
        ));
    }
}
