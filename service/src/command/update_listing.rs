//! [`Command`] for updating an existing [`Listing`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
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

/// [`Command`] for updating an existing [`Listing`] with a
/// [`listing::Patch`].
///
/// The `patch` may be a raw input convertible into a [`listing::Patch`]. It's
/// converted only once the initiator is allowed to update the [`Listing`].
#[derive(Clone, Debug)]
pub struct UpdateListing<P = listing::Patch> {
    /// ID of the [`Listing`] to be updated.
    pub listing_id: listing::Id,

    /// ID of the [`User`] who updates the [`Listing`].
    pub initiator_id: user::Id,

    /// Changes to apply.
    pub patch: P,
}

impl<Db, P> Command<UpdateListing<P>> for Service<Db>
where
    P: TryInto<listing::Patch>,
    listing::InvalidField: From<P::Error>,
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
        > + Database<Update<Listing>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateListing<P>,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateListing {
            listing_id,
            initiator_id,
            patch,
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

        let mut listing = tx
            .execute(Select(By::<Option<Listing>, _>::new(listing_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ListingNotExists(listing_id))
            .map_err(tracerr::wrap!())?;

        if !listing.is_manageable_by(&initiator) {
            return Err(tracerr::new!(E::NotOwner(initiator_id)));
        }
        let patch = patch
            .try_into()
            .map_err(|e| tracerr::new!(E::InvalidPatch(e.into())))?;
        if patch.is_empty() {
            return Err(tracerr::new!(E::EmptyPatch));
        }

        listing.apply(patch);

        tx.execute(Update(listing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        log::info!(
            "`Listing(id: {listing_id})` updated by `User(id: {initiator_id})`",
        );

        Ok(listing)
    }
}

/// Error of [`UpdateListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`listing::Patch`] changes nothing.
    #[display("`listing::Patch` has no fields to update")]
    EmptyPatch,

    /// Raw input cannot be converted into a [`listing::Patch`].
    #[display("`listing::Patch` is invalid: {_0}")]
    InvalidPatch(#[error(not(source))] listing::InvalidField),

    /// [`Listing`] with the provided ID does not exist.
    #[display("`Listing(id: {_0})` does not exist")]
    ListingNotExists(#[error(not(source))] listing::Id),

    /// [`User`] is neither the owner of the [`Listing`] nor an admin.
    #[display("`User(id: {_0})` is not allowed to update the `Listing`")]
    NotOwner(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::{
        command::Command as _,
        domain::{listing, user},
        infra::Memory,
        test_util::{draft, listing, service, store, user},
    };

    use super::{ExecutionError, UpdateListing};

    fn price_patch(amount: u32) -> listing::Patch {
        listing::Patch {
            price: listing::Price::new(Decimal::from(amount)),
            ..listing::Patch::default()
        }
    }

    #[tokio::test]
    async fn owner_updates() {
        let db = Memory::default();
        let owner = user(&db, user::Role::User).await;
        let listing = listing(&db, Some(owner.id), 100, 3).await;
        let svc = service(db);

        let updated = svc
            .execute(UpdateListing {
                listing_id: listing.id,
                initiator_id: owner.id,
                patch: price_patch(120),
            })
            .await
            .unwrap();

        assert_eq!(Decimal::from(updated.price), Decimal::from(120));
        assert_eq!(updated.owner_id, Some(owner.id));
        assert_eq!(updated.created_at, listing.created_at);
    }

    #[tokio::test]
    async fn only_owner_or_admin_updates() {
        let db = Memory::default();
        let owner = user(&db, user::Role::User).await;
        let stranger = user(&db, user::Role::User).await;
        let admin = user(&db, user::Role::Admin).await;
        let listing = listing(&db, Some(owner.id), 100, 3).await;
        let svc = service(db);

        let err = svc
            .execute(UpdateListing {
                listing_id: listing.id,
                initiator_id: stranger.id,
                patch: price_patch(1),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotOwner(id) if *id == stranger.id,
        ));

        let updated = svc
            .execute(UpdateListing {
                listing_id: listing.id,
                initiator_id: admin.id,
                patch: listing::Patch {
                    status: Some(listing::Status::Sold),
                    ..listing::Patch::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(updated.status, listing::Status::Sold);
        assert_eq!(Decimal::from(updated.price), Decimal::from(100));
    }

    #[tokio::test]
    async fn rejects_unknown_listing_before_empty_patch() {
        let db = Memory::default();
        let owner = user(&db, user::Role::User).await;
        let listing = listing(&db, Some(owner.id), 100, 3).await;
        let svc = service(db);

        let missing = listing::Id::new();
        let err = svc
            .execute(UpdateListing {
                listing_id: missing,
                initiator_id: owner.id,
                patch: listing::Patch::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::ListingNotExists(id) if *id == missing,
        ));

        let err = svc
            .execute(UpdateListing {
                listing_id: listing.id,
                initiator_id: owner.id,
                patch: listing::Patch::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::EmptyPatch));
    }

    /// Raw input failing to convert into a [`listing::Patch`].
    #[derive(Clone, Copy, Debug)]
    struct Malformed;

    impl TryFrom<Malformed> for listing::Patch {
        type Error = listing::InvalidField;

        fn try_from(_: Malformed) -> Result<Self, Self::Error> {
            Err(listing::InvalidField("price"))
        }
    }

    #[tokio::test]
    async fn authorizes_before_validating_patch() {
        let db = Memory::default();
        let owner = user(&db, user::Role::User).await;
        let stranger = user(&db, user::Role::User).await;
        let listing = listing(&db, Some(owner.id), 100, 3).await;
        let svc = service(db);

        let missing = listing::Id::new();
        let err = svc
            .execute(UpdateListing {
                listing_id: missing,
                initiator_id: stranger.id,
                patch: Malformed,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::ListingNotExists(id) if *id == missing,
        ));

        let err = svc
            .execute(UpdateListing {
                listing_id: listing.id,
                initiator_id: stranger.id,
                patch: Malformed,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NotOwner(_)));

        let err = svc
            .execute(UpdateListing {
                listing_id: listing.id,
                initiator_id: owner.id,
                patch: Malformed,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::InvalidPatch(listing::InvalidField("price")),
        ));
    }

    #[tokio::test]
    async fn clears_description() {
        let db = Memory::default();
        let owner = user(&db, user::Role::User).await;
        let mut draft = draft(Some(owner.id), 100, 3);
        draft.description = listing::Description::new("Sunny");
        let listing = store(&db, draft).await;
        let svc = service(db);

        let updated = svc
            .execute(UpdateListing {
                listing_id: listing.id,
                initiator_id: owner.id,
                patch: listing::Patch {
                    description: Some(None),
                    ..listing::Patch::default()
                },
            })
            .await
            .unwrap();
        assert!(updated.description.is_none());
    }
}
