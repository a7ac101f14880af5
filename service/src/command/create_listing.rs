//! [`Command`] for creating a new [`Listing`].

use common::{operations::Insert, DateTime};
use tracerr::Traced;

use crate::{
    domain::{listing, user, Listing},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::User;

use super::Command;

/// [`Command`] for creating a new [`Listing`].
///
/// Omitted optional fields fall back to their defaults: no rooms, zero
/// [`listing::Area`], [`listing::Kind::House`], [`listing::Status::Available`]
/// and no images or features.
#[derive(Clone, Debug)]
pub struct CreateListing {
    /// ID of the [`User`] creating and owning the new [`Listing`].
    pub owner_id: user::Id,

    /// [`listing::Title`] of a new [`Listing`].
    pub title: listing::Title,

    /// [`listing::Description`] of a new [`Listing`].
    pub description: Option<listing::Description>,

    /// [`listing::Price`] of a new [`Listing`].
    pub price: listing::Price,

    /// [`listing::Location`] of a new [`Listing`].
    pub location: listing::Location,

    /// Number of bedrooms of a new [`Listing`].
    pub bedrooms: Option<listing::RoomsCount>,

    /// Number of bathrooms of a new [`Listing`].
    pub bathrooms: Option<listing::RoomsCount>,

    /// [`listing::Area`] of a new [`Listing`].
    pub area: Option<listing::Area>,

    /// [`listing::Kind`] of a new [`Listing`].
    pub kind: Option<listing::Kind>,

    /// [`listing::Status`] of a new [`Listing`].
    pub status: Option<listing::Status>,

    /// [`listing::ImageUrl`]s of a new [`Listing`].
    pub images: Option<Vec<listing::ImageUrl>>,

    /// [`listing::ModelUrl`] of a new [`Listing`].
    pub model_url: Option<listing::ModelUrl>,

    /// [`listing::Feature`]s of a new [`Listing`].
    pub features: Option<Vec<listing::Feature>>,
}

impl<Db> Command<CreateListing> for Service<Db>
where
    Db: Database<Insert<Listing>, Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateListing) -> Result<Self::Ok, Self::Err> {
        let CreateListing {
            owner_id,
            title,
            description,
            price,
            location,
            bedrooms,
            bathrooms,
            area,
            kind,
            status,
            images,
            model_url,
            features,
        } = cmd;

        let listing = Listing {
            id: listing::Id::new(),
            title,
            description,
            price,
            location,
            bedrooms: bedrooms.unwrap_or_default(),
            bathrooms: bathrooms.unwrap_or_default(),
            area: area.unwrap_or(listing::Area::ZERO),
            kind: kind.unwrap_or(listing::Kind::House),
            status: status.unwrap_or(listing::Status::Available),
            images: images.unwrap_or_default(),
            model_url,
            features: features.unwrap_or_default(),
            owner_id: Some(owner_id),
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(listing.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(listing)
    }
}

/// Error of [`CreateListing`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::{
        command::Command as _,
        domain::{listing, user},
        infra::Memory,
        query::{self, Query as _},
        test_util::{service, user},
    };

    use super::CreateListing;

    #[tokio::test]
    async fn fills_defaults_and_owner() {
        let db = Memory::default();
        let owner = user(&db, user::Role::User).await;
        let svc = service(db);

        let created = svc
            .execute(CreateListing {
                owner_id: owner.id,
                title: listing::Title::new("Loft").unwrap(),
                description: None,
                price: listing::Price::new(Decimal::from(1500)).unwrap(),
                location: listing::Location::new("Usaquén").unwrap(),
                bedrooms: None,
                bathrooms: Some(1),
                area: None,
                kind: None,
                status: None,
                images: None,
                model_url: None,
                features: None,
            })
            .await
            .unwrap();

        assert_eq!(created.owner_id, Some(owner.id));
        assert_eq!(created.bedrooms, 0);
        assert_eq!(created.bathrooms, 1);
        assert_eq!(created.area, listing::Area::ZERO);
        assert_eq!(created.kind, listing::Kind::House);
        assert_eq!(created.status, listing::Status::Available);
        assert!(created.images.is_empty());
        assert!(created.features.is_empty());

        let stored = svc
            .execute(query::listing::ById::by(created.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.listing.title, created.title);
        assert_eq!(stored.owner.map(|o| o.name), Some(owner.name));

        let owned = svc
            .execute(query::listings::ByOwner::by(owner.id))
            .await
            .unwrap();
        assert_eq!(owned.len(), 1);
    }
}
