//! Fixtures shared by tests.

use common::{operations::Insert, DateTime};
use rust_decimal::Decimal;

use crate::{
    domain::{listing, user, Listing, User},
    infra::{Database as _, Memory},
    Config, Service,
};

/// Secret the [`Session`] tokens are signed with in tests.
///
/// [`Session`]: crate::domain::user::Session
pub(crate) const SECRET: &[u8] = b"secret";

/// Creates a new [`Service`] over the provided [`Memory`] database.
pub(crate) fn service(db: Memory) -> Service<Memory> {
    Service::new(
        Config {
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(SECRET),
        },
        db,
    )
}

/// Stores a new [`User`] with the provided [`user::Role`].
pub(crate) async fn user(db: &Memory, role: user::Role) -> User {
    let user = User {
        id: user::Id::new(),
        name: user::Name::new("Test User").unwrap(),
        email: user::Email::new("user@example.com"),
        role,
        created_at: DateTime::now().coerce(),
    };
    db.execute(Insert(user.clone())).await.unwrap();
    user
}

/// Creates a new available [`Listing`] without storing it.
pub(crate) fn draft(
    owner_id: Option<user::Id>,
    price: u32,
    bedrooms: listing::RoomsCount,
) -> Listing {
    Listing {
        id: listing::Id::new(),
        title: listing::Title::new("Test listing").unwrap(),
        description: None,
        price: listing::Price::new(Decimal::from(price)).unwrap(),
        location: listing::Location::new("Chapinero, Bogotá").unwrap(),
        bedrooms,
        bathrooms: 1,
        area: listing::Area::ZERO,
        kind: listing::Kind::House,
        status: listing::Status::Available,
        images: vec![],
        model_url: None,
        features: vec![],
        owner_id,
        created_at: DateTime::now().coerce(),
    }
}

/// Stores the provided [`Listing`].
pub(crate) async fn store(db: &Memory, listing: Listing) -> Listing {
    db.execute(Insert(listing.clone())).await.unwrap();
    listing
}

/// Stores a new available [`Listing`].
pub(crate) async fn listing(
    db: &Memory,
    owner_id: Option<user::Id>,
    price: u32,
    bedrooms: listing::RoomsCount,
) -> Listing {
    store(db, draft(owner_id, price, bedrooms)).await
}
