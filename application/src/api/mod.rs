//! HTTP API definitions.

pub mod listing;
mod mutation;
mod query;

use axum::{routing::get, Router};
use serde::Serialize;
use service::{command, domain};

use crate::{define_error, AsError, Error};

pub use self::listing::Listing;

/// Builds the [`Router`] serving the HTTP API.
///
/// The [`Service`] is expected to be provided as an [`axum::Extension`].
///
/// [`Service`]: crate::Service
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route(
            "/api/properties",
            get(query::list_listings).post(mutation::create_listing),
        )
        .route(
            "/api/properties/user/my-properties",
            get(query::my_listings),
        )
        .route(
            "/api/properties/:id",
            get(query::listing_by_id)
                .put(mutation::update_listing)
                .delete(mutation::delete_listing),
        )
        .fallback(not_found)
}

/// Responds to the requests of unknown routes.
#[expect(clippy::unused_async, reason = "`async` is required by `axum`")]
async fn not_found() -> Error {
    RouteError::NotFound.into()
}

/// Parses the provided [`domain::listing::Id`], treating a malformed one as
/// an ID of a missing [`Listing`].
fn parse_id(id: &str) -> Result<domain::listing::Id, Error> {
    id.parse().map_err(|_| ListingError::NotExists.into())
}

/// Response with a single [`Listing`].
#[derive(Debug, Serialize)]
pub struct One {
    /// Human-readable outcome of the operation, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,

    /// Affected [`Listing`].
    pub property: Listing,
}

/// Response with multiple [`Listing`]s.
#[derive(Debug, Serialize)]
pub struct Many {
    /// Selected [`Listing`]s.
    pub properties: Vec<Listing>,
}

/// Response with a human-readable outcome of an operation only.
#[derive(Debug, Serialize)]
pub struct Outcome {
    /// Human-readable outcome of the operation.
    pub message: &'static str,
}

impl AsError for command::update_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmptyPatch => Some(ListingError::EmptyPatch.into()),
            Self::InvalidPatch(e) => Some((*e).into()),
            Self::ListingNotExists(_) => Some(ListingError::NotExists.into()),
            Self::NotOwner(_) => Some(ListingError::NotUpdatable.into()),
            Self::UserNotExists(_) => None,
        }
    }
}

impl AsError for command::delete_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ListingNotExists(_) => Some(ListingError::NotExists.into()),
            Self::NotOwner(_) => Some(ListingError::NotDeletable.into()),
            Self::UserNotExists(_) => None,
        }
    }
}

define_error! {
    enum ListingError {
        #[code = "PROPERTY_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Property not found"]
        NotExists,

        #[code = "NOT_AUTHORIZED"]
        #[status = FORBIDDEN]
        #[message = "Not authorized to update this property"]
        NotUpdatable,

        #[code = "NOT_AUTHORIZED"]
        #[status = FORBIDDEN]
        #[message = "Not authorized to delete this property"]
        NotDeletable,

        #[code = "NO_FIELDS_TO_UPDATE"]
        #[status = BAD_REQUEST]
        #[message = "No fields to update"]
        EmptyPatch,
    }
}

define_error! {
    enum RouteError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Route not found"]
        NotFound,
    }
}

#[cfg(test)]
mod spec {
    use service::{
        command::{delete_listing, update_listing},
        domain::{listing, user},
    };

    use crate::AsError as _;

    #[test]
    fn maps_update_errors_to_statuses() {
        use update_listing::ExecutionError as E;

        for (err, status) in [
            (E::EmptyPatch, http::StatusCode::BAD_REQUEST),
            (
                E::InvalidPatch(listing::InvalidField("price")),
                http::StatusCode::BAD_REQUEST,
            ),
            (
                E::ListingNotExists(listing::Id::new()),
                http::StatusCode::NOT_FOUND,
            ),
            (E::NotOwner(user::Id::new()), http::StatusCode::FORBIDDEN),
            (
                E::UserNotExists(user::Id::new()),
                http::StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ] {
            assert_eq!(tracerr::new!(err).as_error().status_code, status);
        }
    }

    #[test]
    fn maps_delete_errors_to_statuses() {
        use delete_listing::ExecutionError as E;

        let err = E::NotOwner(user::Id::new()).as_error();
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
        assert_eq!(err.message, "Not authorized to delete this property");

        let err = E::ListingNotExists(listing::Id::new()).as_error();
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Property not found");
    }
}
