//! HTTP handlers reading [`Listing`]s.

use axum::{
    extract::{rejection::QueryRejection, Path, Query},
    Json,
};
use service::{
    query::{self, Query as _},
    read::listing::list,
};

use crate::{
    api::{
        listing::{Page, SearchParams},
        parse_id, ListingError, Many, One,
    },
    AsError, Context, Error,
};
#[cfg(doc)]
use crate::api::Listing;

/// Returns a page of [`Listing`]s matching the query string filters.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_QUERY` - a query string parameter is malformed;
/// - `INVALID_PAGINATION` - `page` or `limit` is not a positive integer.
#[tracing::instrument(skip_all)]
pub(crate) async fn list_listings(
    ctx: Context,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Page>, Error> {
    let Query(params) = params.map_err(AsError::into_error)?;
    let selector = list::Selector::try_from(params)?;

    ctx.service()
        .execute(query::listings::List::by(selector))
        .await
        .map_err(AsError::into_error)
        .map(|page| Json(page.into()))
}

/// Returns the [`Listing`] with the specified ID.
///
/// # Errors
///
/// Possible error codes:
/// - `PROPERTY_NOT_FOUND` - the [`Listing`] doesn't exist, or the ID is
///                          malformed.
#[tracing::instrument(skip_all, fields(id = %id))]
pub(crate) async fn listing_by_id(
    ctx: Context,
    Path(id): Path<String>,
) -> Result<Json<One>, Error> {
    let id = parse_id(&id)?;

    ctx.service()
        .execute(query::listing::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| ListingError::NotExists.into())
        .map(|l| {
            Json(One {
                message: None,
                property: l.into(),
            })
        })
}

/// Returns all the [`Listing`]s of the authenticated user, newest first.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - no token is provided;
/// - `INVALID_TOKEN` - the provided token is invalid or expired.
#[tracing::instrument(skip_all)]
pub(crate) async fn my_listings(ctx: Context) -> Result<Json<Many>, Error> {
    let my_id = ctx.current_user().await?.id;

    ctx.service()
        .execute(query::listings::ByOwner::by(my_id))
        .await
        .map_err(AsError::into_error)
        .map(|ls| {
            Json(Many {
                properties: ls.into_iter().map(Into::into).collect(),
            })
        })
}
