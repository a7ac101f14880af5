//! HTTP handlers modifying [`Listing`]s.

use axum::{
    extract::{rejection::JsonRejection, Path},
    Json,
};
use service::command::{self, Command as _};

use crate::{
    api::{listing::Input, parse_id, One, Outcome},
    AsError, Context, Error,
};
#[cfg(doc)]
use crate::api::Listing;

/// Creates a new [`Listing`] owned by the authenticated user.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - no token is provided;
/// - `INVALID_TOKEN` - the provided token is invalid or expired;
/// - `INVALID_BODY` - the request body is not a valid JSON object;
/// - `MISSING_REQUIRED_FIELDS` - title, price or location is missing;
/// - `INVALID_FIELD` - a provided field is invalid.
#[tracing::instrument(skip_all)]
pub(crate) async fn create_listing(
    ctx: Context,
    input: Result<Json<Input>, JsonRejection>,
) -> Result<(http::StatusCode, Json<One>), Error> {
    let owner_id = ctx.current_user().await?.id;
    let Json(input) = input.map_err(AsError::into_error)?;
    let cmd = input.into_create(owner_id)?;

    let listing = ctx
        .service()
        .execute(cmd)
        .await
        .map_err(AsError::into_error)?;

    tracing::info!("`Listing(id: {})` created", listing.id);

    Ok((
        http::StatusCode::CREATED,
        Json(One {
            message: Some("Property created successfully"),
            property: listing.into(),
        }),
    ))
}

/// Updates the provided fields of the [`Listing`] with the specified ID.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - no token is provided;
/// - `INVALID_TOKEN` - the provided token is invalid or expired;
/// - `PROPERTY_NOT_FOUND` - the [`Listing`] doesn't exist;
/// - `NOT_AUTHORIZED` - the authenticated user neither owns the [`Listing`]
///                      nor is an admin;
/// - `INVALID_FIELD` - a provided field is invalid;
/// - `NO_FIELDS_TO_UPDATE` - the request body contains no fields.
#[tracing::instrument(skip_all, fields(id = %id))]
pub(crate) async fn update_listing(
    ctx: Context,
    Path(id): Path<String>,
    input: Result<Json<Input>, JsonRejection>,
) -> Result<Json<One>, Error> {
    let initiator_id = ctx.current_user().await?.id;
    let listing_id = parse_id(&id)?;
    let Json(patch) = input.map_err(AsError::into_error)?;

    // Fields are validated only once the initiator is allowed to update.
    ctx.service()
        .execute(command::UpdateListing {
            listing_id,
            initiator_id,
            patch,
        })
        .await
        .map_err(AsError::into_error)
        .map(|l| {
            Json(One {
                message: Some("Property updated successfully"),
                property: l.into(),
            })
        })
}

/// Deletes the [`Listing`] with the specified ID.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - no token is provided;
/// - `INVALID_TOKEN` - the provided token is invalid or expired;
/// - `PROPERTY_NOT_FOUND` - the [`Listing`] doesn't exist;
/// - `NOT_AUTHORIZED` - the authenticated user neither owns the [`Listing`]
///                      nor is an admin.
#[tracing::instrument(skip_all, fields(id = %id))]
pub(crate) async fn delete_listing(
    ctx: Context,
    Path(id): Path<String>,
) -> Result<Json<Outcome>, Error> {
    let initiator_id = ctx.current_user().await?.id;
    let listing_id = parse_id(&id)?;

    ctx.service()
        .execute(command::DeleteListing {
            listing_id,
            initiator_id,
        })
        .await
        .map_err(AsError::into_error)
        .map(|_| {
            Json(Outcome {
                message: "Property deleted successfully",
            })
        })
}
