//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_listing;
pub mod delete_listing;
pub mod seed_sample_data;
pub mod update_listing;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_listing::CreateListing, delete_listing::DeleteListing,
    seed_sample_data::SeedSampleData, update_listing::UpdateListing,
};
