//! [`Query`] collection related to multiple [`Listing`]s.

use common::operations::By;

use crate::{
    domain::{user, Listing},
    read,
};
#[cfg(doc)]
use crate::{domain::User, Query};

use super::DatabaseQuery;

/// Queries a [`read::listing::list::Page`] of [`Listing`]s matching a
/// [`read::listing::list::Filter`], along with their owners.
pub type List =
    DatabaseQuery<By<read::listing::list::Page, read::listing::list::Selector>>;

/// Queries all the [`Listing`]s owned by a [`User`], newest first.
pub type ByOwner = DatabaseQuery<By<Vec<Listing>, user::Id>>;
