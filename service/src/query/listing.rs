//! [`Query`] collection related to a single [`Listing`].

use common::operations::By;

use crate::{domain::listing, read};
#[cfg(doc)]
use crate::{domain::Listing, Query};

use super::DatabaseQuery;

/// Queries a [`Listing`] by its [`listing::Id`], along with its owner.
pub type ById =
    DatabaseQuery<By<Option<read::listing::Detailed>, listing::Id>>;
