//! In-memory [`Database`] implementation used in tests.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{listing, user, Listing, User},
    infra::{database, Database},
    read::listing::{list, Detailed},
};

/// In-memory [`Database`].
///
/// Every operation is applied immediately, so [`Transact`] shares the same
/// state, while [`Lock`] and [`Commit`] do nothing.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<RwLock<State>>);

/// State of a [`Memory`] database.
#[derive(Debug, Default)]
struct State {
    /// Stored [`Listing`]s.
    listings: HashMap<listing::Id, Listing>,

    /// Stored [`User`]s.
    users: HashMap<user::Id, User>,
}

impl State {
    /// Attaches the owner details to the provided [`Listing`].
    fn detailed(&self, listing: Listing) -> Detailed {
        let owner = listing
            .owner_id
            .and_then(|id| self.users.get(&id))
            .map(Into::into);
        Detailed { listing, owner }
    }
}

/// Orders [`Listing`]s from the newest to the oldest one.
fn newest_first(a: &Listing, b: &Listing) -> Ordering {
    b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Listing, listing::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Listing, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<Listing>, listing::Id>>> for Memory {
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.read().await.listings.get(by.by()).cloned())
    }
}

impl Database<Select<By<Option<Detailed>, listing::Id>>> for Memory {
    type Ok = Option<Detailed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Detailed>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.0.read().await;
        Ok(state
            .listings
            .get(by.by())
            .cloned()
            .map(|l| state.detailed(l)))
    }
}

impl Database<Select<By<list::Page, list::Selector>>> for Memory {
    type Ok = list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::Page, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Selector { arguments, filter } = by.into_inner();

        let state = self.0.read().await;
        let mut matched = state
            .listings
            .values()
            .filter(|l| filter.matches(l))
            .collect::<Vec<_>>();
        matched.sort_by(|a, b| newest_first(a, b));

        let total = u64::try_from(matched.len()).unwrap_or(u64::MAX);
        let items = matched
            .into_iter()
            .skip(usize::try_from(arguments.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(arguments.limit()).unwrap_or(usize::MAX))
            .map(|l| state.detailed(l.clone()));

        Ok(list::Page::new(arguments, items, total))
    }
}

impl Database<Select<By<Vec<Listing>, user::Id>>> for Memory {
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let owner_id = *by.by();

        let mut owned = self
            .0
            .read()
            .await
            .listings
            .values()
            .filter(|l| l.owner_id == Some(owner_id))
            .cloned()
            .collect::<Vec<_>>();
        owned.sort_by(newest_first);

        Ok(owned)
    }
}

impl Database<Insert<Listing>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(listing): Insert<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.0.write().await.listings.insert(listing.id, listing));
        Ok(())
    }
}

impl Database<Update<Listing>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(listing): Update<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.0.write().await;
        if let Some(stored) = state.listings.get_mut(&listing.id) {
            *stored = listing;
        }
        Ok(())
    }
}

impl Database<Delete<By<Listing, listing::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Listing, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.0.write().await.listings.remove(by.by()));
        Ok(())
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.read().await.users.get(by.by()).cloned())
    }
}

impl Database<Insert<User>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.0.write().await.users.insert(user.id, user));
        Ok(())
    }
}
