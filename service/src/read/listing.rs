//! [`Listing`]-related read definitions.

use crate::domain::{user, Listing, User};

/// [`Listing`] along with the public details of its [`Owner`].
#[derive(Clone, Debug)]
pub struct Detailed {
    /// Selected [`Listing`].
    pub listing: Listing,

    /// [`Owner`] of the [`Listing`].
    ///
    /// [`None`] once the owner is removed.
    pub owner: Option<Owner>,
}

/// Public details of a [`Listing`] owner.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Owner {
    /// [`user::Name`] of the owner.
    pub name: user::Name,

    /// [`user::Email`] of the owner, if any.
    pub email: Option<user::Email>,
}

impl From<&User> for Owner {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

pub mod list {
    //! [`Listing`] list definitions.

    use common::define_pagination;
    use smart_default::SmartDefault;

    use crate::domain::{listing, Listing};

    use super::Detailed;

    define_pagination!(Detailed, Filter);

    /// Filter for [`Selector`].
    ///
    /// Every present criterion narrows the selection. [`Filter::status`]
    /// is always applied.
    #[derive(Clone, Debug, SmartDefault)]
    pub struct Filter {
        /// Lowest [`listing::Price`] (inclusive).
        pub min_price: Option<listing::Price>,

        /// Highest [`listing::Price`] (inclusive).
        pub max_price: Option<listing::Price>,

        /// Exact [`listing::Kind`] of the listed property.
        pub kind: Option<listing::Kind>,

        /// Lowest number of bedrooms (inclusive).
        pub min_bedrooms: Option<listing::RoomsCount>,

        /// Lowest number of bathrooms (inclusive).
        pub min_bathrooms: Option<listing::RoomsCount>,

        /// Part of a [`listing::Location`] to search for, case-insensitively.
        pub location: Option<String>,

        /// [`listing::Status`] of the selected [`Listing`]s.
        #[default(listing::Status::Available)]
        pub status: listing::Status,
    }

    impl Filter {
        /// Returns the [`Predicate`]s this [`Filter`] consists of.
        ///
        /// The [`Predicate::Status`] always goes first, followed by a
        /// [`Predicate`] for each present criterion. A [`Listing`] matches
        /// this [`Filter`] only if it matches all of them.
        pub fn predicates(&self) -> impl Iterator<Item = Predicate<'_>> {
            let Self {
                min_price,
                max_price,
                kind,
                min_bedrooms,
                min_bathrooms,
                location,
                status,
            } = self;

            [
                Some(Predicate::Status(*status)),
                min_price.map(Predicate::MinPrice),
                max_price.map(Predicate::MaxPrice),
                kind.map(Predicate::Kind),
                min_bedrooms.map(Predicate::MinBedrooms),
                min_bathrooms.map(Predicate::MinBathrooms),
                location.as_deref().map(Predicate::Location),
            ]
            .into_iter()
            .flatten()
        }

        /// Checks whether the provided [`Listing`] matches this [`Filter`].
        #[must_use]
        pub fn matches(&self, listing: &Listing) -> bool {
            self.predicates().all(|p| p.matches(listing))
        }
    }

    /// Single criterion of a [`Filter`].
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum Predicate<'a> {
        /// [`Listing::status`] equals the given one.
        Status(listing::Status),

        /// [`Listing::price`] is not less than the given one.
        MinPrice(listing::Price),

        /// [`Listing::price`] is not greater than the given one.
        MaxPrice(listing::Price),

        /// [`Listing::kind`] equals the given one.
        Kind(listing::Kind),

        /// [`Listing::bedrooms`] is not less than the given number.
        MinBedrooms(listing::RoomsCount),

        /// [`Listing::bathrooms`] is not less than the given number.
        MinBathrooms(listing::RoomsCount),

        /// [`Listing::location`] contains the given term, ignoring case.
        Location(&'a str),
    }

    impl Predicate<'_> {
        /// Checks whether the provided [`Listing`] satisfies this
        /// [`Predicate`].
        #[must_use]
        pub fn matches(&self, listing: &Listing) -> bool {
            match *self {
                Self::Status(status) => listing.status == status,
                Self::MinPrice(price) => listing.price >= price,
                Self::MaxPrice(price) => listing.price <= price,
                Self::Kind(kind) => listing.kind == kind,
                Self::MinBedrooms(n) => listing.bedrooms >= n,
                Self::MinBathrooms(n) => listing.bathrooms >= n,
                Self::Location(term) => {
                    AsRef::<str>::as_ref(&listing.location)
                        .to_lowercase()
                        .contains(&term.to_lowercase())
                }
            }
        }
    }

}
