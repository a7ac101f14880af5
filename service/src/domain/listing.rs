//! [`Listing`] definitions.

use std::{convert::Infallible, sync::LazyLock};

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, Error as StdError, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{user, User};

/// Property offered for sale or rent.
#[derive(Clone, Debug)]
pub struct Listing {
    /// ID of this [`Listing`].
    pub id: Id,

    /// [`Title`] of this [`Listing`].
    pub title: Title,

    /// [`Description`] of this [`Listing`], if any.
    pub description: Option<Description>,

    /// [`Price`] of this [`Listing`].
    pub price: Price,

    /// [`Location`] of the listed property.
    pub location: Location,

    /// Number of bedrooms in the listed property.
    pub bedrooms: RoomsCount,

    /// Number of bathrooms in the listed property.
    pub bathrooms: RoomsCount,

    /// [`Area`] of the listed property.
    pub area: Area,

    /// [`Kind`] of the listed property.
    pub kind: Kind,

    /// [`Status`] of this [`Listing`].
    pub status: Status,

    /// [`ImageUrl`]s of the listed property, in display order.
    pub images: Vec<ImageUrl>,

    /// [`ModelUrl`] of the listed property's 3D tour, if any.
    pub model_url: Option<ModelUrl>,

    /// [`Feature`]s of the listed property, in display order.
    pub features: Vec<Feature>,

    /// ID of the [`User`] owning this [`Listing`].
    ///
    /// [`None`] once the owner is removed.
    pub owner_id: Option<user::Id>,

    /// [`DateTime`] when this [`Listing`] was created.
    pub created_at: CreationDateTime,
}

impl Listing {
    /// Checks whether the provided [`User`] is allowed to modify or remove
    /// this [`Listing`].
    ///
    /// Only the owner of a [`Listing`] and administrators are allowed to.
    #[must_use]
    pub fn is_manageable_by(&self, user: &User) -> bool {
        user.is_admin() || self.owner_id == Some(user.id)
    }

    /// Applies the provided [`Patch`] to this [`Listing`].
    pub fn apply(&mut self, patch: Patch) {
        let Patch {
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
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(bedrooms) = bedrooms {
            self.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = bathrooms {
            self.bathrooms = bathrooms;
        }
        if let Some(area) = area {
            self.area = area;
        }
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(images) = images {
            self.images = images;
        }
        if let Some(model_url) = model_url {
            self.model_url = model_url;
        }
        if let Some(features) = features {
            self.features = features;
        }
    }
}

/// Partial modification of a [`Listing`].
///
/// Only the provided fields are changed.
#[derive(Clone, Debug, Default)]
pub struct Patch {
    /// New [`Title`].
    pub title: Option<Title>,

    /// New [`Description`].
    ///
    /// `Some(None)` removes the existing one.
    pub description: Option<Option<Description>>,

    /// New [`Price`].
    pub price: Option<Price>,

    /// New [`Location`].
    pub location: Option<Location>,

    /// New number of bedrooms.
    pub bedrooms: Option<RoomsCount>,

    /// New number of bathrooms.
    pub bathrooms: Option<RoomsCount>,

    /// New [`Area`].
    pub area: Option<Area>,

    /// New [`Kind`].
    pub kind: Option<Kind>,

    /// New [`Status`].
    pub status: Option<Status>,

    /// New [`ImageUrl`]s, replacing the existing ones.
    pub images: Option<Vec<ImageUrl>>,

    /// New [`ModelUrl`].
    ///
    /// `Some(None)` removes the existing one.
    pub model_url: Option<Option<ModelUrl>>,

    /// New [`Feature`]s, replacing the existing ones.
    pub features: Option<Vec<Feature>>,
}

impl Patch {
    /// Indicates whether this [`Patch`] changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let Self {
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
        } = self;

        title.is_none()
            && description.is_none()
            && price.is_none()
            && location.is_none()
            && bedrooms.is_none()
            && bathrooms.is_none()
            && area.is_none()
            && kind.is_none()
            && status.is_none()
            && images.is_none()
            && model_url.is_none()
            && features.is_none()
    }
}

/// Error of building a [`Patch`] out of a raw input.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, StdError)]
#[display("invalid `{_0}` field")]
pub struct InvalidField(#[error(not(source))] pub &'static str);

impl From<Infallible> for InvalidField {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

/// ID of a [`Listing`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Title of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(str, String)]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title
            && !title.is_empty()
            && title.chars().count() <= 200
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Free-form description of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(str, String)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Description`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 65_535
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Location (address, district, city) of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(str, String)]
pub struct Location(String);

impl Location {
    /// Creates a new [`Location`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        Self::check(&location).then_some(Self(location))
    }

    /// Checks whether the given `location` is a valid [`Location`].
    fn check(location: impl AsRef<str>) -> bool {
        let location = location.as_ref();
        location.trim() == location
            && !location.is_empty()
            && location.chars().count() <= 200
    }
}

impl FromStr for Location {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Location`")
    }
}

/// Price of a [`Listing`].
///
/// Non-negative amount with at most 13 integer and 2 fractional digits.
#[derive(Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Price(Decimal);

impl Price {
    /// Creates a new [`Price`] if the given `amount` is valid.
    ///
    /// The `amount` is rounded to 2 fractional digits.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        let amount = amount.round_dp(2);
        check_amount(amount, 13).then_some(Self(amount))
    }
}

impl FromStr for Price {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Decimal>()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Price`")
    }
}

/// Area of a listed property.
///
/// Non-negative amount with at most 8 integer and 2 fractional digits.
#[derive(Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Area(Decimal);

impl Area {
    /// Zero [`Area`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Area`] if the given `amount` is valid.
    ///
    /// The `amount` is rounded to 2 fractional digits.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        let amount = amount.round_dp(2);
        check_amount(amount, 8).then_some(Self(amount))
    }
}

impl FromStr for Area {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Decimal>()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Area`")
    }
}

/// Checks whether the given `amount` is non-negative and has no more than
/// `digits` integer digits.
fn check_amount(amount: Decimal, digits: u32) -> bool {
    !amount.is_sign_negative() && amount < Decimal::from(10_u64.pow(digits))
}

/// Number of rooms of some sort in a listed property.
pub type RoomsCount = u16;

/// URL of a [`Listing`] image.
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[serde(transparent)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        (url.len() <= 2048 && is_url(&url)).then_some(Self(url))
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

/// URL of a 3D model used for a virtual tour of a listed property.
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(str, String)]
pub struct ModelUrl(String);

impl ModelUrl {
    /// Creates a new [`ModelUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        (url.len() <= 500 && is_url(&url)).then_some(Self(url))
    }
}

impl FromStr for ModelUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ModelUrl`")
    }
}

/// Checks whether the given `url` is either an absolute HTTP(S) URL or an
/// absolute path served by the frontend.
fn is_url(url: &str) -> bool {
    /// Regular expression checking the URL format:
    /// - Must start with `http://`, `https://` or `/`;
    /// - Must not contain whitespace.
    static REGEX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(https?://[^\s/]+|/)\S*$").expect("valid regex")
    });

    REGEX.is_match(url)
}

/// Feature of a listed property (e.g. "Private garden").
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[serde(transparent)]
pub struct Feature(String);

impl Feature {
    /// Creates a new [`Feature`] if the given `feature` is valid.
    #[must_use]
    pub fn new(feature: impl Into<String>) -> Option<Self> {
        let feature = feature.into();
        Self::check(&feature).then_some(Self(feature))
    }

    /// Checks whether the given `feature` is a valid [`Feature`].
    fn check(feature: impl AsRef<str>) -> bool {
        let feature = feature.as_ref();
        feature.trim() == feature
            && !feature.is_empty()
            && feature.chars().count() <= 200
    }
}

impl FromStr for Feature {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Feature`")
    }
}

define_kind! {
    #[doc = "Kind of a listed property."]
    enum Kind {
        #[doc = "A detached house."]
        House = 1,

        #[doc = "An apartment in a building."]
        Apartment = 2,

        #[doc = "A commercial property."]
        Commercial = 3,

        #[doc = "A land plot."]
        Land = 4,
    }
}

define_kind! {
    #[doc = "Status of a [`Listing`]."]
    enum Status {
        #[doc = "Property is on the market."]
        Available = 1,

        #[doc = "Property has been sold."]
        Sold = 2,

        #[doc = "Property has been rented out."]
        Rented = 3,
    }
}

/// [`DateTime`] when a [`Listing`] was created.
pub type CreationDateTime = DateTimeOf<(Listing, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::DateTime;
    use rust_decimal::Decimal;

    use crate::domain::{user, User};

    use super::{
        Area, Description, Feature, ImageUrl, Kind, Listing, Location,
        ModelUrl, Patch, Price, Status, Title,
    };

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn listing(owner_id: Option<user::Id>) -> Listing {
        Listing {
            id: super::Id::new(),
            title: Title::new("Modern house").unwrap(),
            description: None,
            price: Price::new(decimal("100")).unwrap(),
            location: Location::new("Zona Rosa, Bogotá").unwrap(),
            bedrooms: 3,
            bathrooms: 2,
            area: Area::ZERO,
            kind: Kind::House,
            status: Status::Available,
            images: vec![],
            model_url: None,
            features: vec![],
            owner_id,
            created_at: DateTime::now().coerce(),
        }
    }

    fn user(role: user::Role) -> User {
        User {
            id: user::Id::new(),
            name: user::Name::new("Jane").unwrap(),
            email: None,
            role,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn validates_text() {
        assert!(Title::new("Cozy flat").is_some());
        assert!(Title::new("").is_none());
        assert!(Title::new(" Cozy flat").is_none());
        assert!(Title::new("a".repeat(200)).is_some());
        assert!(Title::new("a".repeat(201)).is_none());

        assert!(Location::new("Chía, Cundinamarca").is_some());
        assert!(Location::new("Chía ").is_none());

        assert!(Feature::new("Private garden").is_some());
        assert!(Feature::new("  ").is_none());
    }

    #[test]
    fn validates_urls() {
        assert!(ImageUrl::new("https://images.example.com/1.jpg").is_some());
        assert!(ImageUrl::new("/uploads/1.jpg").is_some());
        assert!(ImageUrl::new("ftp://example.com/1.jpg").is_none());
        assert!(ImageUrl::new("https://example.com/a b.jpg").is_none());
        assert!(ImageUrl::new("").is_none());

        assert!(ModelUrl::new("/models/house1.glb").is_some());
        assert!(ModelUrl::new(format!("/{}", "m".repeat(500))).is_none());
    }

    #[test]
    fn validates_amounts() {
        assert!(Price::new(decimal("0")).is_some());
        assert!(Price::new(decimal("850000000")).is_some());
        assert!(Price::new(decimal("9999999999999.99")).is_some());
        assert!(Price::new(decimal("10000000000000")).is_none());
        assert!(Price::new(decimal("-1")).is_none());
        assert_eq!(
            Price::new(decimal("10.005")).map(Decimal::from),
            Some(decimal("10.00")),
        );

        assert!(Area::new(decimal("180.5")).is_some());
        assert!(Area::new(decimal("99999999.99")).is_some());
        assert!(Area::new(decimal("100000000")).is_none());
        assert!("12.5".parse::<Area>().is_ok());
        assert!("abc".parse::<Price>().is_err());
    }

    #[test]
    fn parses_kinds() {
        assert_eq!("house".parse::<Kind>().unwrap(), Kind::House);
        assert_eq!("commercial".parse::<Kind>().unwrap(), Kind::Commercial);
        assert!("castle".parse::<Kind>().is_err());
        assert_eq!(Status::Rented.to_string(), "rented");
        assert_eq!("available".parse::<Status>().unwrap(), Status::Available);
    }

    #[test]
    fn only_owner_or_admin_manages() {
        let owner = user(user::Role::User);
        let stranger = user(user::Role::User);
        let admin = user(user::Role::Admin);

        let owned = listing(Some(owner.id));
        assert!(owned.is_manageable_by(&owner));
        assert!(!owned.is_manageable_by(&stranger));
        assert!(owned.is_manageable_by(&admin));

        let orphaned = listing(None);
        assert!(!orphaned.is_manageable_by(&owner));
        assert!(orphaned.is_manageable_by(&admin));
    }

    #[test]
    fn applies_patch_partially() {
        let mut listing = listing(None);
        let patch = Patch {
            price: Price::new(decimal("250")),
            status: Some(Status::Sold),
            features: Some(vec![Feature::new("Pool").unwrap()]),
            ..Patch::default()
        };
        assert!(!patch.is_empty());

        listing.apply(patch);

        assert_eq!(Decimal::from(listing.price), decimal("250"));
        assert_eq!(listing.status, Status::Sold);
        assert_eq!(listing.features, vec![Feature::new("Pool").unwrap()]);
        assert_eq!(listing.title, Title::new("Modern house").unwrap());
        assert_eq!(listing.bedrooms, 3);
        assert!(Patch::default().is_empty());
    }

    #[test]
    fn clears_optional_fields() {
        let mut listing = listing(None);
        listing.model_url = ModelUrl::new("/models/house1.glb");

        listing.apply(Patch {
            description: Some(Description::new("Sunny")),
            ..Patch::default()
        });
        assert_eq!(listing.description, Description::new("Sunny"));
        assert!(listing.model_url.is_some());

        let patch = Patch {
            description: Some(None),
            model_url: Some(None),
            ..Patch::default()
        };
        assert!(!patch.is_empty());

        listing.apply(patch);
        assert!(listing.description.is_none());
        assert!(listing.model_url.is_none());
    }
}
