//! [`Listing`]-related HTTP API definitions.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use service::{
    command,
    domain::{self, listing, user},
    read::{self, listing::list},
};

use crate::{define_error, Error};

/// Property listing, as returned by the HTTP API.
#[derive(Debug, Serialize)]
pub struct Listing {
    /// ID of this [`Listing`].
    pub id: listing::Id,

    /// Title of this [`Listing`].
    pub title: String,

    /// Description of this [`Listing`].
    pub description: Option<String>,

    /// Price of this [`Listing`].
    pub price: Decimal,

    /// Location of the listed property.
    pub location: String,

    /// Number of bedrooms.
    pub bedrooms: listing::RoomsCount,

    /// Number of bathrooms.
    pub bathrooms: listing::RoomsCount,

    /// Area of the listed property.
    pub area: Decimal,

    /// Kind of the listed property.
    pub property_type: String,

    /// Status of this [`Listing`].
    pub status: String,

    /// Image URLs of the listed property.
    pub images: Vec<listing::ImageUrl>,

    /// URL of a 3D model of the listed property.
    #[serde(rename = "model_3d_path")]
    pub model_url: Option<String>,

    /// Features of the listed property.
    pub features: Vec<listing::Feature>,

    /// ID of the user owning this [`Listing`].
    pub owner_id: Option<user::Id>,

    /// Name of the user owning this [`Listing`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,

    /// Email of the user owning this [`Listing`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,

    /// When this [`Listing`] was created.
    #[serde(serialize_with = "common::datetime::serde::rfc3339::serialize")]
    pub created_at: listing::CreationDateTime,
}

impl From<domain::Listing> for Listing {
    fn from(listing: domain::Listing) -> Self {
        let domain::Listing {
            id,
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
            owner_id,
            created_at,
        } = listing;

        Self {
            id,
            title: title.into(),
            description: description.map(Into::into),
            price: price.into(),
            location: location.into(),
            bedrooms,
            bathrooms,
            area: area.into(),
            property_type: kind.to_string(),
            status: status.to_string(),
            images,
            model_url: model_url.map(Into::into),
            features,
            owner_id,
            owner_name: None,
            owner_email: None,
            created_at,
        }
    }
}

impl From<read::listing::Detailed> for Listing {
    fn from(detailed: read::listing::Detailed) -> Self {
        let read::listing::Detailed { listing, owner } = detailed;

        let mut this = Self::from(listing);
        if let Some(read::listing::Owner { name, email }) = owner {
            this.owner_name = Some(name.into());
            this.owner_email = email.map(Into::into);
        }
        this
    }
}

/// [`Listing`]s page along with its pagination details.
#[derive(Debug, Serialize)]
pub struct Page {
    /// [`Listing`]s of this [`Page`].
    pub properties: Vec<Listing>,

    /// Pagination details of this [`Page`].
    pub pagination: Pagination,
}

/// Pagination details of a [`Page`].
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Number of the current [`Page`], starting from `1`.
    pub current_page: u32,

    /// Total number of [`Page`]s.
    pub total_pages: u64,

    /// Total number of [`Listing`]s on all the [`Page`]s.
    pub total_items: u64,

    /// Maximum number of [`Listing`]s on a single [`Page`].
    pub items_per_page: u32,
}

impl From<list::Page> for Page {
    fn from(page: list::Page) -> Self {
        let pagination = Pagination {
            current_page: page.arguments.page(),
            total_pages: page.total_pages(),
            total_items: page.total,
            items_per_page: page.arguments.per_page(),
        };
        Self {
            // Lists expose the owner's name only.
            properties: page
                .items
                .into_iter()
                .map(|d| Listing {
                    owner_email: None,
                    ..Listing::from(d)
                })
                .collect(),
            pagination,
        }
    }
}

/// Query string parameters of a [`Listing`]s search.
///
/// Values are kept raw, so that malformed ones are reported by their
/// parameter name. Empty values are treated as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Number of the requested [`Page`].
    pub page: Option<String>,

    /// Maximum number of [`Listing`]s on the requested [`Page`].
    pub limit: Option<String>,

    /// Lowest price (inclusive).
    pub min_price: Option<String>,

    /// Highest price (inclusive).
    pub max_price: Option<String>,

    /// Kind of the listed property.
    pub property_type: Option<String>,

    /// Lowest number of bedrooms (inclusive).
    pub bedrooms: Option<String>,

    /// Lowest number of bathrooms (inclusive).
    pub bathrooms: Option<String>,

    /// Part of the location to search for.
    pub location: Option<String>,

    /// Status of the [`Listing`]s.
    pub status: Option<String>,
}

impl SearchParams {
    /// Default number of the requested [`Page`].
    pub const DEFAULT_PAGE: u32 = 1;

    /// Default number of [`Listing`]s on a single [`Page`].
    pub const DEFAULT_LIMIT: u32 = 12;
}

impl TryFrom<SearchParams> for list::Selector {
    type Error = Error;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let SearchParams {
            page,
            limit,
            min_price,
            max_price,
            property_type,
            bedrooms,
            bathrooms,
            location,
            status,
        } = params;

        let page = parse(page, "page")?.unwrap_or(SearchParams::DEFAULT_PAGE);
        let limit =
            parse(limit, "limit")?.unwrap_or(SearchParams::DEFAULT_LIMIT);
        let arguments = list::Arguments::new(page, limit)
            .ok_or(SearchError::NonPositivePagination)?;

        let mut filter = list::Filter {
            min_price: parse(min_price, "minPrice")?,
            max_price: parse(max_price, "maxPrice")?,
            kind: parse(property_type, "propertyType")?,
            min_bedrooms: parse(bedrooms, "bedrooms")?,
            min_bathrooms: parse(bathrooms, "bathrooms")?,
            location: location.filter(|l| !l.is_empty()),
            ..list::Filter::default()
        };
        if let Some(status) = parse(status, "status")? {
            filter.status = status;
        }

        Ok(Self { arguments, filter })
    }
}

/// Parses the provided query string `value`, if it's not empty.
fn parse<T: FromStr>(
    value: Option<String>,
    name: &str,
) -> Result<Option<T>, Error> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse().map_err(|_| {
                Error::bad_request(
                    "INVALID_QUERY",
                    format!("Invalid `{name}` query parameter: `{v}`"),
                )
            })
        })
        .transpose()
}

/// Input of a [`Listing`] creation or update.
#[derive(Debug, Default, Deserialize)]
pub struct Input {
    /// Title of the [`Listing`].
    pub title: Option<String>,

    /// Description of the [`Listing`].
    ///
    /// Explicit `null` removes the existing one.
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,

    /// Price of the [`Listing`].
    pub price: Option<Decimal>,

    /// Location of the listed property.
    pub location: Option<String>,

    /// Number of bedrooms.
    pub bedrooms: Option<listing::RoomsCount>,

    /// Number of bathrooms.
    pub bathrooms: Option<listing::RoomsCount>,

    /// Area of the listed property.
    pub area: Option<Decimal>,

    /// Kind of the listed property.
    pub property_type: Option<String>,

    /// Status of the [`Listing`].
    pub status: Option<String>,

    /// Image URLs of the listed property.
    pub images: Option<Vec<String>>,

    /// URL of a 3D model of the listed property.
    ///
    /// Explicit `null` removes the existing one.
    #[serde(alias = "model_3d_path", default, deserialize_with = "nullable")]
    pub model_url: Option<Option<String>>,

    /// Features of the listed property.
    pub features: Option<Vec<String>>,
}

impl Input {
    /// Converts this [`Input`] into a [`command::CreateListing`] on behalf of
    /// the provided owner.
    ///
    /// # Errors
    ///
    /// Errors if any of title, price or location is missing, or any provided
    /// field is invalid.
    pub fn into_create(
        self,
        owner_id: user::Id,
    ) -> Result<command::CreateListing, Error> {
        let is_missing =
            |s: &Option<String>| s.as_deref().map_or(true, str::is_empty);
        if is_missing(&self.title)
            || self.price.is_none()
            || is_missing(&self.location)
        {
            return Err(InputError::MissingRequired.into());
        }

        let listing::Patch {
            title: Some(title),
            description,
            price: Some(price),
            location: Some(location),
            bedrooms,
            bathrooms,
            area,
            kind,
            status,
            images,
            model_url,
            features,
        } = listing::Patch::try_from(self)?
        else {
            return Err(InputError::MissingRequired.into());
        };

        Ok(command::CreateListing {
            owner_id,
            title,
            description: description.flatten(),
            price,
            location,
            bedrooms,
            bathrooms,
            area,
            kind,
            status,
            images,
            model_url: model_url.flatten(),
            features,
        })
    }
}

impl TryFrom<Input> for listing::Patch {
    type Error = listing::InvalidField;

    fn try_from(input: Input) -> Result<Self, Self::Error> {
        let Input {
            title,
            description,
            price,
            location,
            bedrooms,
            bathrooms,
            area,
            property_type,
            status,
            images,
            model_url,
            features,
        } = input;

        Ok(Self {
            title: field(title, "title", listing::Title::new)?,
            description: field(description, "description", |d| {
                d.map_or(Some(None), |d| listing::Description::new(d).map(Some))
            })?,
            price: field(price, "price", listing::Price::new)?,
            location: field(location, "location", listing::Location::new)?,
            bedrooms,
            bathrooms,
            area: field(area, "area", listing::Area::new)?,
            kind: field(property_type, "property_type", |k| k.parse().ok())?,
            status: field(status, "status", |s| s.parse().ok())?,
            images: field(images, "images", |urls| {
                urls.into_iter().map(listing::ImageUrl::new).collect()
            })?,
            model_url: field(model_url, "model_url", |u| {
                u.map_or(Some(None), |u| listing::ModelUrl::new(u).map(Some))
            })?,
            features: field(features, "features", |fs| {
                fs.into_iter().map(listing::Feature::new).collect()
            })?,
        })
    }
}

impl From<listing::InvalidField> for Error {
    fn from(listing::InvalidField(name): listing::InvalidField) -> Self {
        Self::bad_request("INVALID_FIELD", format!("Invalid `{name}` field"))
    }
}

/// Deserializes an optional field, distinguishing an explicit `null` from
/// the field's absence.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Validates the provided `value` of an [`Input`] field with the provided
/// constructor.
fn field<T, V>(
    value: Option<T>,
    name: &'static str,
    new: impl FnOnce(T) -> Option<V>,
) -> Result<Option<V>, listing::InvalidField> {
    value
        .map(|v| new(v).ok_or(listing::InvalidField(name)))
        .transpose()
}

define_error! {
    enum SearchError {
        #[code = "INVALID_PAGINATION"]
        #[status = BAD_REQUEST]
        #[message = "`page` and `limit` must be positive integers"]
        NonPositivePagination,
    }
}

define_error! {
    enum InputError {
        #[code = "MISSING_REQUIRED_FIELDS"]
        #[status = BAD_REQUEST]
        #[message = "Title, price, and location are required"]
        MissingRequired,
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use rust_decimal::Decimal;
    use service::{
        domain::{self, listing, user},
        read::{self, listing::list},
    };

    use crate::Error;

    use super::{Input, Listing, Page, SearchParams};

    fn params(pairs: &[(&str, &str)]) -> SearchParams {
        serde_json::from_value(serde_json::Value::Object(
            pairs
                .iter()
                .map(|(k, v)| {
                    ((*k).to_owned(), serde_json::Value::String((*v).to_owned()))
                })
                .collect(),
        ))
        .unwrap()
    }

    fn selector(pairs: &[(&str, &str)]) -> list::Selector {
        list::Selector::try_from(params(pairs)).unwrap()
    }

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn defaults_to_first_page_of_available() {
        let sel = selector(&[]);

        assert_eq!(sel.arguments.page(), 1);
        assert_eq!(sel.arguments.per_page(), 12);
        assert_eq!(sel.filter.status, listing::Status::Available);
        assert!(sel.filter.min_price.is_none());
        assert!(sel.filter.location.is_none());
    }

    #[test]
    fn parses_all_filters() {
        let sel = selector(&[
            ("page", "3"),
            ("limit", "2"),
            ("minPrice", "150"),
            ("maxPrice", "300.50"),
            ("propertyType", "apartment"),
            ("bedrooms", "3"),
            ("bathrooms", "2"),
            ("location", "Bogotá"),
            ("status", "sold"),
        ]);

        assert_eq!(sel.arguments.page(), 3);
        assert_eq!(sel.arguments.per_page(), 2);
        let f = sel.filter;
        assert_eq!(f.min_price.map(Decimal::from), Some(decimal("150")));
        assert_eq!(f.max_price.map(Decimal::from), Some(decimal("300.50")));
        assert_eq!(f.kind, Some(listing::Kind::Apartment));
        assert_eq!(f.min_bedrooms, Some(3));
        assert_eq!(f.min_bathrooms, Some(2));
        assert_eq!(f.location.as_deref(), Some("Bogotá"));
        assert_eq!(f.status, listing::Status::Sold);
    }

    #[test]
    fn treats_empty_values_as_absent() {
        let sel = selector(&[("minPrice", ""), ("location", ""), ("page", "")]);

        assert!(sel.filter.min_price.is_none());
        assert!(sel.filter.location.is_none());
        assert_eq!(sel.arguments.page(), 1);
    }

    #[test]
    fn rejects_malformed_values() {
        for pairs in [
            [("minPrice", "cheap")],
            [("maxPrice", "-5")],
            [("bedrooms", "2.5")],
            [("propertyType", "castle")],
            [("status", "gone")],
            [("page", "0")],
            [("limit", "-1")],
            [("page", "abc")],
        ] {
            let err = list::Selector::try_from(params(&pairs)).unwrap_err();
            assert_eq!(
                err.status_code,
                http::StatusCode::BAD_REQUEST,
                "{pairs:?}",
            );
        }
    }

    fn input(json: serde_json::Value) -> Input {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn requires_title_price_and_location() {
        let owner = user::Id::new();

        for json in [
            serde_json::json!({"price": 100, "location": "Chía"}),
            serde_json::json!({"title": "", "price": 100, "location": "Chía"}),
            serde_json::json!({"title": "House", "location": "Chía"}),
            serde_json::json!({"title": "House", "price": 100}),
        ] {
            let err = input(json).into_create(owner).unwrap_err();
            assert_eq!(err.code, "MISSING_REQUIRED_FIELDS");
            assert_eq!(err.message, "Title, price, and location are required");
        }
    }

    #[test]
    fn converts_creation_input() {
        let owner = user::Id::new();
        let cmd = input(serde_json::json!({
            "title": "Modern house",
            "price": "850000000.00",
            "location": "Chía",
            "bedrooms": 4,
            "property_type": "house",
            "images": ["/uploads/1.jpg"],
            "model_3d_path": "/models/house1.glb",
        }))
        .into_create(owner)
        .unwrap();

        assert_eq!(cmd.owner_id, owner);
        assert_eq!(Decimal::from(cmd.price), decimal("850000000"));
        assert_eq!(cmd.bedrooms, Some(4));
        assert_eq!(cmd.kind, Some(listing::Kind::House));
        assert_eq!(cmd.images.map(|i| i.len()), Some(1));
        assert_eq!(
            cmd.model_url.as_ref().map(AsRef::<str>::as_ref),
            Some("/models/house1.glb"),
        );
        assert!(cmd.status.is_none());
    }

    fn patch(json: serde_json::Value) -> Result<listing::Patch, Error> {
        listing::Patch::try_from(input(json)).map_err(Error::from)
    }

    #[test]
    fn rejects_invalid_fields() {
        for (json, name) in [
            (serde_json::json!({"price": -1}), "price"),
            (serde_json::json!({"property_type": "castle"}), "property_type"),
            (serde_json::json!({"images": ["not a url"]}), "images"),
            (serde_json::json!({"title": " padded "}), "title"),
            (serde_json::json!({"description": " "}), "description"),
        ] {
            let err = patch(json).unwrap_err();
            assert_eq!(err.code, "INVALID_FIELD");
            assert_eq!(err.message, format!("Invalid `{name}` field"));
        }
    }

    #[test]
    fn empty_input_is_empty_patch() {
        assert!(patch(serde_json::json!({})).unwrap().is_empty());
    }

    #[test]
    fn explicit_null_clears_optional_fields() {
        let cleared = patch(serde_json::json!({
            "description": null,
            "model_3d_path": null,
        }))
        .unwrap();
        assert_eq!(cleared.description, Some(None));
        assert_eq!(cleared.model_url, Some(None));
        assert!(!cleared.is_empty());

        let kept = patch(serde_json::json!({"price": 10})).unwrap();
        assert_eq!(kept.description, None);
        assert_eq!(kept.model_url, None);

        let set = patch(serde_json::json!({"description": "Sunny"})).unwrap();
        assert_eq!(set.description, Some(listing::Description::new("Sunny")));
    }

    fn sample() -> domain::Listing {
        domain::Listing {
            id: listing::Id::new(),
            title: listing::Title::new("Cozy flat").unwrap(),
            description: None,
            price: listing::Price::new(decimal("1200.50")).unwrap(),
            location: listing::Location::new("Usaquén").unwrap(),
            bedrooms: 2,
            bathrooms: 1,
            area: listing::Area::new(decimal("64")).unwrap(),
            kind: listing::Kind::Apartment,
            status: listing::Status::Rented,
            images: vec![],
            model_url: listing::ModelUrl::new("/models/apartment2.glb"),
            features: vec![listing::Feature::new("Balcony").unwrap()],
            owner_id: None,
            created_at: DateTime::from_unix_timestamp(0).unwrap().coerce(),
        }
    }

    fn detailed() -> read::listing::Detailed {
        let owner_id = user::Id::new();
        read::listing::Detailed {
            listing: domain::Listing {
                owner_id: Some(owner_id),
                ..sample()
            },
            owner: Some(read::listing::Owner {
                name: user::Name::new("Ana Martínez").unwrap(),
                email: user::Email::new("ana@example.com"),
            }),
        }
    }

    #[test]
    fn renders_listing() {
        let json = serde_json::to_value(Listing::from(sample())).unwrap();

        assert_eq!(json["title"], "Cozy flat");
        assert_eq!(json["location"], "Usaquén");
        assert_eq!(json["price"], "1200.50");
        assert_eq!(json["property_type"], "apartment");
        assert_eq!(json["status"], "rented");
        assert_eq!(json["model_3d_path"], "/models/apartment2.glb");
        assert_eq!(json["features"], serde_json::json!(["Balcony"]));
        assert_eq!(json["owner_id"], serde_json::Value::Null);
        assert_eq!(json["created_at"], "1970-01-01T00:00:00Z");
        assert!(json.get("model_url").is_none());
        assert!(json.get("owner_name").is_none());
    }

    #[test]
    fn renders_owner_details() {
        let json = serde_json::to_value(Listing::from(detailed())).unwrap();

        assert_eq!(json["owner_name"], "Ana Martínez");
        assert_eq!(json["owner_email"], "ana@example.com");
    }

    #[test]
    fn renders_page_envelope() {
        let page = list::Page::new(
            list::Arguments::new(3, 2).unwrap(),
            vec![detailed()],
            5,
        );

        let json = serde_json::to_value(Page::from(page)).unwrap();

        assert_eq!(
            json["pagination"],
            serde_json::json!({
                "currentPage": 3,
                "totalPages": 3,
                "totalItems": 5,
                "itemsPerPage": 2,
            }),
        );
        let properties = json["properties"].as_array().unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0]["owner_name"], "Ana Martínez");
        assert!(properties[0].get("owner_email").is_none());
    }
}
