//! [`Listing`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use postgres_types::{Json, ToSql};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{listing, user, Listing},
    infra::{
        database::{
            self,
            postgres::{Clause, Connection},
            Postgres,
        },
        Database,
    },
    read::listing::{list, Detailed, Owner},
};

/// Columns of a [`Listing`] row selected from `listings AS l`.
const COLUMNS: &str = "\
    l.id, l.title, l.description, l.price, l.location, \
    l.bedrooms, l.bathrooms, l.area, l.kind, l.status, \
    l.images, l.model_url, l.features, \
    l.owner_id, l.created_at";

/// Columns of an [`Owner`] selected from `users AS u` joined to the
/// `listings AS l`.
const OWNER_COLUMNS: &str = "u.name AS owner_name, u.email AS owner_email";

/// `FROM` clause joining the owners to the listings.
const DETAILED_FROM: &str = "\
    listings AS l \
    LEFT JOIN users AS u ON u.id = l.owner_id";

/// Decodes a [`Listing`] out of the provided [`Row`] selected with
/// [`COLUMNS`].
fn from_row(row: &Row) -> Listing {
    Listing {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        price: row.get("price"),
        location: row.get("location"),
        bedrooms: u16::try_from(row.get::<_, i32>("bedrooms"))
            .expect("`bedrooms` overflow"),
        bathrooms: u16::try_from(row.get::<_, i32>("bathrooms"))
            .expect("`bathrooms` overflow"),
        area: row.get("area"),
        kind: row.get("kind"),
        status: row.get("status"),
        images: row.get::<_, Json<Vec<listing::ImageUrl>>>("images").0,
        model_url: row.get("model_url"),
        features: row.get::<_, Json<Vec<listing::Feature>>>("features").0,
        owner_id: row.get("owner_id"),
        created_at: row.get("created_at"),
    }
}

/// Decodes a [`Detailed`] listing out of the provided [`Row`] selected with
/// [`COLUMNS`] and [`OWNER_COLUMNS`].
fn detailed_from_row(row: &Row) -> Detailed {
    Detailed {
        listing: from_row(row),
        owner: row
            .get::<_, Option<user::Name>>("owner_name")
            .map(|name| Owner {
                name,
                email: row.get("owner_email"),
            }),
    }
}

impl<C> Database<Select<By<Option<Listing>, listing::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: listing::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM listings AS l \
             WHERE l.id = $1::UUID",
        );
        Ok(self
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Option<Detailed>, listing::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Detailed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Detailed>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: listing::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS}, {OWNER_COLUMNS} \
             FROM {DETAILED_FROM} \
             WHERE l.id = $1::UUID",
        );
        Ok(self
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(detailed_from_row))
    }
}

impl<C> Database<Select<By<list::Page, list::Selector>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::Page, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Selector { arguments, filter } = by.into_inner();

        // Both statements share the very same conditions and parameters.
        let clause = filter.predicates().collect::<Clause>();

        let limit = i64::try_from(arguments.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(arguments.offset()).unwrap_or(i64::MAX);

        let mut ps = clause.params();
        let count_sql = format!(
            "SELECT COUNT(*) AS total \
             FROM listings AS l \
             WHERE {clause}",
        );
        let total = self
            .query_one(count_sql.as_str(), &ps)
            .await
            .map_err(tracerr::wrap!())?
            .get::<_, i64>("total");

        ps.push(&limit);
        let limit_idx = ps.len();
        ps.push(&offset);
        let offset_idx = ps.len();

        let page_sql = format!(
            "SELECT {COLUMNS}, {OWNER_COLUMNS} \
             FROM {DETAILED_FROM} \
             WHERE {clause} \
             ORDER BY l.created_at DESC, l.id DESC \
             LIMIT ${limit_idx}::INT8 \
             OFFSET ${offset_idx}::INT8",
        );
        let items = self
            .query(page_sql.as_str(), &ps)
            .await
            .map_err(tracerr::wrap!())?;

        Ok(list::Page::new(
            arguments,
            items.iter().map(detailed_from_row),
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}

impl<C> Database<Select<By<Vec<Listing>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Listing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let owner_id: user::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM listings AS l \
             WHERE l.owner_id = $1::UUID \
             ORDER BY l.created_at DESC, l.id DESC",
        );
        Ok(self
            .query(sql.as_str(), &[&owner_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Listing>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Listing>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(listing): Insert<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(listing)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Listing>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(listing): Update<Listing>,
    ) -> Result<Self::Ok, Self::Err> {
        let Listing {
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

        let bedrooms = i32::from(bedrooms);
        let bathrooms = i32::from(bathrooms);
        let images = Json(images);
        let features = Json(features);

        const SQL: &str = "\
            INSERT INTO listings (\
                id, title, description, price, location, \
                bedrooms, bathrooms, area, kind, status, \
                images, model_url, features, \
                owner_id, created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::TEXT, $4::NUMERIC, $5::VARCHAR, \
                $6::INT4, $7::INT4, $8::NUMERIC, $9::INT2, $10::INT2, \
                $11::JSONB, $12::VARCHAR, $13::JSONB, \
                $14::UUID, $15::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET title = EXCLUDED.title, \
                description = EXCLUDED.description, \
                price = EXCLUDED.price, \
                location = EXCLUDED.location, \
                bedrooms = EXCLUDED.bedrooms, \
                bathrooms = EXCLUDED.bathrooms, \
                area = EXCLUDED.area, \
                kind = EXCLUDED.kind, \
                status = EXCLUDED.status, \
                images = EXCLUDED.images, \
                model_url = EXCLUDED.model_url, \
                features = EXCLUDED.features";
        let params: [&(dyn ToSql + Sync); 15] = [
            &id,
            &title,
            &description,
            &price,
            &location,
            &bedrooms,
            &bathrooms,
            &area,
            &kind,
            &status,
            &images,
            &model_url,
            &features,
            &owner_id,
            &created_at,
        ];
        self.exec(SQL, &params)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Listing, listing::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Listing, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: listing::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM listings \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Listing, listing::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Listing, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: listing::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM listings \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
