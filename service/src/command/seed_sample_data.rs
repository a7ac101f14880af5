//! [`Command`] for storing sample [`User`]s and [`Listing`]s.

use common::{operations::Insert, DateTime};
use rust_decimal::Decimal;
use tracerr::Traced;
use tracing as log;
use uuid::Uuid;

use crate::{
    domain::{listing, user, Listing, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for storing sample [`User`]s and [`Listing`]s, making a fresh
/// catalog explorable.
///
/// Samples have fixed IDs, so repeated executions overwrite the previously
/// stored samples instead of duplicating them. Other data is left intact.
#[derive(Clone, Copy, Debug)]
pub struct SeedSampleData;

impl<Db> Command<SeedSampleData> for Service<Db>
where
    Db: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Insert<Listing>, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: SeedSampleData) -> Result<Self::Ok, Self::Err> {
        let users = USERS.iter().map(SampleUser::build).collect::<Vec<_>>();
        let owners = users
            .iter()
            .filter(|u| !u.is_admin())
            .map(|u| u.id)
            .collect::<Vec<_>>();

        for user in users {
            self.database()
                .execute(Insert(user))
                .await
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }
        let owners = owners.into_iter().cycle();
        for (sample, owner_id) in LISTINGS.iter().zip(owners) {
            self.database()
                .execute(Insert(sample.build(Some(owner_id))))
                .await
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        log::info!(
            "seeded {} sample `User`s and {} sample `Listing`s",
            USERS.len(),
            LISTINGS.len(),
        );

        Ok(())
    }
}

/// Error of [`SeedSampleData`] [`Command`] execution.
pub type ExecutionError = database::Error;

/// Sample [`User`].
struct SampleUser {
    /// ID of this [`SampleUser`].
    id: u128,

    /// [`user::Name`] of this [`SampleUser`].
    name: &'static str,

    /// [`user::Email`] of this [`SampleUser`].
    email: &'static str,

    /// [`user::Role`] of this [`SampleUser`].
    role: user::Role,
}

impl SampleUser {
    /// Builds the [`User`] out of this [`SampleUser`].
    fn build(&self) -> User {
        User {
            id: Uuid::from_u128(self.id).into(),
            name: user::Name::new(self.name).expect("valid sample `Name`"),
            email: Some(
                user::Email::new(self.email).expect("valid sample `Email`"),
            ),
            role: self.role,
            created_at: DateTime::now().coerce(),
        }
    }
}

/// Sample [`Listing`].
struct SampleListing {
    /// ID of this [`SampleListing`].
    id: u128,

    /// [`listing::Title`] of this [`SampleListing`].
    title: &'static str,

    /// [`listing::Description`] of this [`SampleListing`].
    description: &'static str,

    /// [`listing::Price`] of this [`SampleListing`].
    price: u64,

    /// [`listing::Location`] of this [`SampleListing`].
    location: &'static str,

    /// Number of bedrooms.
    bedrooms: listing::RoomsCount,

    /// Number of bathrooms.
    bathrooms: listing::RoomsCount,

    /// [`listing::Area`] of this [`SampleListing`].
    area: u64,

    /// [`listing::Kind`] of this [`SampleListing`].
    kind: listing::Kind,

    /// [`listing::ImageUrl`]s of this [`SampleListing`].
    images: &'static [&'static str],

    /// [`listing::ModelUrl`] of this [`SampleListing`].
    model_url: &'static str,

    /// [`listing::Feature`]s of this [`SampleListing`].
    features: &'static [&'static str],
}

impl SampleListing {
    /// Builds the [`Listing`] out of this [`SampleListing`].
    fn build(&self, owner_id: Option<user::Id>) -> Listing {
        Listing {
            id: Uuid::from_u128(self.id).into(),
            title: listing::Title::new(self.title)
                .expect("valid sample `Title`"),
            description: Some(
                listing::Description::new(self.description)
                    .expect("valid sample `Description`"),
            ),
            price: listing::Price::new(Decimal::from(self.price))
                .expect("valid sample `Price`"),
            location: listing::Location::new(self.location)
                .expect("valid sample `Location`"),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area: listing::Area::new(Decimal::from(self.area))
                .expect("valid sample `Area`"),
            kind: self.kind,
            status: listing::Status::Available,
            images: self
                .images
                .iter()
                .map(|url| {
                    listing::ImageUrl::new(*url)
                        .expect("valid sample `ImageUrl`")
                })
                .collect(),
            model_url: Some(
                listing::ModelUrl::new(self.model_url)
                    .expect("valid sample `ModelUrl`"),
            ),
            features: self
                .features
                .iter()
                .map(|f| {
                    listing::Feature::new(*f).expect("valid sample `Feature`")
                })
                .collect(),
            owner_id,
            created_at: DateTime::now().coerce(),
        }
    }
}

/// Sample [`User`]s. Regular ones own the [`LISTINGS`] in turns.
const USERS: &[SampleUser] = &[
    SampleUser {
        id: 0x5eed_0001_0000_0000_0000_0000_0000_0001,
        name: "María González",
        email: "maria@example.com",
        role: user::Role::Admin,
    },
    SampleUser {
        id: 0x5eed_0001_0000_0000_0000_0000_0000_0002,
        name: "Carlos Rodríguez",
        email: "carlos@example.com",
        role: user::Role::User,
    },
    SampleUser {
        id: 0x5eed_0001_0000_0000_0000_0000_0000_0003,
        name: "Ana Martínez",
        email: "ana@example.com",
        role: user::Role::User,
    },
];

/// Sample [`Listing`]s.
const LISTINGS: &[SampleListing] = &[
    SampleListing {
        id: 0x5eed_0002_0000_0000_0000_0000_0000_0001,
        title: "Casa Moderna en Zona Rosa",
        description: "Hermosa casa moderna de 3 pisos con acabados de lujo, \
                      ubicada en el corazón de la Zona Rosa. Cuenta con \
                      amplios espacios, jardín privado y garaje para 2 \
                      vehículos.",
        price: 850_000_000,
        location: "Zona Rosa, Bogotá",
        bedrooms: 4,
        bathrooms: 3,
        area: 180,
        kind: listing::Kind::House,
        images: &[
            "https://images.unsplash.com/photo-1600596542815-ffad4c1539a9?w=800",
            "https://images.unsplash.com/photo-1600607687939-ce8a6c25118c?w=800",
            "https://images.unsplash.com/photo-1600566753190-17f0baa2a6c3?w=800",
        ],
        model_url: "/models/house1.glb",
        features: &[
            "Jardín privado",
            "Garaje para 2 carros",
            "Terraza en azotea",
            "Sala de juegos",
            "Closets empotrados",
            "Cocina integral",
            "Zona de lavandería",
        ],
    },
    SampleListing {
        id: 0x5eed_0002_0000_0000_0000_0000_0000_0002,
        title: "Apartamento Ejecutivo en Chapinero",
        description: "Elegante apartamento en torre de lujo con vista \
                      panorámica de la ciudad. Incluye amenities como \
                      gimnasio, piscina y salón comunal.",
        price: 450_000_000,
        location: "Chapinero, Bogotá",
        bedrooms: 3,
        bathrooms: 2,
        area: 120,
        kind: listing::Kind::Apartment,
        images: &[
            "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800",
            "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=800",
            "https://images.unsplash.com/photo-1560448204-603b3fc33ddc?w=800",
        ],
        model_url: "/models/apartment1.glb",
        features: &[
            "Vista panorámica",
            "Amenities del edificio",
            "Gimnasio",
            "Piscina",
            "Salón comunal",
            "Seguridad 24/7",
            "Ascensor",
        ],
    },
    SampleListing {
        id: 0x5eed_0002_0000_0000_0000_0000_0000_0003,
        title: "Casa Campestre en Chía",
        description: "Espaciosa casa campestre con terreno de 2000m², ideal \
                      para familias que buscan tranquilidad y contacto con \
                      la naturaleza.",
        price: 1_200_000_000,
        location: "Chía, Cundinamarca",
        bedrooms: 5,
        bathrooms: 4,
        area: 300,
        kind: listing::Kind::House,
        images: &[
            "https://images.unsplash.com/photo-1600566753190-17f0baa2a6c3?w=800",
        ],
        model_url: "/models/house2.glb",
        features: &[
            "Terreno de 2000m²",
            "Jardín amplio",
            "Huerta",
            "Garaje para 3 carros",
            "Bodega",
            "Terraza cubierta",
            "Zona de parrilla",
        ],
    },
    SampleListing {
        id: 0x5eed_0002_0000_0000_0000_0000_0000_0004,
        title: "Oficina Comercial en Centro",
        description: "Moderno local comercial en el centro de Bogotá, ideal \
                      para oficinas o negocio. Excelente ubicación y alta \
                      afluencia de público.",
        price: 320_000_000,
        location: "Centro, Bogotá",
        bedrooms: 0,
        bathrooms: 2,
        area: 80,
        kind: listing::Kind::Commercial,
        images: &[
            "https://images.unsplash.com/photo-1497366216548-37526070297c?w=800",
            "https://images.unsplash.com/photo-1497366754035-f200968a6e72?w=800",
        ],
        model_url: "/models/office1.glb",
        features: &[
            "Ubicación estratégica",
            "Alta afluencia",
            "Estacionamiento",
            "Aire acondicionado",
            "Sistema de seguridad",
            "Acceso para discapacitados",
        ],
    },
    SampleListing {
        id: 0x5eed_0002_0000_0000_0000_0000_0000_0005,
        title: "Apartamento en Usaquén",
        description: "Acogedor apartamento de 2 habitaciones en barrio \
                      residencial, cerca a parques y colegios. Ideal para \
                      parejas jóvenes.",
        price: 280_000_000,
        location: "Usaquén, Bogotá",
        bedrooms: 2,
        bathrooms: 2,
        area: 75,
        kind: listing::Kind::Apartment,
        images: &[
            "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800",
            "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=800",
            "https://images.unsplash.com/photo-1560448204-603b3fc33ddc?w=800",
        ],
        model_url: "/models/apartment2.glb",
        features: &[
            "Barrio residencial",
            "Cerca a parques",
            "Seguridad",
            "Ascensor",
            "Balcón",
            "Closets empotrados",
        ],
    },
    SampleListing {
        id: 0x5eed_0002_0000_0000_0000_0000_0000_0006,
        title: "Terreno en Suba",
        description: "Terreno plano de 500m² en excelente ubicación, ideal \
                      para construcción de casa o edificio. Servicios \
                      públicos disponibles.",
        price: 180_000_000,
        location: "Suba, Bogotá",
        bedrooms: 0,
        bathrooms: 0,
        area: 500,
        kind: listing::Kind::Land,
        images: &[
            "https://images.unsplash.com/photo-1600607687939-ce8a6c25118c?w=800",
            "https://images.unsplash.com/photo-1600566753190-17f0baa2a6c3?w=800",
        ],
        model_url: "/models/land1.glb",
        features: &[
            "Terreno plano",
            "Servicios públicos",
            "Excelente ubicación",
            "Fácil acceso",
            "Zona residencial",
        ],
    },
];
