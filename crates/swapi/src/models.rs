//! Typed catalog entities.
//!
//! Field names mirror the upstream JSON exactly. Every struct derives
//! [`Validate`] so the URL fields are checked after deserialization (see
//! [`crate::schema`]).

use holonet_core::ids::extract_id_from_url;
use holonet_core::view::{Named, Sequenced};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateUrl, ValidationError};

/// Custom validator: every element must be an absolute URL.
fn validate_url_list(urls: &[String]) -> Result<(), ValidationError> {
    match urls.iter().find(|u| !u.as_str().validate_url()) {
        Some(bad) => {
            let mut err = ValidationError::new("url_list");
            err.add_param("value".into(), bad);
            Err(err)
        }
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Character {
    pub name: String,
    pub height: String,
    pub mass: String,
    pub hair_color: String,
    pub skin_color: String,
    pub eye_color: String,
    pub birth_year: String,
    pub gender: String,
    #[validate(url)]
    pub homeworld: String,
    #[validate(custom(function = "validate_url_list"))]
    pub films: Vec<String>,
    #[validate(custom(function = "validate_url_list"))]
    pub species: Vec<String>,
    #[validate(custom(function = "validate_url_list"))]
    pub vehicles: Vec<String>,
    #[validate(custom(function = "validate_url_list"))]
    pub starships: Vec<String>,
    pub created: String,
    pub edited: String,
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Starship {
    pub name: String,
    pub model: String,
    pub manufacturer: String,
    pub cost_in_credits: String,
    pub length: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_atmospheric_speed: Option<String>,
    pub crew: String,
    pub passengers: String,
    pub cargo_capacity: String,
    pub consumables: String,
    pub hyperdrive_rating: String,
    #[serde(rename = "MGLT")]
    pub mglt: String,
    pub starship_class: String,
    #[validate(custom(function = "validate_url_list"))]
    pub pilots: Vec<String>,
    #[validate(custom(function = "validate_url_list"))]
    pub films: Vec<String>,
    pub created: String,
    pub edited: String,
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Film {
    pub title: String,
    pub episode_id: i64,
    pub opening_crawl: String,
    pub director: String,
    pub producer: String,
    pub release_date: String,
    #[validate(custom(function = "validate_url_list"))]
    pub characters: Vec<String>,
    #[validate(custom(function = "validate_url_list"))]
    pub planets: Vec<String>,
    #[validate(custom(function = "validate_url_list"))]
    pub starships: Vec<String>,
    #[validate(custom(function = "validate_url_list"))]
    pub vehicles: Vec<String>,
    #[validate(custom(function = "validate_url_list"))]
    pub species: Vec<String>,
    pub created: String,
    pub edited: String,
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Planet {
    pub name: String,
    pub rotation_period: String,
    pub orbital_period: String,
    pub diameter: String,
    pub climate: String,
    pub gravity: String,
    pub terrain: String,
    pub surface_water: String,
    pub population: String,
    #[validate(custom(function = "validate_url_list"))]
    pub residents: Vec<String>,
    #[validate(custom(function = "validate_url_list"))]
    pub films: Vec<String>,
    pub created: String,
    pub edited: String,
    #[validate(url)]
    pub url: String,
}

// ---------------------------------------------------------------------------
// Identity and view traits
// ---------------------------------------------------------------------------

/// A catalog entity identified by its canonical resource URL.
pub trait CatalogEntity {
    /// Schema name used in validation errors.
    const KIND: &'static str;

    fn resource_url(&self) -> &str;

    /// Short numeric identifier, or `""` if the URL has none.
    fn short_id(&self) -> &str {
        extract_id_from_url(self.resource_url())
    }
}

macro_rules! catalog_entity {
    ($ty:ty, $kind:literal, $name_field:ident) => {
        impl CatalogEntity for $ty {
            const KIND: &'static str = $kind;

            fn resource_url(&self) -> &str {
                &self.url
            }
        }

        impl Named for $ty {
            fn display_name(&self) -> &str {
                &self.$name_field
            }
        }
    };
}

catalog_entity!(Character, "character", name);
catalog_entity!(Starship, "starship", name);
catalog_entity!(Film, "film", title);
catalog_entity!(Planet, "planet", name);

impl Sequenced for Film {
    fn sequence_number(&self) -> i64 {
        self.episode_id
    }
}
