//! Canned catalog payloads for tests.
//!
//! Shapes match the upstream API; only names, ids, and ordering vary.

use serde_json::{json, Value};

/// Base URL embedded in fixture resource URLs.
pub const FIXTURE_BASE: &str = "https://swapi.info/api";

pub fn character_json(id: u32, name: &str) -> Value {
    json!({
        "name": name,
        "height": "172",
        "mass": "77",
        "hair_color": "blond",
        "skin_color": "fair",
        "eye_color": "blue",
        "birth_year": "19BBY",
        "gender": "male",
        "homeworld": format!("{FIXTURE_BASE}/planets/1"),
        "films": [format!("{FIXTURE_BASE}/films/1")],
        "species": [],
        "vehicles": [format!("{FIXTURE_BASE}/vehicles/14")],
        "starships": [format!("{FIXTURE_BASE}/starships/12")],
        "created": "2014-12-09T13:50:51.644000Z",
        "edited": "2014-12-20T21:17:56.891000Z",
        "url": format!("{FIXTURE_BASE}/people/{id}"),
    })
}

pub fn starship_json(id: u32, name: &str) -> Value {
    json!({
        "name": name,
        "model": "YT-1300 light freighter",
        "manufacturer": "Corellian Engineering Corporation",
        "cost_in_credits": "100000",
        "length": "34.37",
        "max_atmospheric_speed": "1050",
        "crew": "4",
        "passengers": "6",
        "cargo_capacity": "100000",
        "consumables": "2 months",
        "hyperdrive_rating": "0.5",
        "MGLT": "75",
        "starship_class": "Light freighter",
        "pilots": [format!("{FIXTURE_BASE}/people/13")],
        "films": [format!("{FIXTURE_BASE}/films/1")],
        "created": "2014-12-10T16:59:45.094000Z",
        "edited": "2014-12-20T21:23:49.880000Z",
        "url": format!("{FIXTURE_BASE}/starships/{id}"),
    })
}

pub fn film_json(episode_id: i64, title: &str) -> Value {
    json!({
        "title": title,
        "episode_id": episode_id,
        "opening_crawl": "It is a period of civil war.",
        "director": "George Lucas",
        "producer": "Gary Kurtz, Rick McCallum",
        "release_date": "1977-05-25",
        "characters": [format!("{FIXTURE_BASE}/people/1")],
        "planets": [format!("{FIXTURE_BASE}/planets/1")],
        "starships": [format!("{FIXTURE_BASE}/starships/2")],
        "vehicles": [],
        "species": [],
        "created": "2014-12-10T14:23:31.880000Z",
        "edited": "2014-12-20T19:49:45.256000Z",
        "url": format!("{FIXTURE_BASE}/films/{episode_id}"),
    })
}

pub fn planet_json(id: u32, name: &str) -> Value {
    json!({
        "name": name,
        "rotation_period": "23",
        "orbital_period": "304",
        "diameter": "10465",
        "climate": "arid",
        "gravity": "1 standard",
        "terrain": "desert",
        "surface_water": "1",
        "population": "200000",
        "residents": [format!("{FIXTURE_BASE}/people/1")],
        "films": [format!("{FIXTURE_BASE}/films/1")],
        "created": "2014-12-09T13:50:49.641000Z",
        "edited": "2014-12-20T20:58:18.411000Z",
        "url": format!("{FIXTURE_BASE}/planets/{id}"),
    })
}
