//! Structural validation of catalog payloads.
//!
//! A payload becomes a typed value only after two checks pass:
//!
//! 1. strict deserialization -- every required field is present with the
//!    right JSON type (unknown fields are ignored);
//! 2. [`Validate`] -- every URL and URL-list field holds absolute URLs.
//!
//! Failures are reported as [`CatalogError::Validation`]; nothing is ever
//! defaulted or coerced.

use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::CatalogError;
use crate::models::CatalogEntity;

/// Validate a single entity payload.
pub fn parse_entity<T>(payload: serde_json::Value) -> Result<T, CatalogError>
where
    T: DeserializeOwned + Validate + CatalogEntity,
{
    let entity: T = serde_json::from_value(payload).map_err(|e| CatalogError::Validation {
        entity: T::KIND,
        detail: e.to_string(),
    })?;

    entity.validate().map_err(|e| CatalogError::Validation {
        entity: T::KIND,
        detail: e.to_string(),
    })?;

    Ok(entity)
}

/// Validate a collection payload: a flat JSON array of entities.
///
/// The error detail names the index of the first offending element.
pub fn parse_collection<T>(payload: serde_json::Value) -> Result<Vec<T>, CatalogError>
where
    T: DeserializeOwned + Validate + CatalogEntity,
{
    let serde_json::Value::Array(elements) = payload else {
        return Err(CatalogError::Validation {
            entity: T::KIND,
            detail: format!("expected an array, got {}", json_type_name(&payload)),
        });
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            parse_entity::<T>(element).map_err(|e| match e {
                CatalogError::Validation { entity, detail } => CatalogError::Validation {
                    entity,
                    detail: format!("[{index}]: {detail}"),
                },
                other => other,
            })
        })
        .collect()
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::fixtures;
    use crate::models::{Character, Film, Starship};

    #[test]
    fn valid_character_parses() {
        let character: Character = parse_entity(fixtures::character_json(1, "Luke Skywalker")).unwrap();
        assert_eq!(character.name, "Luke Skywalker");
        assert_eq!(character.short_id(), "1");
    }

    #[test]
    fn missing_field_is_rejected() {
        let mut payload = fixtures::character_json(1, "Luke Skywalker");
        payload.as_object_mut().unwrap().remove("height");
        let err = parse_entity::<Character>(payload).unwrap_err();
        assert_matches!(err, CatalogError::Validation { entity: "character", ref detail } if detail.contains("height"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let mut payload = fixtures::film_json(4, "A New Hope");
        payload["episode_id"] = json!("four");
        assert_matches!(
            parse_entity::<Film>(payload),
            Err(CatalogError::Validation { entity: "film", .. })
        );
    }

    #[test]
    fn non_url_identity_is_rejected() {
        let mut payload = fixtures::character_json(1, "Luke Skywalker");
        payload["url"] = json!("not a url");
        assert_matches!(
            parse_entity::<Character>(payload),
            Err(CatalogError::Validation { entity: "character", .. })
        );
    }

    #[test]
    fn non_url_list_element_is_rejected() {
        let mut payload = fixtures::starship_json(10, "Millennium Falcon");
        payload["pilots"] = json!(["https://swapi.info/api/people/13", "chewie"]);
        assert_matches!(
            parse_entity::<Starship>(payload),
            Err(CatalogError::Validation { entity: "starship", .. })
        );
    }

    #[test]
    fn optional_starship_speed_may_be_absent() {
        let mut payload = fixtures::starship_json(9, "Death Star");
        payload.as_object_mut().unwrap().remove("max_atmospheric_speed");
        let starship: Starship = parse_entity(payload).unwrap();
        assert!(starship.max_atmospheric_speed.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut payload = fixtures::character_json(1, "Luke Skywalker");
        payload["force_sensitive"] = json!(true);
        assert!(parse_entity::<Character>(payload).is_ok());
    }

    #[test]
    fn collection_must_be_an_array() {
        let err = parse_collection::<Character>(json!({"results": []})).unwrap_err();
        assert_matches!(err, CatalogError::Validation { ref detail, .. } if detail.contains("object"));
    }

    #[test]
    fn collection_error_names_the_index() {
        let mut bad = fixtures::character_json(2, "C-3PO");
        bad.as_object_mut().unwrap().remove("name");
        let payload = json!([fixtures::character_json(1, "Luke Skywalker"), bad]);
        let err = parse_collection::<Character>(payload).unwrap_err();
        assert_matches!(err, CatalogError::Validation { ref detail, .. } if detail.starts_with("[1]"));
    }

    #[test]
    fn valid_collection_keeps_order() {
        let payload = json!([
            fixtures::character_json(1, "Luke Skywalker"),
            fixtures::character_json(5, "Leia Organa"),
        ]);
        let characters = parse_collection::<Character>(payload).unwrap();
        let names: Vec<&str> = characters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Luke Skywalker", "Leia Organa"]);
    }
}
