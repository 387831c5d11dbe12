use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::users::repo_types::{Coordinate, UserFields};

/// Fields every write must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 4] = ["firstname", "lastname", "latitude", "longitude"];

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Names of required fields that are absent or falsy.
pub fn missing_fields<'a>(payload: &Map<String, Value>, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|field| payload.get(*field).map_or(true, is_falsy))
        .collect()
}

/// Checks a submitted user payload and keeps only the user fields.
pub fn validate_user(payload: &Map<String, Value>) -> Result<UserFields, ApiError> {
    let missing = missing_fields(payload, &REQUIRED_FIELDS);
    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "Missing user data: {}",
            missing.join(", ")
        )));
    }

    let mut invalid = Vec::new();
    let firstname = text_field(payload, "firstname", &mut invalid);
    let lastname = text_field(payload, "lastname", &mut invalid);
    let latitude = coordinate_field(payload, "latitude", &mut invalid);
    let longitude = coordinate_field(payload, "longitude", &mut invalid);

    match (firstname, lastname, latitude, longitude) {
        (Some(firstname), Some(lastname), Some(latitude), Some(longitude)) => Ok(UserFields {
            firstname,
            lastname,
            latitude,
            longitude,
        }),
        _ => Err(ApiError::Validation(format!(
            "Invalid user data: {}",
            invalid.join(", ")
        ))),
    }
}

fn text_field(
    payload: &Map<String, Value>,
    field: &'static str,
    invalid: &mut Vec<&'static str>,
) -> Option<String> {
    match payload.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => {
            invalid.push(field);
            None
        }
    }
}

fn coordinate_field(
    payload: &Map<String, Value>,
    field: &'static str,
    invalid: &mut Vec<&'static str>,
) -> Option<Coordinate> {
    match payload.get(field) {
        Some(Value::String(s)) => Some(Coordinate::Text(s.clone())),
        Some(Value::Number(n)) => Some(Coordinate::Number(n.clone())),
        _ => {
            invalid.push(field);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn reports_every_missing_field_in_declared_order() {
        let payload = obj(json!({ "longitude": "2.3", "firstname": "Ada" }));
        let err = validate_user(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Missing user data: lastname, latitude");
    }

    #[test]
    fn falsy_values_count_as_missing() {
        let payload = obj(json!({
            "firstname": "",
            "lastname": null,
            "latitude": 0,
            "longitude": false
        }));
        assert_eq!(
            missing_fields(&payload, &REQUIRED_FIELDS),
            vec!["firstname", "lastname", "latitude", "longitude"]
        );

        let payload = obj(json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "latitude": [],
            "longitude": {}
        }));
        assert_eq!(
            missing_fields(&payload, &REQUIRED_FIELDS),
            vec!["latitude", "longitude"]
        );
        let err = validate_user(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Missing user data: latitude, longitude");
    }

    #[test]
    fn zero_as_text_is_present() {
        let payload = obj(json!({ "latitude": "0" }));
        assert!(!missing_fields(&payload, &["latitude"]).contains(&"latitude"));
    }

    #[test]
    fn drops_extra_fields() {
        let payload = obj(json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "latitude": "51.5",
            "longitude": -0.1,
            "id": "999",
            "admin": true
        }));
        let fields = validate_user(&payload).unwrap();
        assert_eq!(fields.firstname, "Ada");
        assert_eq!(fields.latitude, Coordinate::Text("51.5".into()));
        assert_eq!(fields.longitude, Coordinate::from(-0.1));
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let payload = obj(json!({
            "firstname": 7,
            "lastname": "Lovelace",
            "latitude": [1],
            "longitude": "2"
        }));
        let err = validate_user(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Invalid user data: firstname, latitude");
    }
}
