use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

/// A latitude or longitude exactly as the client submitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(serde_json::Number),
    Text(String),
}

impl Coordinate {
    /// Decimal degrees, if the value holds a finite number.
    pub fn degrees(&self) -> Option<f64> {
        let value = match self {
            Coordinate::Number(n) => n.as_f64()?,
            Coordinate::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Coordinate::Number)
            .unwrap_or_else(|| Coordinate::Text(value.to_string()))
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Coordinate::Text(value.to_string())
    }
}

/// The four client-owned fields of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFields {
    pub firstname: String,
    pub lastname: String,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
}

/// Stored user as exposed over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub firstname: String,
    pub lastname: String,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub id: String, // application id, immutable
}

impl User {
    pub fn new(id: String, fields: UserFields) -> Self {
        Self {
            firstname: fields.firstname,
            lastname: fields.lastname,
            latitude: fields.latitude,
            longitude: fields.longitude,
            id,
        }
    }

    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(v) = patch.firstname {
            self.firstname = v;
        }
        if let Some(v) = patch.lastname {
            self.lastname = v;
        }
        if let Some(v) = patch.latitude {
            self.latitude = v;
        }
        if let Some(v) = patch.longitude {
            self.longitude = v;
        }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
}

impl From<UserFields> for UserPatch {
    fn from(f: UserFields) -> Self {
        Self {
            firstname: Some(f.firstname),
            lastname: Some(f.lastname),
            latitude: Some(f.latitude),
            longitude: Some(f.longitude),
        }
    }
}

/// Row of the `users` table. The internal `seq` key is never selected.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub latitude: Json<Coordinate>,
    pub longitude: Json<Coordinate>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            firstname: r.firstname,
            lastname: r.lastname,
            latitude: r.latitude.0,
            longitude: r.longitude.0,
            id: r.id,
        }
    }
}
