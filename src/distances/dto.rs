use serde::Serialize;

use crate::users::repo_types::User;

/// One unordered pair of users and the distance between them in km.
#[derive(Debug, Clone, Serialize)]
pub struct UserPairDistance {
    pub a: User,
    pub b: User,
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceStats {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub std: f64,
}

#[derive(Debug, Serialize)]
pub struct DistancesResponse {
    pub distances: Vec<UserPairDistance>,
    pub stats: DistanceStats,
}
