use thiserror::Error;

use super::dto::{DistanceStats, DistancesResponse, UserPairDistance};
use super::geodesic::{geodesic_km, LatLon};
use crate::users::repo_types::{Coordinate, User};

#[derive(Debug, Error, PartialEq)]
pub enum DistanceError {
    #[error("At least two users are required to compute distances (found {found})")]
    NotEnoughUsers { found: usize },

    #[error("User with ID {user_id} has an invalid {field}")]
    InvalidCoordinate {
        user_id: String,
        field: &'static str,
    },
}

fn locate(user: &User) -> Result<LatLon, DistanceError> {
    let degrees = |c: &Coordinate, field: &'static str| {
        c.degrees().ok_or_else(|| DistanceError::InvalidCoordinate {
            user_id: user.id.clone(),
            field,
        })
    };
    Ok(LatLon::new(
        degrees(&user.latitude, "latitude")?,
        degrees(&user.longitude, "longitude")?,
    ))
}

/// Distances for every unordered pair, in `(i, j)` order with `i < j`.
pub fn pairwise_distances(users: &[User]) -> Result<Vec<UserPairDistance>, DistanceError> {
    let points = users.iter().map(locate).collect::<Result<Vec<_>, _>>()?;

    let n = users.len();
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for (i, (a, pa)) in users.iter().zip(&points).enumerate() {
        for (b, pb) in users[i + 1..].iter().zip(&points[i + 1..]) {
            out.push(UserPairDistance {
                a: a.clone(),
                b: b.clone(),
                distance: geodesic_km(*pa, *pb),
            });
        }
    }
    Ok(out)
}

/// Min, max, mean and population standard deviation; `None` when empty.
///
/// Ties for min/max keep the first value encountered.
pub fn summarize(values: &[f64]) -> Option<DistanceStats> {
    let (&first, rest) = values.split_first()?;
    let (min, max) = rest.iter().fold((first, first), |(lo, hi), &v| {
        (if v < lo { v } else { lo }, if v > hi { v } else { hi })
    });

    let n = values.len() as f64;
    let average = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - average).powi(2)).sum::<f64>() / n;

    Some(DistanceStats {
        min,
        max,
        average,
        std: variance.sqrt(),
    })
}

/// Full report over a snapshot of users. Fewer than two users is an error.
pub fn distance_report(users: &[User]) -> Result<DistancesResponse, DistanceError> {
    let not_enough = DistanceError::NotEnoughUsers { found: users.len() };
    if users.len() < 2 {
        return Err(not_enough);
    }

    let distances = pairwise_distances(users)?;
    let values: Vec<f64> = distances.iter().map(|d| d.distance).collect();
    let stats = summarize(&values).ok_or(not_enough)?;

    Ok(DistancesResponse { distances, stats })
}
