//! Distances on the WGS-84 ellipsoid.

use std::f64::consts::PI;

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const WGS84_B: f64 = (1.0 - WGS84_F) * WGS84_A;

const MEAN_EARTH_RADIUS_KM: f64 = 6_371.008_8;
const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Distance in kilometres along the ellipsoid, falling back to the
/// great-circle distance where the ellipsoidal iteration does not converge.
pub fn geodesic_km(from: LatLon, to: LatLon) -> f64 {
    vincenty_km(from, to).unwrap_or_else(|| haversine_km(from, to))
}

/// Vincenty's inverse formula. `None` when the iteration does not settle,
/// which happens for nearly antipodal points.
pub fn vincenty_km(from: LatLon, to: LatLon) -> Option<f64> {
    let l = (to.lon - from.lon).to_radians();
    let u1 = ((1.0 - WGS84_F) * from.lat.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * to.lat.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut converged = None;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // coincident points
            return Some(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // equatorial line
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));

        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if lambda.abs() > PI {
            return None;
        }
        if (lambda - previous).abs() < CONVERGENCE {
            converged = Some((sin_sigma, cos_sigma, sigma, cos_sq_alpha, cos_2sigma_m));
            break;
        }
    }

    let (sin_sigma, cos_sigma, sigma, cos_sq_alpha, cos_2sigma_m) = converged?;

    let u_sq = cos_sq_alpha * (WGS84_A.powi(2) - WGS84_B.powi(2)) / WGS84_B.powi(2);
    let big_a =
        1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma.powi(2))
                        * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));

    let metres = WGS84_B * big_a * (sigma - delta_sigma);
    Some(metres / 1000.0)
}

/// Great-circle distance on a sphere of mean Earth radius.
pub fn haversine_km(from: LatLon, to: LatLon) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    MEAN_EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero() {
        let p = LatLon::new(51.5, -0.1);
        assert_eq!(geodesic_km(p, p), 0.0);
    }

    #[test]
    fn flinders_peak_to_buninyong() {
        // Vincenty's published test line: 54 972.271 m.
        let flinders = LatLon::new(-37.951_033_417, 144.424_867_889);
        let buninyong = LatLon::new(-37.652_821_139, 143.926_495_528);
        let km = vincenty_km(flinders, buninyong).unwrap();
        assert!((km - 54.972_271).abs() < 0.001, "got {km}");
    }

    #[test]
    fn london_to_paris_is_symmetric() {
        let london = LatLon::new(51.5, -0.1);
        let paris = LatLon::new(48.8, 2.3);
        let there = geodesic_km(london, paris);
        let back = geodesic_km(paris, london);
        assert!(there > 340.0 && there < 350.0, "got {there}");
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn ellipsoid_and_sphere_agree_roughly() {
        let jakarta = LatLon::new(-6.2088, 106.8456);
        let bandung = LatLon::new(-6.9175, 107.6191);
        let ellipsoid = geodesic_km(jakarta, bandung);
        let sphere = haversine_km(jakarta, bandung);
        assert!(ellipsoid > 100.0 && ellipsoid < 150.0);
        assert!((ellipsoid - sphere).abs() / ellipsoid < 0.01);
    }

    #[test]
    fn nearly_antipodal_points_still_yield_a_distance() {
        let km = geodesic_km(LatLon::new(0.0, 0.0), LatLon::new(0.5, 179.7));
        assert!(km.is_finite());
        assert!(km > 19_800.0 && km < 20_100.0, "got {km}");
    }
}
