/*!
 * Geographic calculations.
 *
 * The ellipsoidal (geodesic) distance comes from the `geo` crate. The rest are simple enough to
 * implement here.
 */
use ::geo::{GeodesicDistance, Point};
use strum::{Display, EnumIter, EnumString};

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coord { lat, lon }
    }

    /// Determine if these coordinates are close to each other.
    ///
    /// The eps parameter is the maximum distance in degrees (on either axis) to consider the
    /// values close.
    pub fn is_close(&self, other: Coord, eps: f64) -> bool {
        (self.lat - other.lat).abs() <= eps && (self.lon - other.lon).abs() <= eps
    }

    fn as_point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// The ways a distance between two coordinates can be measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum DistanceMetric {
    /// Straight line distance with latitude and longitude treated as plane coordinates, in
    /// degrees.
    #[default]
    Planar,
    /// Distance along the WGS84 ellipsoid, in kilometers.
    Geodesic,
}

impl DistanceMetric {
    pub fn distance(self, a: Coord, b: Coord) -> f64 {
        match self {
            DistanceMetric::Planar => planar_distance(a, b),
            DistanceMetric::Geodesic => geodesic_distance(a, b),
        }
    }
}

/// Euclidean distance in degree space.
pub fn planar_distance(a: Coord, b: Coord) -> f64 {
    f64::hypot(a.lat - b.lat, a.lon - b.lon)
}

/// Distance in kilometers along the WGS84 ellipsoid.
pub fn geodesic_distance(a: Coord, b: Coord) -> f64 {
    a.as_point().geodesic_distance(&b.as_point()) / 1000.0
}

/**
 * the simple great circle distance calculation.
 *
 * #Arguments
 * * lat1 - the latitude of the first point in degrees.
 * * lon1 - the longitude of the first point in degrees.
 * * lat2 - the latitude of the second point in degrees.
 * * lon2 - the longitude of the second point in degrees.
 *
 * #Returns
 * The distance between the points in kilometers.
 */
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const DEG2RAD: f64 = 2.0 * std::f64::consts::PI / 360.0;
    const EARTH_RADIUS_KM: f64 = 6371.0090;

    let lat1_r = lat1 * DEG2RAD;
    let lon1_r = lon1 * DEG2RAD;
    let lat2_r = lat2 * DEG2RAD;
    let lon2_r = lon2 * DEG2RAD;

    let dlat2 = (lat2_r - lat1_r) / 2.0;
    let dlon2 = (lon2_r - lon1_r) / 2.0;

    let sin2_dlat = f64::powf(f64::sin(dlat2), 2.0);
    let sin2_dlon = f64::powf(f64::sin(dlon2), 2.0);

    let arc = 2.0
        * f64::asin(f64::sqrt(
            sin2_dlat + sin2_dlon * f64::cos(lat1_r) * f64::cos(lat2_r),
        ));

    arc * EARTH_RADIUS_KM
}

/// The arithmetic mean of a group of coordinates, `None` if there are none.
pub fn mean_center<I>(coords: I) -> Option<Coord>
where
    I: IntoIterator<Item = Coord>,
{
    let (sum, count) = coords
        .into_iter()
        .fold((Coord::default(), 0usize), |(acc, n), c| {
            (Coord::new(acc.lat + c.lat, acc.lon + c.lon), n + 1)
        });

    if count == 0 {
        return None;
    }

    Some(Coord::new(sum.lat / count as f64, sum.lon / count as f64))
}
