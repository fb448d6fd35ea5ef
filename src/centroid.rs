/*!
 * Labor-force weighted center of a group of municipalities.
 *
 * Used to justify a suggested location: every municipality pulls the center towards itself in
 * proportion to its share of the total PEA.
 */
use crate::{
    error::{CapSiteError, NO_DATA},
    geo::Coord,
    location::LocationPoint,
};
use std::fmt::{self, Display};

/// The contribution of one municipality to the weighted center.
#[derive(Debug, Clone, PartialEq)]
pub struct JustificationRow {
    pub municipality: String,
    pub coord: Coord,
    pub weight: f64,
    /// This row's share of the total weight.
    pub normalized_weight: f64,
    pub weighted_lat: f64,
    pub weighted_lon: f64,
}

/// The per-municipality breakdown and the weighted center it adds up to.
#[derive(Debug, Clone, PartialEq)]
pub struct Justification {
    pub rows: Vec<JustificationRow>,
    pub total_weight: f64,
    pub centroid: Coord,
}

impl Justification {
    /**
     * Compute the weighted center of a group of points.
     *
     * Each weight is divided by the total, each coordinate is multiplied by that share, and the
     * products are summed.
     *
     * #Returns
     * The "no data" error if there are no points, any weight is negative, or the total weight is
     * not a positive finite number.
     */
    pub fn from_points(points: &[LocationPoint]) -> Result<Self, CapSiteError> {
        if points.iter().any(|pnt| pnt.weight < 0.0) {
            return Err(NO_DATA);
        }

        let total_weight: f64 = points.iter().map(|pnt| pnt.weight).sum();
        if !(total_weight.is_finite() && total_weight > 0.0) {
            return Err(NO_DATA);
        }

        let rows: Vec<JustificationRow> = points
            .iter()
            .map(|pnt| {
                let normalized_weight = pnt.weight / total_weight;
                JustificationRow {
                    municipality: pnt.label.clone(),
                    coord: pnt.coord,
                    weight: pnt.weight,
                    normalized_weight,
                    weighted_lat: pnt.coord.lat * normalized_weight,
                    weighted_lon: pnt.coord.lon * normalized_weight,
                }
            })
            .collect();

        let centroid = rows.iter().fold(Coord::default(), |acc, row| {
            Coord::new(acc.lat + row.weighted_lat, acc.lon + row.weighted_lon)
        });

        Ok(Justification {
            rows,
            total_weight,
            centroid,
        })
    }
}

/// Just the weighted center.
pub fn weighted_centroid(points: &[LocationPoint]) -> Result<Coord, CapSiteError> {
    Justification::from_points(points).map(|just| just.centroid)
}

impl Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(
            f,
            "{:<30} {:>11} {:>12} {:>12} {:>10} {:>11} {:>12}",
            "MUNICIPIO", "LATITUD", "LONGITUD", "PEA", "PEA_norm", "Lat_pond", "Lon_pond"
        )?;

        for row in &self.rows {
            writeln!(
                f,
                "{:<30} {:>11.6} {:>12.6} {:>12.0} {:>10.6} {:>11.6} {:>12.6}",
                row.municipality,
                row.coord.lat,
                row.coord.lon,
                row.weight,
                row.normalized_weight,
                row.weighted_lat,
                row.weighted_lon
            )?;
        }

        write!(
            f,
            "Weighted center: {:.6},{:.6} (total PEA {:.0})",
            self.centroid.lat, self.centroid.lon, self.total_weight
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rejects_degenerate_input() {
        assert!(weighted_centroid(&[]).is_err());

        let zeros = vec![
            LocationPoint::new(1.0, 1.0, "A", "X", 0.0),
            LocationPoint::new(2.0, 2.0, "B", "X", 0.0),
        ];
        assert!(weighted_centroid(&zeros).is_err());

        let negative = vec![
            LocationPoint::new(1.0, 1.0, "A", "X", 5.0),
            LocationPoint::new(2.0, 2.0, "B", "X", -1.0),
        ];
        assert!(weighted_centroid(&negative).is_err());
    }

    #[test]
    fn test_rows_follow_input_order() {
        let points = vec![
            LocationPoint::new(10.0, 20.0, "A", "X", 1.0),
            LocationPoint::new(30.0, 40.0, "B", "X", 1.0),
        ];

        let just = Justification::from_points(&points).unwrap();

        assert_eq!(just.total_weight, 2.0);
        assert_eq!(just.rows[0].municipality, "A");
        assert_eq!(just.rows[1].municipality, "B");
        assert_eq!(just.rows[0].normalized_weight, 0.5);
        assert_eq!(just.rows[1].weighted_lon, 20.0);
        assert!(just.centroid.is_close(Coord::new(20.0, 30.0), 1.0e-12));
    }
}
