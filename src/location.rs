/*!
 * The points the rest of the crate works on.
 *
 * A [LocationPoint] is an existing, labeled place (a municipality) loaded from the data. A
 * [ProposedSite] is a new location suggested by the clustering step that still has to be tied
 * back to an existing place.
 */
use crate::{
    error::LoadError,
    geo::Coord,
    table::{columns, Table},
};
use std::fmt::{self, Display};

/// An existing municipality with its labor force.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPoint {
    pub coord: Coord,
    /// Municipality.
    pub label: String,
    /// State.
    pub region: String,
    /// Labor force (PEA), used as a weight.
    pub weight: f64,
}

impl LocationPoint {
    pub fn new<S, T>(lat: f64, lon: f64, label: S, region: T, weight: f64) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        LocationPoint {
            coord: Coord::new(lat, lon),
            label: label.into(),
            region: region.into(),
            weight,
        }
    }

    /**
     * Pull location points out of a table.
     *
     * LATITUD and LONGITUD are always needed, MUNICIPIO, ESTADO and PEA are read when present.
     * Missing text columns read as empty strings. A missing PEA column, or a blank PEA cell,
     * reads as zero weight.
     * Use [Table::require_columns] first if a view needs more than that.
     */
    pub fn from_table(table: &Table) -> Result<Vec<Self>, LoadError> {
        table.require_columns(&[columns::LATITUD, columns::LONGITUD])?;

        // Checked just above.
        let lat_idx = table.column_index(columns::LATITUD).unwrap_or_default();
        let lon_idx = table.column_index(columns::LONGITUD).unwrap_or_default();

        let label_idx = table.column_index(columns::MUNICIPIO);
        let region_idx = table.column_index(columns::ESTADO);
        let weight_idx = table.column_index(columns::PEA);

        (0..table.len())
            .map(|row| {
                let lat = table.number(row, lat_idx)?;
                let lon = table.number(row, lon_idx)?;
                let label = label_idx.map(|c| table.text(row, c)).unwrap_or("");
                let region = region_idx.map(|c| table.text(row, c)).unwrap_or("");
                let weight = match weight_idx {
                    Some(c) => table.optional_number(row, c)?.unwrap_or(0.0),
                    None => 0.0,
                };

                Ok(LocationPoint::new(lat, lon, label, region, weight))
            })
            .collect()
    }
}

/// Keep only the points in the given state.
pub fn filter_region(points: &[LocationPoint], region: &str) -> Vec<LocationPoint> {
    points
        .iter()
        .filter(|pnt| pnt.region == region)
        .cloned()
        .collect()
}

/// The existing place a proposed site was tied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// State.
    pub region: String,
    /// Municipality.
    pub label: String,
}

/// A suggested new facility (CAP) location.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedSite {
    pub coord: Coord,
    /// Something like "CAP 3".
    pub id: String,
    /// Filled in by [assign_nearest](crate::assign_nearest).
    pub assignment: Option<Assignment>,
}

impl ProposedSite {
    pub fn new<S: Into<String>>(coord: Coord, id: S) -> Self {
        ProposedSite {
            coord,
            id: id.into(),
            assignment: None,
        }
    }

    pub fn region(&self) -> Option<&str> {
        self.assignment.as_ref().map(|a| a.region.as_str())
    }

    pub fn label(&self) -> Option<&str> {
        self.assignment.as_ref().map(|a| a.label.as_str())
    }
}

impl Display for ProposedSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "{:>8} {:>11.6} {:>12.6}",
            self.id, self.coord.lat, self.coord.lon
        )?;

        match &self.assignment {
            Some(Assignment { region, label }) => write!(f, "  {} / {}", region, label),
            None => write!(f, "  (unassigned)"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_table_with_optional_columns() {
        let table = Table::from_reader(
            "MUNICIPIO,LATITUD,LONGITUD\nPENSIONISSSTE,19.4,-99.1\nNuevo CAP,20.0,-100.0\n"
                .as_bytes(),
        )
        .unwrap();

        let points = LocationPoint::from_table(&table).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label, "PENSIONISSSTE");
        assert_eq!(points[0].region, "");
        assert_eq!(points[0].weight, 0.0);
        assert!(points[1].coord.is_close(Coord::new(20.0, -100.0), 1.0e-12));
    }

    #[test]
    fn test_from_table_blank_weight() {
        let table = Table::from_reader(
            "ESTADO,MUNICIPIO,LATITUD,LONGITUD,PEA\n\
             JALISCO,ZAPOPAN,20.72,-103.39,650000\n\
             JALISCO,Nuevo CAP,20.60,-103.30,\n"
                .as_bytes(),
        )
        .unwrap();

        let points = LocationPoint::from_table(&table).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].weight, 650000.0);
        assert_eq!(points[1].label, "Nuevo CAP");
        assert_eq!(points[1].weight, 0.0);

        let bad = Table::from_reader("LATITUD,LONGITUD,PEA\n20.7,-103.4,muchos\n".as_bytes()).unwrap();
        assert!(matches!(
            LocationPoint::from_table(&bad),
            Err(LoadError::BadValue { .. })
        ));
    }

    #[test]
    fn test_from_table_needs_coordinates() {
        let table = Table::from_reader("ESTADO,MUNICIPIO\nJALISCO,ZAPOPAN\n".as_bytes()).unwrap();

        assert!(matches!(
            LocationPoint::from_table(&table),
            Err(LoadError::MissingColumns { .. })
        ));
    }

    #[test]
    fn test_filter_region() {
        let points = vec![
            LocationPoint::new(0.0, 0.0, "A", "JALISCO", 1.0),
            LocationPoint::new(1.0, 1.0, "B", "SONORA", 1.0),
            LocationPoint::new(2.0, 2.0, "C", "JALISCO", 1.0),
        ];

        let jalisco = filter_region(&points, "JALISCO");
        assert_eq!(jalisco.len(), 2);
        assert_eq!(jalisco[0].label, "A");
        assert_eq!(jalisco[1].label, "C");

        assert!(filter_region(&points, "YUCATAN").is_empty());
    }
}
