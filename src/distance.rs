/*!
 * Distances from each municipality to the location proposed for its state.
 *
 * The input carries two coordinate pairs per row: the municipality (LATITUD, LONGITUD) and the
 * proposed location (LATITUD_1, LONGITUD_1). The distance between them is measured on the
 * ellipsoid, in kilometers. A blank PEA cell counts as zero, so it adds nothing to the totals.
 */
use crate::{
    error::LoadError,
    geo::{geodesic_distance, Coord},
    table::{columns, Table},
};
use std::fmt::{self, Display};

/// The columns a distance file has to have.
pub const DISTANCE_COLUMNS: [&str; 7] = [
    columns::ESTADO,
    columns::MUNICIPIO,
    columns::LATITUD,
    columns::LONGITUD,
    columns::LATITUD_1,
    columns::LONGITUD_1,
    columns::PEA,
];

/// Label used for the summary row.
pub const TOTAL_LABEL: &str = "TOTAL";

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceRow {
    pub state: String,
    pub municipality: String,
    pub from: Coord,
    pub to: Coord,
    pub pea: f64,
    pub distance_km: f64,
}

/// Every row of a distance file, with the distance already computed.
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    rows: Vec<DistanceRow>,
}

impl DistanceTable {
    pub fn from_table(table: &Table) -> Result<Self, LoadError> {
        table.require_columns(&DISTANCE_COLUMNS)?;

        let idx = |name: &str| table.column_index(name).unwrap_or_default();
        let (state, municipality) = (idx(columns::ESTADO), idx(columns::MUNICIPIO));
        let (lat, lon) = (idx(columns::LATITUD), idx(columns::LONGITUD));
        let (lat1, lon1) = (idx(columns::LATITUD_1), idx(columns::LONGITUD_1));
        let pea = idx(columns::PEA);

        let rows = (0..table.len())
            .map(|row| {
                let from = Coord::new(table.number(row, lat)?, table.number(row, lon)?);
                let to = Coord::new(table.number(row, lat1)?, table.number(row, lon1)?);

                Ok(DistanceRow {
                    state: table.text(row, state).to_owned(),
                    municipality: table.text(row, municipality).to_owned(),
                    from,
                    to,
                    pea: table.optional_number(row, pea)?.unwrap_or(0.0),
                    distance_km: geodesic_distance(from, to),
                })
            })
            .collect::<Result<Vec<_>, LoadError>>()?;

        Ok(DistanceTable { rows })
    }

    pub fn rows(&self) -> &[DistanceRow] {
        &self.rows
    }

    /// The distinct states in the order they first appear.
    pub fn states(&self) -> Vec<String> {
        unique(self.rows.iter().map(|r| r.state.as_str()))
    }

    /// The distinct municipalities of a state in the order they first appear.
    pub fn municipalities(&self, state: &str) -> Vec<String> {
        unique(
            self.rows
                .iter()
                .filter(|r| r.state == state)
                .map(|r| r.municipality.as_str()),
        )
    }

    /**
     * Pick the rows of a state, optionally only some of its municipalities.
     *
     * An empty `municipalities` list means all of them.
     */
    pub fn select(&self, state: &str, municipalities: &[String]) -> DistanceSelection {
        let rows: Vec<DistanceRow> = self
            .rows
            .iter()
            .filter(|r| r.state == state)
            .filter(|r| municipalities.is_empty() || municipalities.contains(&r.municipality))
            .cloned()
            .collect();

        let total_pea = rows.iter().map(|r| r.pea).sum();
        let total_distance_km = rows.iter().map(|r| r.distance_km).sum();

        DistanceSelection {
            rows,
            total_pea,
            total_distance_km,
        }
    }
}

/// The rows picked for one state plus their totals.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceSelection {
    pub rows: Vec<DistanceRow>,
    pub total_pea: f64,
    pub total_distance_km: f64,
}

impl Display for DistanceSelection {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(
            f,
            "{:<24} {:<30} {:>12} {:>14}",
            columns::ESTADO,
            columns::MUNICIPIO,
            columns::PEA,
            columns::DISTANCIA_KM
        )?;

        for row in &self.rows {
            writeln!(
                f,
                "{:<24} {:<30} {:>12.0} {:>14.3}",
                row.state, row.municipality, row.pea, row.distance_km
            )?;
        }

        write!(
            f,
            "{:<24} {:<30} {:>12.0} {:>14.3}",
            TOTAL_LABEL, TOTAL_LABEL, self.total_pea, self.total_distance_km
        )
    }
}

fn unique<'a, I: Iterator<Item = &'a str>>(values: I) -> Vec<String> {
    let mut seen: Vec<String> = vec![];
    for v in values {
        if !seen.iter().any(|s| s == v) {
            seen.push(v.to_owned());
        }
    }
    seen
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = "\
ESTADO,MUNICIPIO,LATITUD,LONGITUD,LATITUD_1,LONGITUD_1,PEA
JALISCO,GUADALAJARA,20.6597,-103.3496,20.6597,-103.3496,100
JALISCO,ZAPOPAN,20.7214,-103.3918,20.6597,-103.3496,50
SONORA,HERMOSILLO,29.0729,-110.9559,29.0729,-110.9559,70
";

    #[test]
    fn test_distances_and_totals() {
        let table = Table::from_reader(SAMPLE.as_bytes()).unwrap();
        let dists = DistanceTable::from_table(&table).unwrap();

        assert_eq!(dists.rows().len(), 3);
        assert_eq!(dists.states(), vec!["JALISCO", "SONORA"]);
        assert_eq!(dists.municipalities("JALISCO"), vec!["GUADALAJARA", "ZAPOPAN"]);

        let sel = dists.select("JALISCO", &[]);
        assert_eq!(sel.rows.len(), 2);
        assert!(sel.rows[0].distance_km.abs() < 1.0e-9);
        assert!(sel.rows[1].distance_km > 7.0 && sel.rows[1].distance_km < 9.0);
        assert_eq!(sel.total_pea, 150.0);
        assert!((sel.total_distance_km - sel.rows[1].distance_km).abs() < 1.0e-9);

        let sel = dists.select("JALISCO", &["ZAPOPAN".to_owned()]);
        assert_eq!(sel.rows.len(), 1);
        assert_eq!(sel.total_pea, 50.0);

        let sel = dists.select("YUCATAN", &[]);
        assert!(sel.rows.is_empty());
        assert_eq!(sel.total_pea, 0.0);
    }

    #[test]
    fn test_blank_pea_in_another_state() {
        let text = format!("{}SONORA,CAJEME,27.49,-109.93,29.0729,-110.9559,\n", SAMPLE);
        let table = Table::from_reader(text.as_bytes()).unwrap();
        let dists = DistanceTable::from_table(&table).unwrap();

        let jalisco = dists.select("JALISCO", &[]);
        assert_eq!(jalisco.rows.len(), 2);
        assert_eq!(jalisco.total_pea, 150.0);

        let sonora = dists.select("SONORA", &[]);
        assert_eq!(sonora.rows.len(), 2);
        assert_eq!(sonora.rows[1].pea, 0.0);
        assert_eq!(sonora.total_pea, 70.0);
        assert!(sonora.total_distance_km > 100.0);
    }

    #[test]
    fn test_display_has_total_row() {
        let table = Table::from_reader(SAMPLE.as_bytes()).unwrap();
        let sel = DistanceTable::from_table(&table).unwrap().select("SONORA", &[]);

        let text = sel.to_string();
        assert!(text.lines().last().unwrap().starts_with("TOTAL"));
        assert!(text.contains("HERMOSILLO"));
    }

    #[test]
    fn test_missing_second_coordinate() {
        let table = Table::from_reader("ESTADO,MUNICIPIO,LATITUD,LONGITUD,PEA\n".as_bytes()).unwrap();

        assert!(matches!(
            DistanceTable::from_table(&table),
            Err(LoadError::MissingColumns { .. })
        ));
    }
}
