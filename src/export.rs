/*!
 * CSV output of the tables the views produce.
 *
 * Column names match the input files so the results can be loaded back in, or opened next to the
 * source data in a spreadsheet.
 */
use crate::{
    centroid::Justification,
    distance::{DistanceSelection, TOTAL_LABEL},
    location::ProposedSite,
    CapSiteResult,
};
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use std::{fs::File, io::Write, path::Path};

const SITE_HEADER: [&str; 5] = ["LATITUD", "LONGITUD", "CAP", "ESTADO", "MUNICIPIO"];

#[derive(Serialize)]
struct SiteRecord<'a> {
    #[serde(rename = "LATITUD")]
    lat: f64,
    #[serde(rename = "LONGITUD")]
    lon: f64,
    #[serde(rename = "CAP")]
    id: &'a str,
    #[serde(rename = "ESTADO")]
    region: &'a str,
    #[serde(rename = "MUNICIPIO")]
    label: &'a str,
}

#[derive(Serialize)]
struct JustificationRecord<'a> {
    #[serde(rename = "MUNICIPIO")]
    municipality: &'a str,
    #[serde(rename = "LATITUD")]
    lat: f64,
    #[serde(rename = "LONGITUD")]
    lon: f64,
    #[serde(rename = "PEA")]
    weight: f64,
    #[serde(rename = "PEA_normalizada")]
    normalized_weight: f64,
    #[serde(rename = "Latitud_Ponderada")]
    weighted_lat: f64,
    #[serde(rename = "Longitud_Ponderada")]
    weighted_lon: f64,
}

#[derive(Serialize)]
struct DistanceRecord<'a> {
    #[serde(rename = "ESTADO")]
    state: &'a str,
    #[serde(rename = "MUNICIPIO")]
    municipality: &'a str,
    #[serde(rename = "LATITUD")]
    lat: Option<f64>,
    #[serde(rename = "LONGITUD")]
    lon: Option<f64>,
    #[serde(rename = "LATITUD_1")]
    lat1: Option<f64>,
    #[serde(rename = "LONGITUD_1")]
    lon1: Option<f64>,
    #[serde(rename = "PEA")]
    pea: f64,
    #[serde(rename = "DISTANCIA_KM")]
    distance_km: f64,
}

/// Write proposed sites with their assigned state and municipality.
///
/// Unassigned sites get empty ESTADO and MUNICIPIO cells. The header is written even when there
/// are no sites.
pub fn write_sites<W: Write>(wtr: W, sites: &[ProposedSite]) -> CapSiteResult<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(wtr);
    wtr.write_record(&SITE_HEADER)?;

    for site in sites {
        wtr.serialize(SiteRecord {
            lat: site.coord.lat,
            lon: site.coord.lon,
            id: &site.id,
            region: site.region().unwrap_or(""),
            label: site.label().unwrap_or(""),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the per-municipality breakdown of a weighted center.
pub fn write_justification<W: Write>(wtr: W, just: &Justification) -> CapSiteResult<()> {
    let mut wtr = Writer::from_writer(wtr);

    for row in &just.rows {
        wtr.serialize(JustificationRecord {
            municipality: &row.municipality,
            lat: row.coord.lat,
            lon: row.coord.lon,
            weight: row.weight,
            normalized_weight: row.normalized_weight,
            weighted_lat: row.weighted_lat,
            weighted_lon: row.weighted_lon,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the selected distance rows followed by the TOTAL row.
pub fn write_distances<W: Write>(wtr: W, sel: &DistanceSelection) -> CapSiteResult<()> {
    let mut wtr = Writer::from_writer(wtr);

    for row in &sel.rows {
        wtr.serialize(DistanceRecord {
            state: &row.state,
            municipality: &row.municipality,
            lat: Some(row.from.lat),
            lon: Some(row.from.lon),
            lat1: Some(row.to.lat),
            lon1: Some(row.to.lon),
            pea: row.pea,
            distance_km: row.distance_km,
        })?;
    }

    wtr.serialize(DistanceRecord {
        state: TOTAL_LABEL,
        municipality: TOTAL_LABEL,
        lat: None,
        lon: None,
        lat1: None,
        lon1: None,
        pea: sel.total_pea,
        distance_km: sel.total_distance_km,
    })?;

    wtr.flush()?;
    Ok(())
}

pub fn write_sites_csv<P: AsRef<Path>>(path: P, sites: &[ProposedSite]) -> CapSiteResult<()> {
    write_sites(File::create(path)?, sites)
}

pub fn write_justification_csv<P: AsRef<Path>>(path: P, just: &Justification) -> CapSiteResult<()> {
    write_justification(File::create(path)?, just)
}

pub fn write_distances_csv<P: AsRef<Path>>(path: P, sel: &DistanceSelection) -> CapSiteResult<()> {
    write_distances(File::create(path)?, sel)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        geo::Coord,
        location::{Assignment, LocationPoint},
    };

    #[test]
    fn test_sites_csv() {
        let mut assigned = ProposedSite::new(Coord::new(20.5, -103.25), "CAP 1");
        assigned.assignment = Some(Assignment {
            region: "JALISCO".to_owned(),
            label: "ZAPOPAN".to_owned(),
        });
        let unassigned = ProposedSite::new(Coord::new(19.0, -99.0), "CAP 2");

        let mut buf: Vec<u8> = vec![];
        write_sites(&mut buf, &[assigned, unassigned]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "LATITUD,LONGITUD,CAP,ESTADO,MUNICIPIO");
        assert_eq!(lines[1], "20.5,-103.25,CAP 1,JALISCO,ZAPOPAN");
        assert_eq!(lines[2], "19.0,-99.0,CAP 2,,");
    }

    #[test]
    fn test_no_sites_still_has_header() {
        let mut buf: Vec<u8> = vec![];
        write_sites(&mut buf, &[]).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "LATITUD,LONGITUD,CAP,ESTADO,MUNICIPIO\n"
        );
    }

    #[test]
    fn test_justification_csv() {
        let points = vec![
            LocationPoint::new(0.0, 0.0, "A", "X", 1.0),
            LocationPoint::new(0.0, 10.0, "B", "X", 3.0),
        ];
        let just = Justification::from_points(&points).unwrap();

        let mut buf: Vec<u8> = vec![];
        write_justification(&mut buf, &just).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "MUNICIPIO,LATITUD,LONGITUD,PEA,PEA_normalizada,Latitud_Ponderada,Longitud_Ponderada"
        );
        assert_eq!(lines[2], "B,0.0,10.0,3.0,0.75,0.0,7.5");
    }
}
