use capsite::{
    argmin, assign_nearest, great_circle_distance, open_for_view, proposed_sites, weighted_centroid,
    write_html, write_kml, write_sites_csv, Coord, DistanceMetric, Justification, KMeans,
    LocationPoint, MarkerMap, Palette, ProposedSite, Table,
};
use std::{path::PathBuf, sync::Arc};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("capsite-{}-{}", std::process::id(), name))
}

fn reference_grid() -> Vec<LocationPoint> {
    let mut pnts = vec![];
    for i in 0..6 {
        for j in 0..5 {
            let lat = 15.0 + 2.3 * i as f64 + 0.1 * j as f64;
            let lon = -115.0 + 3.7 * j as f64 - 0.2 * i as f64;
            pnts.push(LocationPoint::new(
                lat,
                lon,
                format!("M{}{}", i, j),
                format!("E{}", i),
                1000.0 * (i + j + 1) as f64,
            ));
        }
    }
    pnts
}

/*-------------------------------------------------------------------------------------------------
 *                                  Nearest reference assignment
 *-----------------------------------------------------------------------------------------------*/
#[test]
fn test_assignment_picks_closest_reference() {
    let reference = vec![
        LocationPoint::new(0.0, 0.0, "A", "X", 1.0),
        LocationPoint::new(10.0, 10.0, "B", "Y", 1.0),
    ];
    let sites = vec![ProposedSite::new(Coord::new(1.0, 1.0), "CAP 1")];

    let sites = assign_nearest(sites, &reference, DistanceMetric::Planar);

    assert_eq!(sites[0].label(), Some("A"));
    assert_eq!(sites[0].region(), Some("X"));
}

#[test]
fn test_assignment_is_minimal() {
    let reference = reference_grid();

    for metric in [DistanceMetric::Planar, DistanceMetric::Geodesic] {
        let clusters = KMeans::new(5).fit(&reference);
        let sites = assign_nearest(proposed_sites(&clusters), &reference, metric);
        assert_eq!(sites.len(), 5);

        for site in &sites {
            let label = site.label().expect("every site gets a label");
            let chosen = reference.iter().find(|p| p.label == label).unwrap();
            let chosen_dist = metric.distance(site.coord, chosen.coord);

            for pnt in &reference {
                assert!(chosen_dist <= metric.distance(site.coord, pnt.coord));
            }
        }
    }
}

#[test]
fn test_assignment_tie_goes_to_first() {
    let reference = vec![
        LocationPoint::new(0.0, -1.0, "WEST", "X", 1.0),
        LocationPoint::new(0.0, 1.0, "EAST", "Y", 1.0),
    ];
    let sites = vec![ProposedSite::new(Coord::new(0.0, 0.0), "CAP 1")];

    let sites = assign_nearest(sites, &reference, DistanceMetric::Planar);
    assert_eq!(sites[0].label(), Some("WEST"));

    assert_eq!(argmin(&[2.0, 1.0, 1.0]), Some(1));
    assert_eq!(argmin(&[]), None);
}

#[test]
fn test_assignment_empty_inputs() {
    let reference = reference_grid();
    assert!(assign_nearest(vec![], &reference, DistanceMetric::Planar).is_empty());

    let sites = vec![ProposedSite::new(Coord::new(1.0, 1.0), "CAP 1")];
    let sites = assign_nearest(sites, &[], DistanceMetric::Planar);
    assert_eq!(sites.len(), 1);
    assert!(sites[0].assignment.is_none());
}

/*-------------------------------------------------------------------------------------------------
 *                                     Clustering and centers
 *-----------------------------------------------------------------------------------------------*/
#[test]
fn test_single_cluster_is_the_mean() {
    let pnts = vec![
        LocationPoint::new(20.0, -100.0, "A", "X", 5.0),
        LocationPoint::new(22.0, -104.0, "B", "X", 1.0),
        LocationPoint::new(21.0, -102.0, "C", "X", 0.0),
    ];

    let clusters = KMeans::new(1).fit(&pnts);
    assert_eq!(clusters.len(), 1);
    assert!(clusters[0].center.is_close(Coord::new(21.0, -102.0), 1.0e-9));
    assert_eq!(clusters[0].count, 3);
}

#[test]
fn test_weighted_centroid_example() {
    let pnts = vec![
        LocationPoint::new(0.0, 0.0, "A", "X", 1.0),
        LocationPoint::new(0.0, 10.0, "B", "X", 3.0),
    ];

    let center = weighted_centroid(&pnts).unwrap();
    assert!(center.is_close(Coord::new(0.0, 7.5), 1.0e-12));
}

#[test]
fn test_normalized_weights_sum_to_one() {
    let just = Justification::from_points(&reference_grid()).unwrap();

    let sum: f64 = just.rows.iter().map(|r| r.normalized_weight).sum();
    assert!((sum - 1.0).abs() < 1.0e-9);
}

#[test]
fn test_single_point_centroid() {
    let pnts = vec![LocationPoint::new(19.4326, -99.1332, "CDMX", "CDMX", 42.0)];

    let center = weighted_centroid(&pnts).unwrap();
    assert!(center.is_close(Coord::new(19.4326, -99.1332), 1.0e-12));
}

#[test]
fn test_centroid_without_weight_is_an_error() {
    let pnts = vec![
        LocationPoint::new(0.0, 0.0, "A", "X", 0.0),
        LocationPoint::new(0.0, 10.0, "B", "X", 0.0),
    ];

    assert!(weighted_centroid(&pnts).is_err());
    assert!(weighted_centroid(&[]).is_err());
}

#[test]
fn test_geodesic_close_to_great_circle() {
    let mty = Coord::new(25.6866, -100.3161);
    let mer = Coord::new(20.9674, -89.5926);

    let geodesic = DistanceMetric::Geodesic.distance(mty, mer);
    let spherical = great_circle_distance(mty.lat, mty.lon, mer.lat, mer.lon);
    assert!((geodesic - spherical).abs() / geodesic < 0.01);
}

/*-------------------------------------------------------------------------------------------------
 *                                        Loading files
 *-----------------------------------------------------------------------------------------------*/
#[test]
fn test_cached_table_is_shared() {
    let path = temp_path("cached.csv");
    std::fs::write(
        &path,
        "ESTADO,MUNICIPIO,LATITUD,LONGITUD\nJALISCO,ZAPOPAN,20.72,-103.39\n",
    )
    .unwrap();

    let first = Table::cached(&path).unwrap();
    let second = Table::cached(&path).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 1);

    let viewed = open_for_view(&path, &["ESTADO", "LATITUD"]).unwrap();
    assert!(Arc::ptr_eq(&first, &viewed));

    assert!(open_for_view(&path, &["ESTADO", "PEA"]).is_none());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_open_for_view_missing_file() {
    assert!(open_for_view(temp_path("does-not-exist.csv"), &["ESTADO"]).is_none());
}

/*-------------------------------------------------------------------------------------------------
 *                                          Output files
 *-----------------------------------------------------------------------------------------------*/
#[test]
fn test_write_outputs() {
    let pnts = reference_grid();
    let sites = assign_nearest(
        proposed_sites(&KMeans::new(3).fit(&pnts)),
        &pnts,
        DistanceMetric::Planar,
    );

    let mut map = MarkerMap::centered_on("Propuesta", &pnts).unwrap();
    map.add_locations(&pnts, Palette::Operators, false);
    map.add_sites(&sites);
    assert_eq!(map.markers.len(), pnts.len() + 3);

    let html_path = temp_path("mapa.html");
    write_html(&html_path, &map).unwrap();
    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("leaflet"));
    assert!(html.contains("CAP 3"));
    assert!(html.trim_end().ends_with("</html>"));

    let kml_path = temp_path("mapa.kml");
    write_kml(&kml_path, &map).unwrap();
    let kml = std::fs::read_to_string(&kml_path).unwrap();
    assert_eq!(kml.matches("<Placemark>").count(), pnts.len() + 3);
    assert!(kml.trim_end().ends_with("</kml>"));

    let csv_path = temp_path("sitios.csv");
    write_sites_csv(&csv_path, &sites).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("LATITUD,LONGITUD,CAP,ESTADO,MUNICIPIO"));
    assert_eq!(lines.count(), 3);

    for path in [html_path, kml_path, csv_path] {
        std::fs::remove_file(path).unwrap();
    }
}
