/*!
 * Propose new service-point (CAP) locations from municipal labor-force data.
 *
 * Municipalities are loaded from CSV, grouped with k-means, and the group centers are tied back to
 * the nearest existing municipality. A labor-force weighted center justifies a single suggested
 * location per state. Results go out as interactive HTML maps, KML and CSV.
 */

pub use assign::{argmin, assign_nearest, distance_matrix};
pub use centroid::{weighted_centroid, Justification, JustificationRow};
pub use cluster::{proposed_sites, Cluster, KMeans, DEFAULT_MAX_ITERATIONS, DEFAULT_SITE_COUNT};
pub use distance::{DistanceRow, DistanceSelection, DistanceTable, DISTANCE_COLUMNS};
pub use error::{CapSiteError, LoadError, NO_DATA};
pub use export::{
    write_distances, write_distances_csv, write_justification, write_justification_csv,
    write_sites, write_sites_csv,
};
pub use crate::geo::{
    geodesic_distance, great_circle_distance, mean_center, planar_distance, Coord, DistanceMetric,
};
pub use html::{write_html, HtmlMapFile, HtmlMapWriter};
pub use kml::{write_kml, KmlFile, KmlWriter};
pub use location::{filter_region, Assignment, LocationPoint, ProposedSite};
pub use map::{Marker, MarkerMap};
pub use operator::{MarkerColor, Operator, Palette, NEW_SITE_LABEL};
pub use table::{columns, open_for_view, Table};

/// Generic error type for the I/O heavy parts of the crate.
pub type CapSiteResult<T> = Result<T, Box<dyn std::error::Error>>;

/**************************************************************************************************
 * Private Implementation
 *************************************************************************************************/
mod assign;
mod centroid;
mod cluster;
mod distance;
mod error;
mod export;
mod geo;
mod html;
mod kml;
mod location;
mod map;
mod operator;
mod table;
