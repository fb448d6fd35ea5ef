use capsite::{
    columns, open_for_view, write_html, write_kml, CapSiteResult, LocationPoint, MarkerMap,
    Palette,
};
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
 *                               Parse Command Line Arguments
 *-----------------------------------------------------------------------------------------------*/
///
/// Draw existing and new CAP locations on an interactive map.
///
/// Rows whose MUNICIPIO is "PENSIONISSSTE" are red, "Nuevo CAP" blue, and everything else gray.
///
#[derive(Debug, Parser)]
#[clap(bin_name = "showsites")]
#[clap(author, version, about)]
struct ShowSitesOptions {
    /// The path to the CSV file with MUNICIPIO, LATITUD and LONGITUD columns.
    #[clap(short, long)]
    #[clap(env = "CAP_MODEL_CSV", default_value = "PENSIONISSSTE_Y_MODELO.csv")]
    data_file: PathBuf,

    /// The path to the HTML map to produce from this run.
    #[clap(long, default_value = "mapa_interactivo.html")]
    html_file: PathBuf,

    /// Also save the map as a KML file at this path.
    #[clap(long)]
    kml_file: Option<PathBuf>,

    /// Verbose output
    #[clap(short, long)]
    verbose: bool,
}

/*-------------------------------------------------------------------------------------------------
 *                                             MAIN
 *-----------------------------------------------------------------------------------------------*/
fn main() -> CapSiteResult<()> {
    let opts = ShowSitesOptions::parse();

    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init()?;

    const REQUIRED: [&str; 3] = [columns::MUNICIPIO, columns::LATITUD, columns::LONGITUD];

    let table = match open_for_view(&opts.data_file, &REQUIRED) {
        Some(table) => table,
        None => {
            warn!("The data could not be loaded, check the CSV file.");
            return Ok(());
        }
    };

    info!("Loaded {} rows from {}", table.len(), opts.data_file.display());

    let points = match LocationPoint::from_table(&table) {
        Ok(points) => points,
        Err(err) => {
            error!("{}", err);
            return Ok(());
        }
    };

    let mut map = match MarkerMap::centered_on("Mapa interactivo", &points) {
        Some(map) => map,
        None => {
            warn!("The table is empty, the map cannot be created.");
            return Ok(());
        }
    };

    map.add_locations(&points, Palette::Sites, false);

    write_html(&opts.html_file, &map)?;
    info!("Map saved to {}", opts.html_file.display());

    if let Some(kml_file) = &opts.kml_file {
        write_kml(kml_file, &map)?;
        info!("KML saved to {}", kml_file.display());
    }

    Ok(())
}
