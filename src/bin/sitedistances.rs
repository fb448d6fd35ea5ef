use capsite::{
    open_for_view, write_distances_csv, CapSiteResult, DistanceTable, DISTANCE_COLUMNS,
};
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
 *                               Parse Command Line Arguments
 *-----------------------------------------------------------------------------------------------*/
///
/// Distances from the municipalities of a state to its proposed location.
///
/// Each row of the input has the municipality (LATITUD, LONGITUD) and the location proposed for
/// its state (LATITUD_1, LONGITUD_1). The distance between them is computed on the ellipsoid and
/// printed with a TOTAL row that sums PEA and distance.
///
#[derive(Debug, Parser)]
#[clap(bin_name = "sitedistances")]
#[clap(author, version, about)]
struct SiteDistancesOptions {
    /// The path to the distances CSV file.
    #[clap(short, long)]
    #[clap(env = "CAP_DIST_CSV", default_value = "distancias.csv")]
    data_file: PathBuf,

    /// The state to show.
    ///
    /// If this is not specified, the program lists the states in the data file and stops.
    #[clap(short, long)]
    state: Option<String>,

    /// Only show these municipalities, may be given more than once. By default all of the
    /// municipalities in the state are shown.
    #[clap(short, long = "municipio")]
    municipios: Vec<String>,

    /// Save the table, TOTAL row included, as a CSV file at this path.
    #[clap(long)]
    csv_file: Option<PathBuf>,

    /// Verbose output
    #[clap(short, long)]
    verbose: bool,
}

/*-------------------------------------------------------------------------------------------------
 *                                             MAIN
 *-----------------------------------------------------------------------------------------------*/
fn main() -> CapSiteResult<()> {
    let opts = SiteDistancesOptions::parse();

    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init()?;

    let table = match open_for_view(&opts.data_file, &DISTANCE_COLUMNS) {
        Some(table) => table,
        None => return Ok(()),
    };

    let distances = match DistanceTable::from_table(&table) {
        Ok(distances) => distances,
        Err(err) => {
            error!("{}", err);
            return Ok(());
        }
    };

    let state = match &opts.state {
        Some(state) => state,
        None => {
            info!("No state selected, the states in {} are:", opts.data_file.display());
            for state in distances.states() {
                println!("{}", state);
            }
            return Ok(());
        }
    };

    let known = distances.municipalities(state);
    if known.is_empty() {
        warn!("No data available for the state of {}.", state);
        return Ok(());
    }

    for municipio in &opts.municipios {
        if !known.contains(municipio) {
            warn!("{} is not a municipality of {}, ignoring it.", municipio, state);
        }
    }

    let selection = distances.select(state, &opts.municipios);
    println!("{}", selection);

    if let Some(csv_file) = &opts.csv_file {
        write_distances_csv(csv_file, &selection)?;
        info!("Table saved to {}", csv_file.display());
    }

    Ok(())
}
