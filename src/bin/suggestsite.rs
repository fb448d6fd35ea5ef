use capsite::{
    columns, filter_region, open_for_view, write_html, write_justification_csv, write_kml,
    CapSiteResult, Justification, KMeans, LocationPoint, Marker, MarkerColor, MarkerMap, Palette,
};
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fmt::{self, Display},
    path::PathBuf,
};

/*-------------------------------------------------------------------------------------------------
 *                               Parse Command Line Arguments
 *-----------------------------------------------------------------------------------------------*/
///
/// Suggest a single CAP location for a state.
///
/// The municipalities of the state are grouped into one k-means cluster and its center is the
/// suggested location. A breakdown of the labor-force (PEA) weighted center of the same
/// municipalities is printed to justify it, and a map of everything is saved as HTML.
///
#[derive(Debug, Parser)]
#[clap(bin_name = "suggestsite")]
#[clap(author, version, about)]
struct SuggestSiteOptionsInit {
    /// The path to the municipalities CSV file.
    ///
    /// It must have the columns ESTADO, MUNICIPIO, LATITUD, LONGITUD and PEA.
    #[clap(short, long)]
    #[clap(env = "CAP_BASE_CSV", default_value = "BASE_UTILIZADA_2025.csv")]
    data_file: PathBuf,

    /// The state to analyze.
    ///
    /// If this is not specified, the program lists the states in the data file and stops.
    #[clap(short, long)]
    state: Option<String>,

    /// The path to the HTML map to produce from this run.
    ///
    /// If this is not specified, then the program will create "mapa_<state>_kmeans.html".
    #[clap(long)]
    html_file: Option<PathBuf>,

    /// Also save the map as a KML file at this path.
    #[clap(long)]
    kml_file: Option<PathBuf>,

    /// Save the weighted center breakdown as a CSV file at this path.
    #[clap(long)]
    justification_file: Option<PathBuf>,

    /// Verbose output
    #[clap(short, long)]
    verbose: bool,
}

#[derive(Debug)]
struct SuggestSiteOptionsChecked {
    /// The path to the municipalities file.
    data_file: PathBuf,

    /// The selected state.
    state: String,

    /// The path to the HTML map.
    html_file: PathBuf,

    /// The path to an optional KML map.
    kml_file: Option<PathBuf>,

    /// The path to an optional justification CSV.
    justification_file: Option<PathBuf>,
}

impl Display for SuggestSiteOptionsChecked {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "\n")?; // yes, two blank lines.
        writeln!(f, "         Data: {}", self.data_file.display())?;
        writeln!(f, "        State: {}", self.state)?;
        writeln!(f, "  Output HTML: {}", self.html_file.display())?;
        if let Some(kml_file) = &self.kml_file {
            writeln!(f, "   Output KML: {}", kml_file.display())?;
        }
        if let Some(justification_file) = &self.justification_file {
            writeln!(f, "Justification: {}", justification_file.display())?;
        }
        writeln!(f, "\n")?; // yes, two blank lines.

        Ok(())
    }
}

/// Get the command line arguments and check them.
///
/// Returns the verbosity flag, and the checked options if a state was given.
fn parse_args() -> (bool, PathBuf, Option<SuggestSiteOptionsChecked>) {
    let SuggestSiteOptionsInit {
        data_file,
        state,
        html_file,
        kml_file,
        justification_file,
        verbose,
    } = SuggestSiteOptionsInit::parse();

    let state = match state {
        Some(state) => state,
        None => return (verbose, data_file, None),
    };

    let html_file = match html_file {
        Some(v) => v,
        None => PathBuf::from(format!("mapa_{}_kmeans.html", state)),
    };

    let checked = SuggestSiteOptionsChecked {
        data_file: data_file.clone(),
        state,
        html_file,
        kml_file,
        justification_file,
    };

    (verbose, data_file, Some(checked))
}

/*-------------------------------------------------------------------------------------------------
 *                                             MAIN
 *-----------------------------------------------------------------------------------------------*/
fn main() -> CapSiteResult<()> {
    let (verbose, data_file, opts) = parse_args();

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init()?;

    const REQUIRED: [&str; 5] = [
        columns::ESTADO,
        columns::MUNICIPIO,
        columns::LATITUD,
        columns::LONGITUD,
        columns::PEA,
    ];

    let table = match open_for_view(&data_file, &REQUIRED) {
        Some(table) => table,
        None => return Ok(()),
    };

    let opts = match opts {
        Some(opts) => opts,
        None => {
            info!("No state selected, the states in {} are:", data_file.display());
            for state in table.states() {
                println!("{}", state);
            }
            return Ok(());
        }
    };

    if verbose {
        info!("{}", opts);
    }

    let points = match LocationPoint::from_table(&table) {
        Ok(points) => points,
        Err(err) => {
            error!("{}", err);
            return Ok(());
        }
    };

    let selected = filter_region(&points, &opts.state);
    if selected.is_empty() {
        warn!("No data available for the state of {}.", opts.state);
        return Ok(());
    }

    println!("Data for the state of {}:", opts.state);
    for pnt in &selected {
        println!(
            "{:<30} {:>11.6} {:>12.6} {:>12.0}",
            pnt.label, pnt.coord.lat, pnt.coord.lon, pnt.weight
        );
    }
    println!();

    // A single k-means center is the plain mean of the coordinates.
    let clusters = KMeans::new(1).fit(&selected);
    let suggested = match clusters.first() {
        Some(cluster) => cluster.center,
        None => {
            warn!("No data available for the state of {}.", opts.state);
            return Ok(());
        }
    };

    println!("Suggested location (k-means):");
    println!("    ESTADO: {}", opts.state);
    println!("   LATITUD: {}", suggested.lat);
    println!("  LONGITUD: {}", suggested.lon);
    println!();

    let mut map = MarkerMap::new(
        format!("Municipios de {} y ubicación sugerida", opts.state),
        suggested,
    );
    map.add_locations(&selected, Palette::Operators, true);
    map.push(Marker {
        coord: suggested,
        color: MarkerColor::Blue,
        title: "Ubicación sugerida".to_owned(),
        popup: vec!["Ubicación sugerida por K-Means".to_owned()],
    });

    write_html(&opts.html_file, &map)?;
    info!("Map saved to {}", opts.html_file.display());

    if let Some(kml_file) = &opts.kml_file {
        write_kml(kml_file, &map)?;
        info!("KML saved to {}", kml_file.display());
    }

    match Justification::from_points(&selected) {
        Ok(just) => {
            println!("Justification of the suggested location:");
            println!("{}", just);

            if let Some(justification_file) = &opts.justification_file {
                write_justification_csv(justification_file, &just)?;
                info!("Justification saved to {}", justification_file.display());
            }
        }
        Err(err) => warn!("Cannot justify the location for {}: {}", opts.state, err),
    }

    Ok(())
}
