use capsite::{
    assign_nearest, columns, filter_region, open_for_view, proposed_sites, write_html, write_kml,
    write_sites_csv, CapSiteResult, DistanceMetric, KMeans, LocationPoint, MarkerMap, Palette,
    DEFAULT_MAX_ITERATIONS, DEFAULT_SITE_COUNT,
};
use clap::Parser;
use log::{debug, error, info, warn, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fmt::{self, Display},
    path::PathBuf,
};

/*-------------------------------------------------------------------------------------------------
 *                               Parse Command Line Arguments
 *-----------------------------------------------------------------------------------------------*/
///
/// Propose new CAP locations.
///
/// The municipalities are grouped with k-means, each cluster center becomes a proposed site, and
/// each site is tied to the state and municipality closest to it. The sites are saved as CSV and
/// drawn on an HTML map together with the existing municipalities.
///
#[derive(Debug, Parser)]
#[clap(bin_name = "proposesites")]
#[clap(author, version, about)]
struct ProposeSitesOptionsInit {
    /// The path to the municipalities CSV file.
    ///
    /// It must have the columns ESTADO, MUNICIPIO, LATITUD and LONGITUD.
    #[clap(short, long)]
    #[clap(env = "CAP_MODEL_CSV", default_value = "PENSIONISSSTE_Y_MODELO.csv")]
    data_file: PathBuf,

    /// Only use the municipalities of this state. By default all of them are used.
    #[clap(short, long)]
    state: Option<String>,

    /// The number of sites to propose.
    #[clap(short = 'k', long, default_value_t = DEFAULT_SITE_COUNT)]
    sites: usize,

    /// The maximum number of k-means iterations.
    #[clap(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iters: usize,

    /// How to measure the distance from a site to a municipality, "planar" or "geodesic".
    #[clap(short, long, default_value = "planar")]
    metric: DistanceMetric,

    /// The path to the HTML map to produce from this run.
    ///
    /// If this is not specified, then the program will create "mapa_<k>_cap.html".
    #[clap(long)]
    html_file: Option<PathBuf>,

    /// The path to the CSV file of proposed sites.
    #[clap(long, default_value = "ubicaciones_sugeridas.csv")]
    csv_file: PathBuf,

    /// Also save the map as a KML file at this path.
    #[clap(long)]
    kml_file: Option<PathBuf>,

    /// Verbose output
    #[clap(short, long)]
    verbose: bool,
}

#[derive(Debug)]
struct ProposeSitesOptionsChecked {
    data_file: PathBuf,
    state: Option<String>,
    kmeans: KMeans,
    metric: DistanceMetric,
    html_file: PathBuf,
    csv_file: PathBuf,
    kml_file: Option<PathBuf>,
    verbose: bool,
}

impl Display for ProposeSitesOptionsChecked {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "\n")?; // yes, two blank lines.
        writeln!(f, "       Data: {}", self.data_file.display())?;
        writeln!(f, "      State: {}", self.state.as_deref().unwrap_or("(all)"))?;
        writeln!(f, "      Sites: {}", self.kmeans.k)?;
        writeln!(f, " Iterations: {}", self.kmeans.max_iters)?;
        writeln!(f, "     Metric: {}", self.metric)?;
        writeln!(f, "Output HTML: {}", self.html_file.display())?;
        writeln!(f, " Output CSV: {}", self.csv_file.display())?;
        if let Some(kml_file) = &self.kml_file {
            writeln!(f, " Output KML: {}", kml_file.display())?;
        }
        writeln!(f, "\n")?; // yes, two blank lines.

        Ok(())
    }
}

/// Get the command line arguments and check them.
fn parse_args() -> CapSiteResult<ProposeSitesOptionsChecked> {
    let ProposeSitesOptionsInit {
        data_file,
        state,
        sites,
        max_iters,
        metric,
        html_file,
        csv_file,
        kml_file,
        verbose,
    } = ProposeSitesOptionsInit::parse();

    if sites == 0 {
        return Err("The number of sites must be at least 1".into());
    }

    let html_file = match html_file {
        Some(v) => v,
        None => PathBuf::from(format!("mapa_{}_cap.html", sites)),
    };

    Ok(ProposeSitesOptionsChecked {
        data_file,
        state,
        kmeans: KMeans {
            k: sites,
            max_iters,
        },
        metric,
        html_file,
        csv_file,
        kml_file,
        verbose,
    })
}

/*-------------------------------------------------------------------------------------------------
 *                                             MAIN
 *-----------------------------------------------------------------------------------------------*/
fn main() -> CapSiteResult<()> {
    let opts = parse_args()?;

    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init()?;

    if opts.verbose {
        info!("{}", opts);
    }

    const REQUIRED: [&str; 4] = [
        columns::ESTADO,
        columns::MUNICIPIO,
        columns::LATITUD,
        columns::LONGITUD,
    ];

    let table = match open_for_view(&opts.data_file, &REQUIRED) {
        Some(table) => table,
        None => return Ok(()),
    };

    let mut points = match LocationPoint::from_table(&table) {
        Ok(points) => points,
        Err(err) => {
            error!("{}", err);
            return Ok(());
        }
    };

    if let Some(state) = &opts.state {
        points = filter_region(&points, state);
    }

    let mut map = match MarkerMap::centered_on("Ubicaciones sugeridas", &points) {
        Some(map) => map,
        None => {
            warn!("The table is empty, the map cannot be created.");
            return Ok(());
        }
    };

    let clusters = opts.kmeans.fit(&points);
    for (i, clust) in clusters.iter().enumerate() {
        debug!(
            "cluster {} - {} municipalities, PEA {:.0}, radius {:.1} km",
            i + 1,
            clust.count,
            clust.weight,
            clust.radius
        );
    }

    let sites = assign_nearest(proposed_sites(&clusters), &points, opts.metric);

    println!("{} suggested locations for new CAP:", sites.len());
    for site in &sites {
        println!("{}", site);
    }
    println!();

    map.add_locations(&points, Palette::Operators, false);
    map.add_sites(&sites);

    write_html(&opts.html_file, &map)?;
    info!("Map saved to {}", opts.html_file.display());

    write_sites_csv(&opts.csv_file, &sites)?;
    info!("Suggested locations saved to {}", opts.csv_file.display());

    if let Some(kml_file) = &opts.kml_file {
        write_kml(kml_file, &map)?;
        info!("KML saved to {}", kml_file.display());
    }

    Ok(())
}
