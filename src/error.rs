use std::{
    error::Error,
    fmt::{Display, Formatter},
    path::PathBuf,
};

#[derive(Debug, Clone, Copy)]
pub struct CapSiteError {
    pub msg: &'static str,
}

impl Display for CapSiteError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.msg)
    }
}

impl Error for CapSiteError {}

/// Signal used when there is nothing to average over.
pub const NO_DATA: CapSiteError = CapSiteError {
    msg: "no data: the selection has no positive total weight",
};

/**
 * Everything that can go wrong while turning a CSV file into usable rows.
 *
 * All of these end the view that requested the data, none of them are retried.
 */
#[derive(Debug)]
pub enum LoadError {
    /// The input file does not exist.
    MissingFile(PathBuf),
    /// One or more required columns are absent from the header.
    MissingColumns {
        required: Vec<String>,
        missing: Vec<String>,
    },
    /// A numeric cell could not be parsed. `row` is the 1-based data row.
    BadValue {
        row: usize,
        column: String,
        value: String,
    },
    /// The CSV reader itself failed.
    Csv(csv::Error),
    /// Any other I/O problem while opening the file.
    Io(std::io::Error),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        use LoadError::*;

        match self {
            MissingFile(path) => write!(f, "the file '{}' was not found", path.display()),
            MissingColumns { required, missing } => write!(
                f,
                "the CSV file must contain the columns {:?} (missing {:?})",
                required, missing
            ),
            BadValue { row, column, value } => write!(
                f,
                "row {} column {}: '{}' is not a number",
                row, column, value
            ),
            Csv(err) => write!(f, "error reading CSV: {}", err),
            Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Csv(err) => Some(err),
            LoadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Csv(err)
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}
