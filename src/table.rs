/*!
 * Loading CSV files into memory.
 *
 * A [Table] keeps the header and the raw text records of a CSV file. Typed views (see
 * [LocationPoint](crate::LocationPoint) and [DistanceTable](crate::DistanceTable)) are pulled
 * out of it later, after checking the columns each view needs.
 */
use crate::error::LoadError;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, error, warn};
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap as HashMap;
use std::{
    io::Read,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Column names used in the input files.
pub mod columns {
    pub const ESTADO: &str = "ESTADO";
    pub const MUNICIPIO: &str = "MUNICIPIO";
    pub const LATITUD: &str = "LATITUD";
    pub const LONGITUD: &str = "LONGITUD";
    pub const PEA: &str = "PEA";
    pub const LATITUD_1: &str = "LATITUD_1";
    pub const LONGITUD_1: &str = "LONGITUD_1";
    pub const DISTANCIA_KM: &str = "DISTANCIA_KM";
}

/// The header and text records of a CSV file.
#[derive(Debug, Clone)]
pub struct Table {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl Table {
    /// Read a whole CSV document from any reader.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, LoadError> {
        let mut rdr = ReaderBuilder::new().trim(Trim::Headers).from_reader(rdr);

        let headers = rdr.headers()?.clone();
        let rows = rdr.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Table { headers, rows })
    }

    /// Read a CSV file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LoadError::MissingFile(path.to_path_buf()));
        }

        let f = std::fs::File::open(path)?;
        let table = Self::from_reader(f)?;
        debug!("Loaded {} rows from {}", table.len(), path.display());

        Ok(table)
    }

    /**
     * Read a CSV file from disk, but only once per process.
     *
     * The table is keyed by the canonical path of the file. Later calls for the same file hand
     * back the same shared copy, even if the file has changed on disk since.
     */
    pub fn cached<P: AsRef<Path>>(path: P) -> Result<Arc<Self>, LoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(LoadError::MissingFile(path.to_path_buf()));
        }

        let key = path.canonicalize()?;
        let mut cache = table_cache()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(table) = cache.get(&key) {
            debug!("Using cached copy of {}", key.display());
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(Self::open(&key)?);
        cache.insert(key, Arc::clone(&table));

        Ok(table)
    }

    /// The number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Make sure all the named columns are present, listing the whole required set if not.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), LoadError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LoadError::MissingColumns {
                required: required.iter().map(|name| name.to_string()).collect(),
                missing,
            })
        }
    }

    /// Get the text of a cell, an absent cell reads as empty.
    pub fn text(&self, row: usize, column: usize) -> &str {
        self.rows[row].get(column).unwrap_or("")
    }

    /// Parse a cell as a floating point number.
    pub fn number(&self, row: usize, column: usize) -> Result<f64, LoadError> {
        let text = self.text(row, column).trim();

        text.parse().map_err(|_| LoadError::BadValue {
            row: row + 1,
            column: self.headers.get(column).unwrap_or("").to_owned(),
            value: text.to_owned(),
        })
    }

    /// Parse a cell that may be left blank, a blank cell is `None`.
    pub fn optional_number(&self, row: usize, column: usize) -> Result<Option<f64>, LoadError> {
        if self.text(row, column).trim().is_empty() {
            Ok(None)
        } else {
            self.number(row, column).map(Some)
        }
    }

    /// The distinct values of the ESTADO column in the order they first appear.
    pub fn states(&self) -> Vec<String> {
        let idx = match self.column_index(columns::ESTADO) {
            Some(idx) => idx,
            None => return vec![],
        };

        let mut states: Vec<String> = vec![];
        for row in &self.rows {
            let state = row.get(idx).unwrap_or("");
            if !states.iter().any(|s| s == state) {
                states.push(state.to_owned());
            }
        }

        states
    }
}

/**
 * Load a table for a view, reporting problems through the log.
 *
 * A missing file is a warning, anything else (unreadable file, missing columns) is an error. In
 * either case there is nothing for the view to show, so `None` comes back.
 */
pub fn open_for_view<P: AsRef<Path>>(path: P, required: &[&str]) -> Option<Arc<Table>> {
    let path = path.as_ref();

    let table = match Table::cached(path) {
        Ok(table) => table,
        Err(LoadError::MissingFile(missing)) => {
            warn!(
                "The file '{}' was not found, there is nothing to show.",
                missing.display()
            );
            return None;
        }
        Err(err) => {
            error!("Could not load '{}': {}", path.display(), err);
            return None;
        }
    };

    if let Err(err) = table.require_columns(required) {
        error!("{}", err);
        return None;
    }

    Some(table)
}

static TABLE_CACHE: OnceCell<Mutex<HashMap<PathBuf, Arc<Table>>>> = OnceCell::new();

fn table_cache() -> &'static Mutex<HashMap<PathBuf, Arc<Table>>> {
    TABLE_CACHE.get_or_init(|| Mutex::new(HashMap::default()))
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = "\
ESTADO,MUNICIPIO,LATITUD,LONGITUD,PEA
JALISCO,GUADALAJARA,20.6597,-103.3496,700000
SONORA,HERMOSILLO,29.0729,-110.9559,400000
JALISCO,ZAPOPAN,20.7214,-103.3918,650000
";

    #[test]
    fn test_states_in_first_occurrence_order() {
        let table = Table::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.states(), vec!["JALISCO", "SONORA"]);
    }

    #[test]
    fn test_require_columns_lists_required_set() {
        let table = Table::from_reader(SAMPLE.as_bytes()).unwrap();

        assert!(table.require_columns(&["ESTADO", "PEA"]).is_ok());

        match table.require_columns(&["ESTADO", "LATITUD_1", "LONGITUD_1"]) {
            Err(LoadError::MissingColumns { required, missing }) => {
                assert_eq!(required, vec!["ESTADO", "LATITUD_1", "LONGITUD_1"]);
                assert_eq!(missing, vec!["LATITUD_1", "LONGITUD_1"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_bad_number_names_the_cell() {
        let table =
            Table::from_reader("LATITUD,LONGITUD\n20.5,-103.1\nnorte, -99.0\n".as_bytes()).unwrap();

        assert_eq!(table.number(0, 0).unwrap(), 20.5);
        assert_eq!(table.number(1, 1).unwrap(), -99.0);

        match table.number(1, 0) {
            Err(LoadError::BadValue { row, column, value }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "LATITUD");
                assert_eq!(value, "norte");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_blank_optional_number() {
        let table = Table::from_reader("PEA\n12\n\"  \"\nmucho\n".as_bytes()).unwrap();

        assert_eq!(table.optional_number(0, 0).unwrap(), Some(12.0));
        assert_eq!(table.optional_number(1, 0).unwrap(), None);
        assert!(matches!(
            table.optional_number(2, 0),
            Err(LoadError::BadValue { row: 3, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("this/file/does/not/exist.csv");

        assert!(matches!(Table::open(path), Err(LoadError::MissingFile(_))));
        assert!(matches!(Table::cached(path), Err(LoadError::MissingFile(_))));
    }
}
