//! Tab separated catalogs the scene is populated from.
//!
//! This is the only fallible part of the crate. Malformed rows are skipped with a
//! warning, structural problems (unreadable file, missing header or column) are errors.

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use csv::StringRecord;

pub mod launch_site;
pub mod satellite;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("Catalog has no header row")]
    Empty,
    #[error("Catalog is missing the {0:?} column")]
    MissingColumn(String),
}

/// A reader over tab separated rows, fields trimmed.
///
/// Quotes are plain characters and rows may be shorter than the header.
pub fn tsv_reader<R: io::Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

/// The header row, an error when there is none
pub fn headers<R: io::Read>(reader: &mut csv::Reader<R>) -> Result<StringRecord, CatalogError> {
    let headers = reader.headers()?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(CatalogError::Empty);
    }
    Ok(headers)
}

/// Index of the column named `name`
pub fn column(headers: &StringRecord, name: &str) -> Result<usize, CatalogError> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| CatalogError::MissingColumn(name.to_owned()))
}

/// Field `column` of `row`, empty when the row is short
pub fn field(row: &StringRecord, column: usize) -> &str {
    row.get(column).unwrap_or("")
}

/// Loose numeric parsing: empty reads as zero, garbage as NaN
pub fn parse_number(value: &str) -> f64 {
    if value.is_empty() {
        0.0
    } else {
        value.parse().unwrap_or(f64::NAN)
    }
}

pub(crate) fn open_catalog(path: &Path) -> Result<csv::Reader<File>, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(tsv_reader(file))
}
