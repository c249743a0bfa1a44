use std::fs::File;
use std::path::Path;

use crate::error::{Error, Result};

/// Zero-based column holding the movie title.
pub const TITLE_COLUMN: usize = 1;
/// Zero-based column holding the rating.
pub const RATING_COLUMN: usize = 8;

/// A single dataset row. Only lives while the indexes are being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub rating: Option<String>,
}

/// Reads every row after the header of the CSV file at `path`.
///
/// The rating column is only read when `with_rating` is set. A row that is
/// shorter than the columns being read, or that the CSV reader rejects
/// (e.g. a field count differing from the header), fails the whole parse.
/// So does a file without a header row.
pub fn parse_csv(path: &Path, with_rating: bool) -> Result<Vec<Record>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    if reader.headers()?.is_empty() {
        return Err(Error::MissingHeader);
    }

    let mut records = Vec::with_capacity(1000);
    let mut row = csv::StringRecord::new();
    while reader.read_record(&mut row)? {
        let line = row.position().map_or(0, |p| p.line());
        let title = field(&row, TITLE_COLUMN, line)?.to_string();
        let rating = if with_rating {
            Some(field(&row, RATING_COLUMN, line)?.to_string())
        } else {
            None
        };
        records.push(Record { title, rating });
    }
    Ok(records)
}

fn field(row: &csv::StringRecord, column: usize, line: u64) -> Result<&str> {
    row.get(column).ok_or(Error::MissingColumn { row: line, column: column + 1 })
}
