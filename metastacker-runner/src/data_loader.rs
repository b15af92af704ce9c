//! CSV reading.
//!
//! Reads the input file into a `RawTable` without interpreting any cell.
//! Records must all have the header's width; a ragged file is a format error.

use std::io::Read;
use std::path::Path;

use metastacker_core::{DataError, RawTable};

/// Read a CSV file with a header row.
pub fn read_csv(path: &Path) -> Result<RawTable, DataError> {
    if !path.is_file() {
        return Err(DataError::NotFound {
            path: path.display().to_string(),
        });
    }
    let file = std::fs::File::open(path).map_err(|e| DataError::Unreadable(e.to_string()))?;
    parse_csv(file)
}

/// Parse CSV from any reader.
pub fn parse_csv<R: Read>(reader: R) -> Result<RawTable, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(map_csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(map_csv_error)?;
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers, records))
}

fn map_csv_error(err: csv::Error) -> DataError {
    if err.is_io_error() {
        DataError::Unreadable(err.to_string())
    } else {
        DataError::Malformed(err.to_string())
    }
}
