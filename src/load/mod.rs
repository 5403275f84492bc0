//! Read a calorie counter export into rows
//!
//! Every line is data, there is no header line in the export. Columns get the
//! positional keys `header0`, `header1`, ... unless names are supplied.

pub mod config;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::lib::{
    entry::Row,
    error::{Error, Result},
};

pub fn read_rows<R: Read>(reader: R, headers: Option<&str>) -> Result<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);
    let names = headers.map(|h| h.split(',').map(String::from).collect::<Vec<_>>());
    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        let row = match &names {
            None => Row::positional(record.iter()),
            Some(names) => {
                if names.len() < record.len() {
                    return Err(Error::HeaderCount {
                        line: idx + 1,
                        columns: record.len(),
                        headers: names.len(),
                    });
                }
                Row::new(
                    names
                        .iter()
                        .cloned()
                        .zip(record.iter().map(String::from))
                        .collect(),
                )
            }
        };
        rows.push(row);
    }
    debug!("parsed {} rows", rows.len());
    Ok(rows)
}

pub fn read_file(path: &Path, headers: Option<&str>) -> Result<Vec<Row>> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_rows(file, headers)?;
    info!("read {} rows from '{}'", rows.len(), path.display());
    Ok(rows)
}
