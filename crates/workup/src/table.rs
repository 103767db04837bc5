//! Projection of a single named column out of a delimited table, and the
//! header-less writer used to export it.

use std::io::{Read, Write};
use std::path::Path;

use crate::Error;

pub const PEPTIDE_COLUMN: &str = "Peptide";

/// Pick the field delimiter from a file extension: tab for `.tsv`/`.tab`,
/// comma otherwise
pub fn infer_delimiter<P: AsRef<Path>>(path: P) -> u8 {
    match path
        .as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv") | Some("tab") => b'\t',
        _ => b',',
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub values: Vec<String>,
}

impl Column {
    /// Read a table with a header row from `rdr` and keep only the values of
    /// the column called `name`, in row order
    pub fn from_reader<R: Read>(rdr: R, delimiter: u8, name: &str) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(rdr);

        let headers = rdr.headers()?.clone();
        let index = headers
            .iter()
            .position(|field| field.trim() == name)
            .ok_or_else(|| Error::MissingColumn {
                column: name.into(),
                available: headers.iter().map(|field| field.trim().to_string()).collect(),
            })?;

        let mut values = Vec::new();
        for record in rdr.records() {
            let record = record?;
            // Ragged rows are rejected by the reader, so `index` is always in bounds
            values.push(record.get(index).unwrap_or_default().to_string());
        }

        if values.is_empty() {
            log::warn!("column `{}` has no rows", name);
        }
        let spaced = values
            .iter()
            .filter(|v| v.chars().any(char::is_whitespace))
            .count();
        if spaced > 0 {
            log::warn!("{} values in column `{}` contain whitespace", spaced, name);
        }

        Ok(Column {
            name: name.into(),
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Write one value per line. No header label and no row index are
    /// emitted; values containing the delimiter or quotes are quoted.
    pub fn write<W: Write>(&self, wtr: W, delimiter: u8) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_writer(wtr);

        // A missing value comes out as `""`, the same as a dataframe export
        for value in &self.values {
            wtr.write_record([value.as_bytes()])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P, delimiter: u8) -> Result<(), Error> {
        let path = path.as_ref();
        let mut file = crate::create(path)?;
        self.write(&mut file, delimiter)?;
        file.flush().map_err(Error::io(path))
    }
}

/// Load the column `name` from the table at `path`
pub fn read_column<P: AsRef<Path>>(path: P, delimiter: u8, name: &str) -> Result<Column, Error> {
    let rdr = crate::open(path)?;
    Column::from_reader(rdr, delimiter, name)
}
