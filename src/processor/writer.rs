//! Aggregate table writing
//!
//! Converts the aggregate table into a polars DataFrame of nullable string
//! columns and writes it as CSV or Parquet. Values stay as the text read
//! from the anthro files.

use crate::aggregate::AggregateTable;
use crate::config::{CompressionAlgorithm, OutputFormat};
use crate::constants::{FIELD_DELIMITER, ID_COLUMN, LOCATION_COLUMN};
use crate::error::{Result, SplitterError};

use polars::prelude::{Column, CsvWriter, DataFrame, ParquetWriter, SerWriter};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes an aggregate table to disk
#[derive(Debug)]
pub struct TableWriter {
    output_path: PathBuf,
    format: OutputFormat,
    compression: CompressionAlgorithm,
}

impl TableWriter {
    /// Create a new table writer
    pub fn new(
        output_path: PathBuf,
        format: OutputFormat,
        compression: CompressionAlgorithm,
    ) -> Self {
        Self {
            output_path,
            format,
            compression,
        }
    }

    /// Write the table, creating the output directory when needed.
    ///
    /// The table is written to a sibling partial file and renamed into place,
    /// so a failed write never leaves a truncated table at the output path.
    pub fn write(&self, table: &AggregateTable) -> Result<()> {
        let mut df = to_dataframe(table)?;

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let partial_path = partial_path(&self.output_path);
        let written = File::create(&partial_path)
            .map_err(|e| SplitterError::from(e).in_file(&partial_path))
            .and_then(|file| match self.format {
                OutputFormat::Csv => self.write_csv(file, &mut df),
                OutputFormat::Parquet => self.write_parquet(file, &mut df),
            });

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&partial_path) {
                debug!("Could not remove {}: {}", partial_path.display(), cleanup);
            }
            return Err(e);
        }

        fs::rename(&partial_path, &self.output_path)
            .map_err(|e| SplitterError::from(e).in_file(&self.output_path))?;

        debug!(
            "Wrote {} rows x {} columns to {}",
            df.height(),
            df.width(),
            self.output_path.display()
        );
        Ok(())
    }

    fn write_csv(&self, mut file: File, df: &mut DataFrame) -> Result<()> {
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(FIELD_DELIMITER as u8)
            .finish(df)
            .map_err(|e| self.write_failed(e))
    }

    fn write_parquet(&self, file: File, df: &mut DataFrame) -> Result<()> {
        ParquetWriter::new(file)
            .with_compression(self.compression.to_polars_compression())
            .finish(df)
            .map(|_| ())
            .map_err(|e| self.write_failed(e))
    }

    fn write_failed(&self, e: polars::error::PolarsError) -> SplitterError {
        SplitterError::from(e).in_file(&self.output_path)
    }
}

/// Sibling path the table is written to before being renamed into place
fn partial_path(output_path: &Path) -> PathBuf {
    let mut name = output_path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    output_path.with_file_name(name)
}

/// Build a DataFrame with the identifier, location and measurement columns
pub fn to_dataframe(table: &AggregateTable) -> Result<DataFrame> {
    let rows = table.rows();
    let mut columns = Vec::with_capacity(table.measurement_names().len() + 2);

    let ids: Vec<String> = rows.iter().map(|row| row.subject.id.clone()).collect();
    let locations: Vec<String> = rows
        .iter()
        .map(|row| row.subject.location.clone())
        .collect();
    columns.push(Column::new(ID_COLUMN.into(), ids));
    columns.push(Column::new(LOCATION_COLUMN.into(), locations));

    for (index, name) in table.measurement_names().iter().enumerate() {
        let values: Vec<Option<String>> = rows.iter().map(|row| row.cells[index].clone()).collect();
        columns.push(Column::new(name.as_str().into(), values));
    }

    Ok(DataFrame::new(columns)?)
}
