use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::domain::row::RowRecord;
use crate::error::{AppError, AppResult};

/// Reads a CSV file into row records after checking that every required
/// column is present in the header.
pub fn load_rows(path: &Path, required_columns: &[&str]) -> AppResult<Vec<RowRecord>> {
    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => {
            AppError::Input(format!("CSV file not found at {}", path.display()))
        }
        _ => AppError::Io(err),
    })?;

    let rows = read_rows(file, required_columns)?;
    debug!(path = %path.display(), rows = rows.len(), "loaded input rows");
    Ok(rows)
}

pub fn read_rows<R: Read>(reader: R, required_columns: &[&str]) -> AppResult<Vec<RowRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    if headers.iter().all(|header| header.is_empty()) {
        return Err(AppError::Input("CSV file is empty.".to_string()));
    }

    let missing: Vec<&str> = required_columns
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == column))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Input(format!(
            "CSV file is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record).map_err(malformed)? {
        if record.len() > headers.len() {
            return Err(AppError::Input(format!(
                "CSV file is corrupt or improperly formatted: row {} has {} fields, but the header has {}",
                rows.len() + 1,
                record.len(),
                headers.len()
            )));
        }
        // Short rows leave their trailing cells blank.
        let cells: HashMap<String, String> = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !header.is_empty())
            .map(|(index, header)| {
                let value = record.get(index).unwrap_or_default();
                (header.clone(), value.to_string())
            })
            .collect();
        rows.push(RowRecord::new(rows.len() + 1, cells));
    }

    Ok(rows)
}

fn malformed(err: csv::Error) -> AppError {
    AppError::Input(format!(
        "CSV file is corrupt or improperly formatted: {err}"
    ))
}
