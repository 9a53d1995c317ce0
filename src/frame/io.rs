//! CSV ingestion for raw training and scoring data.

use crate::error::PipelineError;
use crate::frame::{Frame, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a headered CSV file into a [`Frame`].
///
/// Cells are parsed with [`Value::parse`]: empty and `NA`-style markers
/// become missing, numbers become numeric, everything else categorical.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Frame, PipelineError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() {
        return Err(PipelineError::EmptyData("CSV has no header row".to_string()));
    }

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    let mut n_rows = 0usize;
    for result in rdr.records() {
        let record = result?;
        n_rows += 1;
        for (i, col) in columns.iter_mut().enumerate() {
            match record.get(i) {
                Some(cell) => col.push(Value::parse(cell)),
                // Short rows pad out as missing.
                None => col.push(Value::Missing),
            }
        }
    }
    debug_assert!(columns.iter().all(|c| c.len() == n_rows));

    Frame::from_columns(headers.into_iter().zip(columns))
}
