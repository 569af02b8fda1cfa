use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::output::{MATRIX_LABEL, MatrixWriter, OutputError, TIMESTAMP_FORMAT};
use crate::similarity::SimilarityMatrix;

/// Write `{"<label>": collection, "timestamp": "..."}` as pretty JSON.
pub fn write_envelope<T: Serialize + ?Sized>(
    path: &Path,
    label: &str,
    collection: &T,
    now: DateTime<Utc>,
) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_envelope_to(&mut writer, label, collection, now)?;
    writer.flush()?;
    Ok(())
}

fn write_envelope_to<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    label: &str,
    collection: &T,
    now: DateTime<Utc>,
) -> Result<(), OutputError> {
    let mut envelope = Map::new();
    envelope.insert(label.to_string(), serde_json::to_value(collection)?);
    envelope.insert(
        "timestamp".to_string(),
        Value::String(now.format(TIMESTAMP_FORMAT).to_string()),
    );
    serde_json::to_writer_pretty(&mut *out, &Value::Object(envelope))?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Read the collection stored under `label` in an envelope file.
pub fn read_envelope<T: DeserializeOwned>(path: &Path, label: &str) -> Result<T, OutputError> {
    let file = File::open(path)?;
    let mut envelope: Map<String, Value> = serde_json::from_reader(BufReader::new(file))?;
    let collection = envelope
        .remove(label)
        .ok_or_else(|| OutputError::MissingLabel(label.to_string()))?;
    Ok(serde_json::from_value(collection)?)
}

/// Similarity matrix in an envelope stamped with the current time.
pub struct JsonMatrixWriter;

impl MatrixWriter for JsonMatrixWriter {
    fn write_matrix(&self, matrix: &SimilarityMatrix, out: &mut dyn Write) -> Result<(), OutputError> {
        write_envelope_to(out, MATRIX_LABEL, matrix, Utc::now())
    }
}
