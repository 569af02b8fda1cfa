//! # Output Module
//!
//! Persistence of run results: timestamped JSON envelopes for history
//! collections and writers for similarity matrices.

pub mod csv;
pub mod json;

use std::io::Write;

use thiserror::Error;

use crate::cli::MatrixFormat;
use crate::similarity::SimilarityMatrix;

/// Timestamp format used in every envelope, UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Envelope label of normalized history files.
pub const HISTORY_LABEL: &str = "browser_history";
pub const PAPERS_LABEL: &str = "papers";
pub const MATRIX_LABEL: &str = "matrix";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("missing `{0}` in envelope")]
    MissingLabel(String),
}

pub trait MatrixWriter {
    fn write_matrix(&self, matrix: &SimilarityMatrix, out: &mut dyn Write) -> Result<(), OutputError>;
}

pub fn build_matrix_writer(format: MatrixFormat) -> Box<dyn MatrixWriter> {
    match format {
        MatrixFormat::Json => Box::new(json::JsonMatrixWriter),
        MatrixFormat::Csv => Box::new(csv::CsvMatrixWriter),
    }
}
