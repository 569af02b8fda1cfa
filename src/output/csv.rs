use std::io::Write;

use crate::output::{MatrixWriter, OutputError};
use crate::similarity::SimilarityMatrix;

/// One CSV line per row of the matrix, no header.
pub struct CsvMatrixWriter;

impl MatrixWriter for CsvMatrixWriter {
    fn write_matrix(&self, matrix: &SimilarityMatrix, out: &mut dyn Write) -> Result<(), OutputError> {
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(out);
        for row in matrix {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}
