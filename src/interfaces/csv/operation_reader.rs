use crate::domain::operation::Operation;
use crate::error::{AtmError, Result};
use std::io::Read;

/// Streams scripted ATM operations out of CSV.
///
/// Cells are trimmed. A row may stop after its last required column; the
/// missing or empty cells deserialize as `None`.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    /// The first row of `source` must be the header.
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// One item per data row, read on demand. A malformed row yields an error
    /// and the rows after it are still read.
    pub fn operations(self) -> impl Iterator<Item = Result<Operation>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(AtmError::from))
    }
}
