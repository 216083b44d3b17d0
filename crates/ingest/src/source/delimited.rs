use std::path::Path;

use csv::ReaderBuilder;
use telemerge_core::SourceKind;
use telemerge_core::error::Result;
use telemerge_core::model::record::{FIELD_COUNT, Record};

use crate::source::{DecodeResult, SourceAdapter};

/// Comma-separated rows after one discarded header line. Quotes are ordinary characters, so a
/// comma inside a value always splits it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedSource;

impl SourceAdapter for DelimitedSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Delimited
    }

    fn decode(&self, raw: &[u8]) -> DecodeResult<Vec<Record>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .quoting(false)
            .flexible(true)
            .from_reader(raw);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| e.to_string())?;
            if row.len() != FIELD_COUNT {
                let line = row.position().map(|p| p.line()).unwrap_or_default();
                return Err(format!(
                    "line {line}: expected {FIELD_COUNT} fields, found {}",
                    row.len()
                ));
            }
            let fields: [String; FIELD_COUNT] = std::array::from_fn(|i| row[i].to_string());
            records.push(Record::from_fields(fields));
        }
        Ok(records)
    }
}

pub fn parse_delimited(path: &Path) -> Result<Vec<Record>> {
    DelimitedSource.parse(path)
}
