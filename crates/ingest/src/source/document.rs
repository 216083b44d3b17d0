use std::path::Path;

use serde_json::{Map, Value};
use telemerge_core::SourceKind;
use telemerge_core::error::Result;
use telemerge_core::model::record::{FIELD_COUNT, FIELD_NAMES, Record};
use telemerge_core::time::DisplayZone;

use crate::source::{DecodeResult, SourceAdapter};

const REQUEST_TIME: &str = "request-time";

/// JSON array of objects keyed by field name. `request-time` arrives as epoch milliseconds and
/// is rendered in the run's display zone.
#[derive(Debug, Clone, Copy)]
pub struct DocumentSource {
    zone: DisplayZone,
}

impl DocumentSource {
    pub fn new(zone: DisplayZone) -> Self {
        Self { zone }
    }

    fn decode_row(&self, index: usize, row: &Map<String, Value>) -> DecodeResult<Record> {
        let mut fields: [String; FIELD_COUNT] = Default::default();
        for (slot, name) in fields.iter_mut().zip(FIELD_NAMES) {
            let value = row
                .get(name)
                .ok_or_else(|| format!("record {index}: missing {name}"))?;
            let text = if name == REQUEST_TIME {
                self.epoch_to_display(value)
            } else {
                value_to_text(value)
            };
            *slot = text.map_err(|reason| format!("record {index}: {name} {reason}"))?;
        }
        Ok(Record::from_fields(fields))
    }

    fn epoch_to_display(&self, value: &Value) -> DecodeResult<String> {
        let millis = value
            .as_i64()
            .ok_or_else(|| format!("must be integer epoch milliseconds, got {value}"))?;
        self.zone
            .format_epoch_millis(millis)
            .ok_or_else(|| format!("epoch milliseconds {millis} out of range"))
    }
}

impl SourceAdapter for DocumentSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Document
    }

    fn decode(&self, raw: &[u8]) -> DecodeResult<Vec<Record>> {
        let rows: Vec<Map<String, Value>> =
            serde_json::from_slice(raw).map_err(|e| e.to_string())?;
        rows.iter()
            .enumerate()
            .map(|(index, row)| self.decode_row(index, row))
            .collect()
    }
}

fn value_to_text(value: &Value) -> DecodeResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err("is null".to_string()),
        Value::Array(_) | Value::Object(_) => Err(format!("must be a scalar, got {value}")),
    }
}

pub fn parse_document(path: &Path, zone: DisplayZone) -> Result<Vec<Record>> {
    DocumentSource::new(zone).parse(path)
}
