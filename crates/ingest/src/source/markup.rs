use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use telemerge_core::SourceKind;
use telemerge_core::error::Result;
use telemerge_core::model::record::{FIELD_COUNT, FIELD_NAMES, Record};

use crate::source::{DecodeResult, SourceAdapter};

// Element depths: root, record, field.
const RECORD_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

/// XML document whose root holds one element per record; each record element carries one
/// child element per field, named by the field. `request-time` is already in display form.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupSource;

type Slots = [Option<String>; FIELD_COUNT];

impl SourceAdapter for MarkupSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Markup
    }

    fn decode(&self, raw: &[u8]) -> DecodeResult<Vec<Record>> {
        let text = std::str::from_utf8(raw).map_err(|e| format!("invalid utf-8: {e}"))?;
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(false);

        let mut records = Vec::new();
        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut saw_root = false;
        let mut slots: Option<Slots> = None;
        let mut field: Option<usize> = None;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| format!("at byte {}: {e}", reader.buffer_position()))?;
            match event {
                Event::Start(ref e) => {
                    depth += 1;
                    match depth {
                        1 => saw_root = true,
                        RECORD_DEPTH => slots = Some(Default::default()),
                        FIELD_DEPTH => field = open_field(&mut slots, e.name().as_ref()),
                        _ => {
                            if let Some(index) = field {
                                return Err(nested_element(records.len(), index));
                            }
                        }
                    }
                }
                Event::Empty(ref e) => match depth + 1 {
                    1 => saw_root = true,
                    RECORD_DEPTH => {
                        records.push(finish_record(records.len(), Default::default())?);
                    }
                    FIELD_DEPTH => {
                        open_field(&mut slots, e.name().as_ref());
                    }
                    _ => {
                        if let Some(index) = field {
                            return Err(nested_element(records.len(), index));
                        }
                    }
                },
                Event::Text(ref e) => {
                    if let Some(value) = field_value(&mut slots, field) {
                        let text = e.decode().map_err(|e| e.to_string())?;
                        value.push_str(&text);
                    }
                }
                Event::CData(ref e) => {
                    if let Some(value) = field_value(&mut slots, field) {
                        let text = std::str::from_utf8(e).map_err(|e| e.to_string())?;
                        value.push_str(text);
                    }
                }
                Event::GeneralRef(ref e) => {
                    if let Some(value) = field_value(&mut slots, field) {
                        value.push_str(&resolve_reference(e)?);
                    }
                }
                Event::End(_) => {
                    match depth {
                        RECORD_DEPTH => {
                            let finished = slots.take().unwrap_or_default();
                            records.push(finish_record(records.len(), finished)?);
                        }
                        FIELD_DEPTH => field = None,
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => {
                    if depth != 0 {
                        return Err(format!(
                            "unexpected end of document inside {depth} open element(s)"
                        ));
                    }
                    break;
                }
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err("no root element".to_string());
        }
        Ok(records)
    }
}

/// Starts collecting a field. Unknown field names are skipped. A repeated field restarts.
fn open_field(slots: &mut Option<Slots>, name: &[u8]) -> Option<usize> {
    let index = FIELD_NAMES.iter().position(|n| n.as_bytes() == name)?;
    if let Some(slots) = slots.as_mut() {
        slots[index] = Some(String::new());
    }
    Some(index)
}

fn field_value(slots: &mut Option<Slots>, field: Option<usize>) -> Option<&mut String> {
    let index = field?;
    slots.as_mut()?[index].as_mut()
}

fn finish_record(index: usize, slots: Slots) -> DecodeResult<Record> {
    let missing: Vec<&str> = FIELD_NAMES
        .iter()
        .zip(&slots)
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(format!("record {index}: missing {}", missing.join(", ")));
    }
    Ok(Record::from_fields(slots.map(Option::unwrap_or_default)))
}

fn nested_element(record: usize, field: usize) -> String {
    format!(
        "record {record}: nested element inside {}",
        FIELD_NAMES[field]
    )
}

fn resolve_reference(reference: &BytesRef<'_>) -> DecodeResult<String> {
    if let Some(ch) = reference.resolve_char_ref().map_err(|e| e.to_string())? {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(|e| e.to_string())?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| format!("unknown entity &{name};"))
}

pub fn parse_markup(path: &Path) -> Result<Vec<Record>> {
    MarkupSource.parse(path)
}
