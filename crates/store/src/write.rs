use std::fs;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tempfile::NamedTempFile;
use telemerge_core::error::{MergeError, Result};
use telemerge_core::model::record::Record;
use tracing::debug;

/// Renders the report in memory: one header line, then one line per record, every line
/// newline-terminated. Fields are joined verbatim; nothing is quoted or escaped.
pub fn render_report(header: &[&str], records: &[Record]) -> csv::Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for record in records {
        writer.write_record(record.fields())?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Replaces `destination` with the rendered report. The report is rendered in memory, written to
/// a temporary file beside the destination, then renamed over it, so the destination only ever
/// holds the previous report or the complete new one.
pub fn write_report(destination: &Path, header: &[&str], records: &[Record]) -> Result<()> {
    let unwritable = |reason: String| MergeError::DestinationUnwritable {
        path: destination.to_path_buf(),
        reason,
    };

    let body = render_report(header, records).map_err(|e| unwritable(e.to_string()))?;

    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .map_err(|e| unwritable(format!("failed to create report dir: {e}")))?;

    let mut staged = NamedTempFile::new_in(parent)
        .map_err(|e| unwritable(format!("failed to stage report: {e}")))?;
    staged
        .write_all(&body)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| unwritable(format!("failed to stage report: {e}")))?;
    staged
        .persist(destination)
        .map_err(|e| unwritable(e.error.to_string()))?;

    debug!(
        path = %destination.display(),
        records = records.len(),
        bytes = body.len(),
        "wrote report"
    );
    Ok(())
}
