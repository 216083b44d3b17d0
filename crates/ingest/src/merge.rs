use telemerge_core::SourceKind;
use telemerge_core::error::{MergeError, Result};
use telemerge_core::model::record::Record;
use telemerge_core::time::parse_display;

use crate::pipeline::SourceSet;

/// Concatenates the three batches in source order and sorts by request time. The sort is
/// stable, so equal timestamps keep their concatenation order. `sources` only locates errors.
pub fn merge(
    sources: &SourceSet,
    delimited: Vec<Record>,
    document: Vec<Record>,
    markup: Vec<Record>,
) -> Result<Vec<Record>> {
    let total = delimited.len() + document.len() + markup.len();
    let batches = [
        (SourceKind::Delimited, &sources.delimited, delimited),
        (SourceKind::Document, &sources.document, document),
        (SourceKind::Markup, &sources.markup, markup),
    ];

    let mut keyed = Vec::with_capacity(total);
    for (kind, path, records) in batches {
        for record in records {
            let at = parse_display(&record.request_time).map_err(|reason| {
                MergeError::unparseable(kind, path, &record.request_time, reason)
            })?;
            keyed.push((at, record));
        }
    }

    keyed.sort_by_key(|(at, _)| *at);
    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}
