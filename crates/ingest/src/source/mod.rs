pub mod delimited;
pub mod document;
pub mod markup;

use std::fs;
use std::path::Path;

use telemerge_core::SourceKind;
use telemerge_core::error::{MergeError, Result};
use telemerge_core::filter::retain_serviced;
use telemerge_core::model::record::Record;
use tracing::debug;

pub use delimited::{DelimitedSource, parse_delimited};
pub use document::{DocumentSource, parse_document};
pub use markup::{MarkupSource, parse_markup};

/// Failure reason from decoding raw content; the caller attaches the source location.
pub type DecodeResult<T> = std::result::Result<T, String>;

/// One source encoding. Implementors only decode; reading and the serviced filter are shared.
pub trait SourceAdapter {
    fn kind(&self) -> SourceKind;

    fn decode(&self, raw: &[u8]) -> DecodeResult<Vec<Record>>;

    fn parse(&self, path: &Path) -> Result<Vec<Record>> {
        let kind = self.kind();
        let raw = fs::read(path).map_err(|e| MergeError::unreadable(kind, path, e))?;
        let decoded = self
            .decode(&raw)
            .map_err(|reason| MergeError::malformed(kind, path, reason))?;

        let decoded_count = decoded.len();
        let records = retain_serviced(decoded);
        debug!(
            source = %kind,
            path = %path.display(),
            decoded = decoded_count,
            dropped = decoded_count - records.len(),
            "parsed source"
        );
        Ok(records)
    }
}
