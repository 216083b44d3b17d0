pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod time;

pub use error::{MergeError, Result, SourceKind};
pub use model::record::Record;
pub use model::tally::Tally;
