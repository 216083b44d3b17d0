pub mod merge;
pub mod pipeline;
pub mod source;

pub use merge::merge;
pub use pipeline::{Pipeline, SourceSet, produce_report};
