pub mod write;

pub use write::{render_report, write_report};
