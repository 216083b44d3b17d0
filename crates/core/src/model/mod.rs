pub mod record;
pub mod tally;
