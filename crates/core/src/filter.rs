use crate::model::record::Record;

/// Text value of `packets-serviced` that excludes a record.
pub const ZERO_SERVICED: &str = "0";

/// True when the record serviced at least one packet. Compared as exact text, so `"00"` or
/// `"0.0"` are kept.
pub fn is_serviced(record: &Record) -> bool {
    record.packets_serviced != ZERO_SERVICED
}

/// Drops unserviced records, keeping the relative order of the rest.
pub fn retain_serviced(records: Vec<Record>) -> Vec<Record> {
    records.into_iter().filter(is_serviced).collect()
}
