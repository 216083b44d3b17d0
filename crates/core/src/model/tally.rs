use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::record::Record;

/// Record count per service identifier. Keys keep the order in which they were first seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Tally {
    counts: IndexMap<String, u64>,
}

impl Tally {
    pub fn aggregate<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut tally = Self::default();
        for record in records {
            tally.increment(&record.service_guid);
        }
        tally
    }

    pub fn increment(&mut self, service_guid: &str) {
        *self.counts.entry(service_guid.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, service_guid: &str) -> Option<u64> {
        self.counts.get(service_guid).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
