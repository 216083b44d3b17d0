use serde::{Deserialize, Serialize};

/// Column names in canonical order. Shared by every source encoding and the report header.
pub const FIELD_NAMES: [&str; 8] = [
    "client-address",
    "client-guid",
    "request-time",
    "service-guid",
    "retries-request",
    "packets-requested",
    "packets-serviced",
    "max-hole-size",
];

pub const FIELD_COUNT: usize = FIELD_NAMES.len();

/// One service-delivery event. Every field is kept as source text so passthrough columns are
/// reproduced exactly; only `request_time` is ever interpreted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub struct Record {
    pub client_address: String,
    pub client_guid: String,
    pub request_time: String,
    pub service_guid: String,
    pub retries_request: String,
    pub packets_requested: String,
    pub packets_serviced: String,
    pub max_hole_size: String,
}

impl Record {
    pub fn from_fields(fields: [String; FIELD_COUNT]) -> Self {
        let [
            client_address,
            client_guid,
            request_time,
            service_guid,
            retries_request,
            packets_requested,
            packets_serviced,
            max_hole_size,
        ] = fields;
        Self {
            client_address,
            client_guid,
            request_time,
            service_guid,
            retries_request,
            packets_requested,
            packets_serviced,
            max_hole_size,
        }
    }

    pub fn fields(&self) -> [&str; FIELD_COUNT] {
        [
            &self.client_address,
            &self.client_guid,
            &self.request_time,
            &self.service_guid,
            &self.retries_request,
            &self.packets_requested,
            &self.packets_serviced,
            &self.max_hole_size,
        ]
    }
}

/// Header line of the delimited format, without a line terminator.
pub fn header_line() -> String {
    FIELD_NAMES.join(",")
}
