use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use telemerge_core::model::record::header_line;

pub const SERVICE_CAACA: &str = "caaca31e-bee2-4ed3-8e72-5dab24079744";
pub const SERVICE_7D619: &str = "7d619a45-2b4d-4a54-9e85-6913c9545e34";
pub const SERVICE_04402_376: &str = "04402d03-0952-4d42-8c1f-f2d0b1a9f376";
pub const SERVICE_04402_377: &str = "04402d03-0952-4d42-8c1f-f2d0b1a9f377";
pub const SERVICE_3CC76: &str = "3cc76b74-7d16-4651-9699-34332a56f6e7";

/// 2019-01-02 07:00:00 UTC
pub const EPOCH_0700: i64 = 1_546_412_400_000;
/// 2019-01-02 12:00:00 UTC
pub const EPOCH_1200: i64 = 1_546_430_400_000;

pub struct SamplePaths {
    pub csv: PathBuf,
    pub json: PathBuf,
    pub xml: PathBuf,
}

pub fn sample_csv() -> String {
    format!(
        "{}\n\
         192.168.0.1,client-csv-1,2019-01-02 10:00:00 UTC,{SERVICE_CAACA},0,24,20,5\n\
         192.168.0.2,client-csv-2,2019-01-02 09:00:00 UTC,{SERVICE_3CC76},2,12,0,3\n\
         192.168.0.3,client-csv-3,2019-01-02 11:30:00 UTC,{SERVICE_3CC76},1,30,30,0\n",
        header_line()
    )
}

pub fn sample_json() -> String {
    let rows = json!([
        {
            "client-address": "10.0.1.1",
            "client-guid": "client-json-1",
            "request-time": EPOCH_0700,
            "service-guid": SERVICE_7D619,
            "retries-request": 0,
            "packets-requested": 8,
            "packets-serviced": 8,
            "max-hole-size": 0
        },
        {
            "client-address": "10.0.1.2",
            "client-guid": "client-json-2",
            "request-time": EPOCH_1200,
            "service-guid": SERVICE_04402_376,
            "retries-request": 4,
            "packets-requested": 512,
            "packets-serviced": 0,
            "max-hole-size": 512
        },
        {
            "client-address": "10.0.1.3",
            "client-guid": "client-json-3",
            "request-time": EPOCH_1200,
            "service-guid": SERVICE_04402_376,
            "retries-request": 1,
            "packets-requested": 1000,
            "packets-serviced": 1000,
            "max-hole-size": 0
        }
    ]);
    serde_json::to_string_pretty(&rows).unwrap_or_else(|_| rows.to_string())
}

pub fn sample_xml() -> String {
    let item = |client: &str, time: &str, service: &str, serviced: &str| {
        format!(
            "  <report>\n\
             \x20   <client-address>172.16.0.1</client-address>\n\
             \x20   <client-guid>{client}</client-guid>\n\
             \x20   <request-time>{time}</request-time>\n\
             \x20   <service-guid>{service}</service-guid>\n\
             \x20   <retries-request>3</retries-request>\n\
             \x20   <packets-requested>16</packets-requested>\n\
             \x20   <packets-serviced>{serviced}</packets-serviced>\n\
             \x20   <max-hole-size>2</max-hole-size>\n\
             \x20 </report>\n"
        )
    };
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<records>\n{}{}{}</records>\n",
        item("client-xml-1", "2019-01-02 10:00:00 UTC", SERVICE_04402_377, "16"),
        item("client-xml-2", "2019-01-02 08:00:00 UTC", SERVICE_3CC76, "0"),
        item("client-xml-3", "2019-01-02 13:15:00 UTC", SERVICE_3CC76, "4"),
    )
}

/// Client ids of the sample sources after filtering, in merged order.
pub fn expected_client_order() -> Vec<&'static str> {
    vec![
        "client-json-1",
        "client-csv-1",
        "client-xml-1",
        "client-csv-3",
        "client-json-3",
        "client-xml-3",
    ]
}

/// Per-service counts of the sample sources, in first-seen order of the merged records.
pub fn expected_tally() -> Vec<(&'static str, u64)> {
    vec![
        (SERVICE_7D619, 1),
        (SERVICE_CAACA, 1),
        (SERVICE_04402_377, 1),
        (SERVICE_3CC76, 2),
        (SERVICE_04402_376, 1),
    ]
}

pub fn write_sample_sources(dir: &Path) -> anyhow::Result<SamplePaths> {
    let paths = SamplePaths {
        csv: dir.join("reports.csv"),
        json: dir.join("reports.json"),
        xml: dir.join("reports.xml"),
    };
    fs::write(&paths.csv, sample_csv())?;
    fs::write(&paths.json, sample_json())?;
    fs::write(&paths.xml, sample_xml())?;
    Ok(paths)
}

/// Report lines after the header.
pub fn report_body(path: &Path) -> anyhow::Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents.lines().skip(1).map(str::to_string).collect())
}
