use std::io::IsTerminal;
use std::path::Path;

use owo_colors::OwoColorize;
use serde::Serialize;
use telemerge_core::config::Config;
use telemerge_core::model::tally::Tally;

#[derive(Debug, Serialize)]
pub struct MergeSummary<'a> {
    pub output: &'a Path,
    pub services: usize,
    pub records: u64,
    pub tally: &'a Tally,
}

impl<'a> MergeSummary<'a> {
    pub fn new(output: &'a Path, tally: &'a Tally) -> Self {
        Self {
            output,
            services: tally.len(),
            records: tally.total(),
            tally,
        }
    }
}

pub fn print_merge_human(v: &MergeSummary<'_>) {
    let color = std::io::stdout().is_terminal();
    for (service, count) in v.tally.iter() {
        if color {
            println!("service-guid [{}] :: count [{}]", service.cyan(), count);
        } else {
            println!("service-guid [{service}] :: count [{count}]");
        }
    }
    println!(
        "-- {} services, {} records -> {} --",
        v.services,
        v.records,
        v.output.display()
    );
}

pub fn print_config_human(cfg: &Config, zone: &str) {
    println!("csv_path={}", cfg.csv_path.display());
    println!("json_path={}", cfg.json_path.display());
    println!("xml_path={}", cfg.xml_path.display());
    println!("output_path={}", cfg.output_path.display());
    println!("time_zone={zone}");
}
