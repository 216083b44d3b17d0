mod output;
mod telemetry;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use telemerge_core::config::Config;
use telemerge_ingest::Pipeline;
use tracing::{debug, info};

use crate::output::{MergeSummary, print_config_human, print_merge_human};
use crate::telemetry::init_cli_tracing;

#[derive(Parser, Debug)]
#[command(name = "telemerge")]
#[command(about = "Merge delimited, JSON, and XML service telemetry into one chronological report")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long, global = true)]
    json: bool,

    #[arg(short, long, global = true, help = "Debug logging when RUST_LOG is unset")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Merge the three sources into one report (default)")]
    Merge(MergeArgs),
    #[command(about = "Print the effective configuration")]
    Config(MergeArgs),
}

#[derive(Args, Debug, Default)]
struct MergeArgs {
    #[arg(long)]
    csv_path: Option<PathBuf>,
    #[arg(long)]
    json_path: Option<PathBuf>,
    #[arg(long)]
    xml_path: Option<PathBuf>,
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long, help = "IANA zone for rendered timestamps (defaults to the local zone)")]
    time_zone: Option<String>,
}

impl MergeArgs {
    fn apply(self, cfg: &mut Config) {
        if let Some(v) = self.csv_path {
            cfg.csv_path = v;
        }
        if let Some(v) = self.json_path {
            cfg.json_path = v;
        }
        if let Some(v) = self.xml_path {
            cfg.xml_path = v;
        }
        if let Some(v) = self.output {
            cfg.output_path = v;
        }
        if let Some(v) = self.time_zone {
            cfg.time_zone = Some(v);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing(cli.verbose);

    match cli.command {
        None => run_merge(MergeArgs::default(), cli.json),
        Some(Commands::Merge(args)) => run_merge(args, cli.json),
        Some(Commands::Config(args)) => run_config(args, cli.json),
    }
}

fn load_config(args: MergeArgs) -> anyhow::Result<Config> {
    let mut cfg = Config::load().context("load configuration")?;
    args.apply(&mut cfg);
    debug!(
        csv = %cfg.csv_path.display(),
        json = %cfg.json_path.display(),
        xml = %cfg.xml_path.display(),
        output = %cfg.output_path.display(),
        time_zone = cfg.time_zone.as_deref().unwrap_or("<local>"),
        "effective configuration"
    );
    Ok(cfg)
}

fn run_merge(args: MergeArgs, json: bool) -> anyhow::Result<()> {
    let cfg = load_config(args)?;
    let pipeline = Pipeline::from_config(&cfg).context("resolve display time zone")?;
    info!(output = %pipeline.destination().display(), "merging reports");
    let tally = pipeline
        .produce_report()
        .context("failed to merge reports")?;

    let summary = MergeSummary::new(pipeline.destination(), &tally);
    if json {
        print_json(&summary)?;
    } else {
        print_merge_human(&summary);
    }
    Ok(())
}

fn run_config(args: MergeArgs, json: bool) -> anyhow::Result<()> {
    let cfg = load_config(args)?;
    let zone = cfg.display_zone().context("resolve display time zone")?;

    if json {
        #[derive(Serialize)]
        struct EffectiveConfig<'a> {
            #[serde(flatten)]
            cfg: &'a Config,
            resolved_time_zone: &'a str,
        }
        print_json(&EffectiveConfig {
            cfg: &cfg,
            resolved_time_zone: zone.name(),
        })
    } else {
        print_config_human(&cfg, zone.name());
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
