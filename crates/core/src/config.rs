use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, Result};
use crate::time::DisplayZone;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
    pub xml_path: PathBuf,
    pub output_path: PathBuf,
    pub time_zone: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("datamerge/reports.csv"),
            json_path: PathBuf::from("datamerge/reports.json"),
            xml_path: PathBuf::from("datamerge/reports.xml"),
            output_path: PathBuf::from("merge-report.csv"),
            time_zone: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            apply_overrides(&mut cfg, file_overrides, "config file")?;
        }
        apply_overrides(&mut cfg, load_env_overrides(), "environment")?;
        Ok(cfg)
    }

    pub fn display_zone(&self) -> Result<DisplayZone> {
        DisplayZone::resolve(self.time_zone.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverrides {
    csv_path: Option<PathBuf>,
    json_path: Option<PathBuf>,
    xml_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    time_zone: Option<String>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("TELEMERGE_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("telemerge/config.toml")
}

fn load_file_overrides(path: &Path) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| MergeError::Config(format!("failed reading {}: {e}", path.display())))?;
    let parsed: ConfigOverrides = toml::from_str(&raw)
        .map_err(|e| MergeError::Config(format!("failed parsing {}: {e}", path.display())))?;
    Ok(Some(parsed))
}

fn load_env_overrides() -> ConfigOverrides {
    ConfigOverrides {
        csv_path: env::var("TELEMERGE_CSV_PATH").ok().map(PathBuf::from),
        json_path: env::var("TELEMERGE_JSON_PATH").ok().map(PathBuf::from),
        xml_path: env::var("TELEMERGE_XML_PATH").ok().map(PathBuf::from),
        output_path: env::var("TELEMERGE_OUTPUT_PATH").ok().map(PathBuf::from),
        time_zone: env::var("TELEMERGE_TIME_ZONE").ok(),
    }
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides, source: &str) -> Result<()> {
    if let Some(v) = overrides.csv_path {
        cfg.csv_path = v;
    }
    if let Some(v) = overrides.json_path {
        cfg.json_path = v;
    }
    if let Some(v) = overrides.xml_path {
        cfg.xml_path = v;
    }
    if let Some(v) = overrides.output_path {
        cfg.output_path = v;
    }
    if let Some(v) = overrides.time_zone {
        DisplayZone::named(&v).map_err(|e| {
            MergeError::Config(format!("bad time_zone in {source}: {e} (value={v})"))
        })?;
        cfg.time_zone = Some(v);
    }
    Ok(())
}
