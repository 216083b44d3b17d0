use std::path::{Path, PathBuf};

use telemerge_core::config::Config;
use telemerge_core::error::Result;
use telemerge_core::model::record::FIELD_NAMES;
use telemerge_core::model::tally::Tally;
use telemerge_core::time::DisplayZone;
use telemerge_store::write_report;
use tracing::{info, info_span};

use crate::merge::merge;
use crate::source::{DelimitedSource, DocumentSource, MarkupSource, SourceAdapter};

/// Locations of the three inputs of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    pub delimited: PathBuf,
    pub document: PathBuf,
    pub markup: PathBuf,
}

impl SourceSet {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            delimited: cfg.csv_path.clone(),
            document: cfg.json_path.clone(),
            markup: cfg.xml_path.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    sources: SourceSet,
    destination: PathBuf,
    zone: DisplayZone,
}

impl Pipeline {
    pub fn new(sources: SourceSet, destination: PathBuf, zone: DisplayZone) -> Self {
        Self {
            sources,
            destination,
            zone,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self::new(
            SourceSet::from_config(cfg),
            cfg.output_path.clone(),
            cfg.display_zone()?,
        ))
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Reads every source, merges, writes the report, and tallies it. Any failure aborts the
    /// run before the destination is touched, except a failure of the write itself.
    pub fn produce_report(&self) -> Result<Tally> {
        let span = info_span!(
            "produce_report",
            destination = %self.destination.display(),
            zone = self.zone.name()
        );
        let _guard = span.enter();

        let delimited = DelimitedSource.parse(&self.sources.delimited)?;
        let document = DocumentSource::new(self.zone).parse(&self.sources.document)?;
        let markup = MarkupSource.parse(&self.sources.markup)?;

        let merged = merge(&self.sources, delimited, document, markup)?;
        write_report(&self.destination, &FIELD_NAMES, &merged)?;

        let tally = Tally::aggregate(&merged);
        info!(
            records = merged.len(),
            services = tally.len(),
            "merged report written"
        );
        Ok(tally)
    }
}

pub fn produce_report(
    sources: &SourceSet,
    destination: &Path,
    zone: DisplayZone,
) -> Result<Tally> {
    Pipeline::new(sources.clone(), destination.to_path_buf(), zone).produce_report()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use telemerge_core::SourceKind;
    use telemerge_core::error::MergeError;
    use telemerge_core::time::parse_display;
    use testkit::{SamplePaths, expected_client_order, expected_tally, write_sample_sources};

    use super::*;
    use crate::source::parse_delimited;

    fn sources(paths: &SamplePaths) -> SourceSet {
        SourceSet {
            delimited: paths.csv.clone(),
            document: paths.json.clone(),
            markup: paths.xml.clone(),
        }
    }

    #[test]
    fn produces_sorted_filtered_report_and_tally() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let paths = write_sample_sources(dir.path())?;
        let dest = dir.path().join("merge-report.csv");

        let tally = produce_report(&sources(&paths), &dest, DisplayZone::utc())?;

        let contents = fs::read_to_string(&dest)?;
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some(FIELD_NAMES.join(",").as_str()));
        let body: Vec<&str> = lines.collect();
        assert_eq!(body.len(), 6);
        assert_eq!(tally.total(), body.len() as u64);

        let clients: Vec<&str> = body.iter().map(|l| l.split(',').nth(1).unwrap()).collect();
        assert_eq!(clients, expected_client_order());
        assert!(body.iter().all(|l| l.split(',').nth(6) != Some("0")));

        let got: Vec<(&str, u64)> = tally.iter().collect();
        assert_eq!(got, expected_tally());
        Ok(())
    }

    #[test]
    fn report_is_chronological() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let paths = write_sample_sources(dir.path())?;
        let dest = dir.path().join("merge-report.csv");
        produce_report(&sources(&paths), &dest, DisplayZone::utc())?;

        let times = testkit::report_body(&dest)?
            .iter()
            .map(|l| parse_display(l.split(',').nth(2).unwrap()))
            .collect::<std::result::Result<Vec<_>, String>>()
            .map_err(anyhow::Error::msg)?;
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn json_epochs_render_in_run_zone() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let paths = write_sample_sources(dir.path())?;
        let dest = dir.path().join("merge-report.csv");
        let zone = DisplayZone::named("America/New_York")?;
        produce_report(&sources(&paths), &dest, zone)?;

        let body = testkit::report_body(&dest)?;
        let json_row = body
            .iter()
            .find(|l| l.contains("client-json-1"))
            .expect("json row present");
        assert!(json_row.contains(",2019-01-02 02:00:00 EST,"));
        // Eastern wall clock puts the document rows first.
        assert!(body[0].contains("client-json-1"));
        assert!(body[1].contains("client-json-3"));
        Ok(())
    }

    #[test]
    fn report_round_trips_through_delimited_adapter() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let paths = write_sample_sources(dir.path())?;
        let dest = dir.path().join("merge-report.csv");
        let pipeline = Pipeline::new(sources(&paths), dest.clone(), DisplayZone::utc());
        pipeline.produce_report()?;

        let reparsed = parse_delimited(&dest)?;
        let merged = merge(
            &sources(&paths),
            DelimitedSource.parse(&paths.csv)?,
            DocumentSource::new(DisplayZone::utc()).parse(&paths.json)?,
            MarkupSource.parse(&paths.xml)?,
        )?;
        assert_eq!(reparsed, merged);
        Ok(())
    }

    #[test]
    fn five_records_tally_scenario() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let header = FIELD_NAMES.join(",");
        let csv = dir.path().join("a.csv");
        let json = dir.path().join("b.json");
        let xml = dir.path().join("c.xml");
        fs::write(
            &csv,
            format!(
                "{header}\n1.1.1.1,c1,2020-05-01 00:00:01 UTC,A,0,1,1,0\n1.1.1.1,c2,2020-05-01 00:00:02 UTC,B,0,1,0,0\n"
            ),
        )?;
        fs::write(
            &json,
            r#"[{"client-address":"2.2.2.2","client-guid":"c3","request-time":1588291200000,"service-guid":"A","retries-request":0,"packets-requested":1,"packets-serviced":1,"max-hole-size":0},
                {"client-address":"2.2.2.2","client-guid":"c4","request-time":1588291203000,"service-guid":"B","retries-request":0,"packets-requested":1,"packets-serviced":2,"max-hole-size":0}]"#,
        )?;
        fs::write(
            &xml,
            "<list>\
               <r><client-address>3.3.3.3</client-address><client-guid>c5</client-guid><request-time>2020-05-01 00:00:04 UTC</request-time><service-guid>C</service-guid><retries-request>0</retries-request><packets-requested>1</packets-requested><packets-serviced>3</packets-serviced><max-hole-size>0</max-hole-size></r>\
               <r><client-address>3.3.3.3</client-address><client-guid>c6</client-guid><request-time>2020-05-01 00:00:05 UTC</request-time><service-guid>D</service-guid><retries-request>0</retries-request><packets-requested>1</packets-requested><packets-serviced>4</packets-serviced><max-hole-size>0</max-hole-size></r>\
             </list>",
        )?;
        let dest = dir.path().join("out.csv");
        let set = SourceSet {
            delimited: csv,
            document: json,
            markup: xml,
        };

        let tally = produce_report(&set, &dest, DisplayZone::utc())?;

        assert_eq!(tally.get("A"), Some(2));
        assert_eq!(tally.get("B"), Some(1));
        assert_eq!(tally.get("C"), Some(1));
        assert_eq!(tally.get("D"), Some(1));
        assert_eq!(tally.len(), 4);
        assert_eq!(testkit::report_body(&dest)?.len(), 5);
        Ok(())
    }

    #[test]
    fn missing_source_aborts_without_touching_destination() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let paths = write_sample_sources(dir.path())?;
        let dest = dir.path().join("merge-report.csv");

        for (index, missing) in ["csv", "json", "xml"].into_iter().enumerate() {
            fs::write(&dest, "previous contents\n")?;
            let mut set = sources(&paths);
            let gone = dir.path().join(format!("absent.{missing}"));
            match index {
                0 => set.delimited = gone,
                1 => set.document = gone,
                _ => set.markup = gone,
            }

            let err = produce_report(&set, &dest, DisplayZone::utc()).unwrap_err();
            assert!(matches!(err, MergeError::SourceUnreadable { .. }), "{err}");
            assert_eq!(fs::read_to_string(&dest)?, "previous contents\n");
        }
        Ok(())
    }

    #[test]
    fn malformed_source_aborts_without_creating_destination() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let paths = write_sample_sources(dir.path())?;
        fs::write(&paths.json, "{\"not\": \"an array\"}")?;
        let dest = dir.path().join("merge-report.csv");

        let err = produce_report(&sources(&paths), &dest, DisplayZone::utc()).unwrap_err();
        assert!(matches!(
            err,
            MergeError::SourceMalformed {
                kind: SourceKind::Document,
                ..
            }
        ));
        assert!(!dest.exists());
        Ok(())
    }

    #[test]
    fn bad_display_time_aborts_before_write() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let paths = write_sample_sources(dir.path())?;
        let xml = fs::read_to_string(&paths.xml)?.replace("2019-01-02 13:15:00 UTC", "tomorrow");
        fs::write(&paths.xml, xml)?;
        let dest = dir.path().join("merge-report.csv");

        let err = produce_report(&sources(&paths), &dest, DisplayZone::utc()).unwrap_err();
        match err {
            MergeError::TimestampUnparseable {
                kind, path, value, ..
            } => {
                assert_eq!(kind, SourceKind::Markup);
                assert_eq!(path, paths.xml);
                assert_eq!(value, "tomorrow");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dest.exists());
        Ok(())
    }

    #[test]
    fn pipeline_from_config_uses_configured_paths() -> anyhow::Result<()> {
        let cfg = Config {
            time_zone: Some("UTC".to_string()),
            ..Config::default()
        };
        let pipeline = Pipeline::from_config(&cfg)?;
        assert_eq!(pipeline.destination(), Path::new("merge-report.csv"));
        assert_eq!(pipeline.sources, SourceSet::from_config(&cfg));
        Ok(())
    }
}
