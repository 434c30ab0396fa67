use anyhow::Result;

use lptag::{process_file, InfluxCodec, RunConfig};

use super::output::print_summary;
use crate::OutputFormat;

pub fn cmd_tag(config: &RunConfig, format: OutputFormat) -> Result<()> {
    let codec = InfluxCodec::new();

    let report = process_file(config, &codec, |warning| eprintln!("{warning}"))?;

    print_summary(&report, config, format)
}
