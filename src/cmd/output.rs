use anyhow::Result;
use serde::Serialize;

use lptag::{RunConfig, RunReport};

use crate::OutputFormat;

/// JSON shape of the end-of-run summary.
#[derive(Serialize)]
struct Summary<'a> {
    input: String,
    output: String,
    #[serde(flatten)]
    report: &'a RunReport,
}

/// Print the end-of-run summary to stdout. Only called after a successful run.
pub fn print_summary(report: &RunReport, config: &RunConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{report}");
            println!(
                "Successfully processed {} and wrote to {}",
                config.input.display(),
                config.output.display()
            );
        }
        OutputFormat::Json => {
            let summary = Summary {
                input: config.input.display().to_string(),
                output: config.output.display().to_string(),
                report,
            };
            println!("{}", serde_json::to_string(&summary)?);
        }
    }
    Ok(())
}
