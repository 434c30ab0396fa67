//! Streaming transform: read -> decode -> tag -> encode -> write.
//!
//! Input is consumed one line at a time. A line that fails to decode, or a
//! single metric that fails to encode, is reported through the warning
//! callback and skipped. Read and write failures abort the run.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::codec::{LineCodec, TagAccess};
use crate::config::RunConfig;
use crate::report::RunReport;
use crate::tags::TagSet;

/// Recoverable condition met while transforming. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The line could not be decoded and produced no output.
    ParseFailed { line: usize, error: String },
    /// A run tag replaced a tag the metric already carried.
    TagOverwritten {
        line: usize,
        key: String,
        previous: String,
    },
    /// One metric could not be encoded; the rest of its line is unaffected.
    SerializeFailed { line: usize, error: String },
}

impl Warning {
    pub fn line(&self) -> usize {
        match self {
            Self::ParseFailed { line, .. }
            | Self::TagOverwritten { line, .. }
            | Self::SerializeFailed { line, .. } => *line,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseFailed { line, error } => {
                write!(f, "Warning: Failed to parse line {line}: {error}")
            }
            Self::TagOverwritten {
                line,
                key,
                previous,
            } => write!(f, "[{line}] Warning: tag {key}={previous} has been overwritten"),
            Self::SerializeFailed { line, error } => {
                write!(f, "Warning: Failed to serialize metric on line {line}: {error}")
            }
        }
    }
}

/// Fatal run errors.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("failed to open input file {}: {source}", path.display())]
    OpenInput { path: PathBuf, source: io::Error },

    #[error("failed to create output file {}: {source}", path.display())]
    CreateOutput { path: PathBuf, source: io::Error },

    #[error("output file {} is the input file", path.display())]
    OutputIsInput { path: PathBuf },

    #[error("error reading input file: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write to output file: {0}")]
    Write(#[source] io::Error),
}

/// Applies a [`TagSet`] to every metric of a line-oriented stream.
///
/// Owns the run's counters; [`report`](Self::report) can be read at any time,
/// including after [`run`](Self::run) returned an error.
pub struct Transformer<'a, C: LineCodec> {
    codec: &'a C,
    tags: &'a TagSet,
    report: RunReport,
}

impl<'a, C: LineCodec> Transformer<'a, C> {
    pub fn new(codec: &'a C, tags: &'a TagSet) -> Self {
        Self {
            codec,
            tags,
            report: RunReport::default(),
        }
    }

    /// Counters so far
    pub fn report(&self) -> RunReport {
        self.report
    }

    /// Transform `input` into `output` until end of input.
    ///
    /// Lines are read as raw bytes, so invalid UTF-8 is the codec's problem
    /// rather than a read error. `output` is flushed before returning `Ok`.
    pub fn run<R, W, F>(
        &mut self,
        mut input: R,
        output: &mut W,
        mut on_warning: F,
    ) -> Result<RunReport, TransformError>
    where
        R: BufRead,
        W: Write,
        F: FnMut(Warning),
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .map_err(TransformError::Read)?;
            if read == 0 {
                break;
            }

            self.report.lines_examined += 1;
            let line_no = self.report.lines_examined;

            let line = buf.trim_ascii();
            if line.is_empty() || line.starts_with(b"#") {
                continue;
            }

            self.process_line(line_no, line, output, &mut on_warning)?;
        }

        output.flush().map_err(TransformError::Write)?;

        debug!(
            "Finished: {} lines, {} metrics",
            self.report.lines_examined, self.report.records_processed
        );
        Ok(self.report)
    }

    fn process_line<W: Write>(
        &mut self,
        line_no: usize,
        line: &[u8],
        output: &mut W,
        on_warning: &mut dyn FnMut(Warning),
    ) -> Result<(), TransformError> {
        let records = match self.codec.decode(line) {
            Ok(records) => records,
            Err(e) => {
                on_warning(Warning::ParseFailed {
                    line: line_no,
                    error: e.to_string(),
                });
                return Ok(());
            }
        };

        for mut record in records {
            self.apply_tags(line_no, &mut record, on_warning);

            let encoded = match self.codec.encode(&record) {
                Ok(bytes) => bytes,
                Err(e) => {
                    on_warning(Warning::SerializeFailed {
                        line: line_no,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            output.write_all(&encoded).map_err(TransformError::Write)?;
            self.report.records_processed += 1;
        }

        Ok(())
    }

    /// Last writer wins: run tags always replace existing ones.
    fn apply_tags(
        &self,
        line_no: usize,
        record: &mut C::Record,
        on_warning: &mut dyn FnMut(Warning),
    ) {
        for (key, value) in self.tags.entries() {
            if let Some(previous) = record.get_tag(key) {
                on_warning(Warning::TagOverwritten {
                    line: line_no,
                    key: key.to_string(),
                    previous,
                });
            }
            record.set_tag(key, value);
        }
    }
}

/// Run a whole file-to-file transform for `config`.
///
/// The input is opened read-only before the output is created, so a missing
/// input never leaves an empty output file behind. An output path that
/// resolves to the input file (`sub/../data.influx`, a symlink) is refused
/// before anything is truncated.
pub fn process_file<C, F>(
    config: &RunConfig,
    codec: &C,
    on_warning: F,
) -> Result<RunReport, TransformError>
where
    C: LineCodec,
    F: FnMut(Warning),
{
    let input = File::open(&config.input).map_err(|source| TransformError::OpenInput {
        path: config.input.clone(),
        source,
    })?;
    if same_file(&config.input, &config.output) {
        return Err(TransformError::OutputIsInput {
            path: config.output.clone(),
        });
    }
    let output = File::create(&config.output).map_err(|source| TransformError::CreateOutput {
        path: config.output.clone(),
        source,
    })?;

    info!(
        "Tagging {} -> {} with {} tag(s)",
        config.input.display(),
        config.output.display(),
        config.tags.len()
    );

    let mut writer = BufWriter::new(output);
    let mut transformer = Transformer::new(codec, &config.tags);
    transformer.run(BufReader::new(input), &mut writer, on_warning)
}

/// Both paths exist and resolve to the same file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
