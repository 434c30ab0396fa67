//! InfluxDB line protocol codec built on [`influxlp_tools`].
//!
//! A line looks like
//!
//! ```text
//! measurement[,tag=value...] field=value[,field=value...] [timestamp]
//! ```
//!
//! Parsing, escaping and field typing are done by `influxlp_tools`; this
//! module only adapts its [`LineProtocol`] to [`TagAccess`] and [`LineCodec`].
//!
//! # Example
//!
//! ```rust
//! use lptag::line_protocol::Metric;
//! use lptag::TagAccess;
//!
//! let mut metric = Metric::parse("cpu,host=a usage=5i 1600000000000000000").unwrap();
//! metric.set_tag("env", "prod");
//! assert_eq!(metric.get_tag("env").as_deref(), Some("prod"));
//! assert_eq!(metric.get_tag("host").as_deref(), Some("a"));
//! ```

use std::fmt;

use influxlp_tools::error::LineProtocolError;
use influxlp_tools::LineProtocol;
use thiserror::Error;

use crate::codec::{LineCodec, TagAccess};

pub use influxlp_tools::element::FieldValue;

/// One decoded line protocol point.
#[derive(Clone)]
pub struct Metric(LineProtocol);

impl Metric {
    /// Parse a single line.
    pub fn parse(line: &str) -> Result<Self, LineProtocolError> {
        LineProtocol::parse_line(line).map(Self)
    }

    pub fn measurement(&self) -> &str {
        &self.0.get_measurement_ref().0
    }

    pub fn field(&self, key: &str) -> Option<FieldValue> {
        self.0.get_field(key)
    }

    /// Nanoseconds since the Unix epoch. `None` leaves it to the server.
    pub fn timestamp(&self) -> Option<i64> {
        self.0.get_timestamp()
    }

    pub fn as_line_protocol(&self) -> &LineProtocol {
        &self.0
    }

    pub fn into_inner(self) -> LineProtocol {
        self.0
    }
}

impl From<LineProtocol> for Metric {
    fn from(line: LineProtocol) -> Self {
        Self(line)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Metric").field(&self.0.to_string()).finish()
    }
}

impl TagAccess for Metric {
    fn get_tag(&self, key: &str) -> Option<String> {
        self.0.get_tag(key).map(|value| value.to_string())
    }

    fn set_tag(&mut self, key: &str, value: &str) {
        // `add_tag` is a by-value builder that replaces an existing key
        let line = std::mem::replace(&mut self.0, LineProtocol::new(""));
        self.0 = line.add_tag(key, value.to_string());
    }
}

/// Errors from [`InfluxCodec::decode`].
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("input is not valid UTF-8")]
    InvalidUtf8,

    #[error(transparent)]
    Parse(#[from] LineProtocolError),
}

/// Errors from [`InfluxCodec::encode`].
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error(transparent)]
    Build(#[from] LineProtocolError),

    #[error("metric would span several lines: {0:?}")]
    LineBreak(String),
}

/// [`LineCodec`] for InfluxDB line protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfluxCodec;

impl InfluxCodec {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LineCodec for InfluxCodec {
    type Record = Metric;
    type DecodeError = DecodeError;
    type EncodeError = EncodeError;

    /// Parses every non-blank, non-comment line in `line`.
    ///
    /// The input normally holds a single line, but embedded newlines are
    /// accepted and yield one metric per line. The first bad line fails the
    /// whole call.
    fn decode(&self, line: &[u8]) -> Result<Vec<Metric>, DecodeError> {
        let text = std::str::from_utf8(line).map_err(|_| DecodeError::InvalidUtf8)?;

        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| Metric::parse(l).map_err(DecodeError::from))
            .collect()
    }

    fn encode(&self, record: &Metric) -> Result<Vec<u8>, EncodeError> {
        let built = record.0.build()?;
        let body = built.trim_end_matches(['\n', '\r']);
        if body.contains(['\n', '\r']) {
            return Err(EncodeError::LineBreak(body.to_string()));
        }

        let mut out = Vec::with_capacity(body.len() + 1);
        out.extend_from_slice(body.as_bytes());
        out.push(b'\n');
        Ok(out)
    }
}
