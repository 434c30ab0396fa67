//! `lptag` - Stamp tags onto InfluxDB line protocol files
//!
//! Reads a line protocol file one line at a time, adds a fixed set of tags to
//! every metric, and writes the result to a new file. Lines that fail to parse
//! and metrics that fail to serialize are reported and skipped; only I/O
//! failures stop a run.
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use lptag::{InfluxCodec, TagSet, Transformer};
//!
//! let tags = TagSet::from_pairs(["env=test"]).unwrap();
//! let codec = InfluxCodec::new();
//! let mut transformer = Transformer::new(&codec, &tags);
//!
//! let mut output = Vec::new();
//! let input = "cpu,env=prod usage=5i 1600000000000000000\n";
//! let report = transformer
//!     .run(Cursor::new(input), &mut output, |w| eprintln!("{w}"))
//!     .unwrap();
//!
//! assert_eq!(report.records_processed, 1);
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "cpu,env=test usage=5i 1600000000000000000\n"
//! );
//! ```

pub mod codec;
pub mod config;
pub mod line_protocol;
pub mod report;
pub mod tags;
pub mod transform;

pub use codec::{LineCodec, TagAccess};
pub use config::{ConfigError, ConfigFile, RunConfig};
pub use line_protocol::{FieldValue, InfluxCodec, Metric};
pub use report::RunReport;
pub use tags::{TagError, TagSet};
pub use transform::{process_file, TransformError, Transformer, Warning};

/// Version of lptag
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
