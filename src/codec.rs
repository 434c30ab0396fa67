//! Seam between the transform engine and the text format it rewrites.
//!
//! The engine never looks inside a line. It hands bytes to a [`LineCodec`],
//! gets back zero or more records, touches only their tags through
//! [`TagAccess`], and hands each record back for encoding. The bundled
//! implementation is [`InfluxCodec`](crate::line_protocol::InfluxCodec).

use std::fmt::Display;

/// Tag read/write capability of a decoded record.
///
/// Tag keys are unique within a record.
pub trait TagAccess {
    /// Returns `true` if the record carries a tag under `key`.
    fn has_tag(&self, key: &str) -> bool {
        self.get_tag(key).is_some()
    }

    /// Current value of the tag under `key`, if any.
    fn get_tag(&self, key: &str) -> Option<String>;

    /// Insert the tag, replacing any existing value for `key`.
    fn set_tag(&mut self, key: &str, value: &str);
}

/// Decodes one input line into records and encodes records back into text.
///
/// Implementations are stateless and synchronous.
pub trait LineCodec {
    /// Structured record produced by [`decode`](Self::decode).
    type Record: TagAccess;
    /// Why a line could not be decoded.
    type DecodeError: Display;
    /// Why a record could not be encoded.
    type EncodeError: Display;

    /// Decode a non-blank, non-comment line into zero or more records.
    fn decode(&self, line: &[u8]) -> Result<Vec<Self::Record>, Self::DecodeError>;

    /// Encode a record into its canonical text form, including the line terminator.
    fn encode(&self, record: &Self::Record) -> Result<Vec<u8>, Self::EncodeError>;
}
