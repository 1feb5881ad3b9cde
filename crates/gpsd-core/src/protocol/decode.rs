//! Report decoding
//!
//! Maps a class tag to the report type it names and decodes the frame into
//! it. Failures are per-frame and recoverable.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use super::types::{Report, RAW_CLASS};
use crate::error::DecodeError;

/// Every tag `decode` accepts
pub const KNOWN_CLASSES: [&str; 14] = [
    "TPV", "SKY", "GST", "ATT", "VERSION", "DEVICES", "WATCH", "POLL", "TOFF", "PPS", "OSC",
    "DEVICE", "ERROR", RAW_CLASS,
];

/// Decode `frame` as the report named by `class`
///
/// `RAW` wraps the bytes as they are; every other tag is decoded as JSON.
pub fn decode(class: &str, frame: &[u8]) -> Result<Report, DecodeError> {
    match class {
        "TPV" => json("TPV", frame).map(Report::Tpv),
        "SKY" => json("SKY", frame).map(Report::Sky),
        "GST" => json("GST", frame).map(Report::Gst),
        "ATT" => json("ATT", frame).map(Report::Att),
        "VERSION" => json("VERSION", frame).map(Report::Version),
        "DEVICES" => json("DEVICES", frame).map(Report::Devices),
        "WATCH" => json("WATCH", frame).map(Report::Watch),
        "POLL" => json("POLL", frame).map(Report::Poll),
        "TOFF" => json("TOFF", frame).map(Report::Toff),
        "PPS" => json("PPS", frame).map(Report::Pps),
        "OSC" => json("OSC", frame).map(Report::Osc),
        "DEVICE" => json("DEVICE", frame).map(Report::Device),
        "ERROR" => json("ERROR", frame).map(Report::Error),
        RAW_CLASS => Ok(Report::Raw(Bytes::copy_from_slice(frame))),
        other => Err(DecodeError::UnknownClass(other.to_string())),
    }
}

fn json<T: DeserializeOwned>(class: &'static str, frame: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(frame).map_err(|source| DecodeError::Json { class, source })
}
