//! gpsd wire protocol
//!
//! Inbound frames are newline-delimited: JSON objects tagged by `"class"`, or
//! opaque passthrough lines. The only outbound command built here is WATCH.
//!
//! - `classify` - cheap class extraction ahead of decoding
//! - `decode` - class tag to typed report
//! - `types` - report data model
//! - `watch` - stream policy flags and the WATCH encoder

pub mod classify;
pub mod decode;
pub mod types;
pub mod watch;

pub use classify::{class, is_json};
pub use decode::{decode, KNOWN_CLASSES};
pub use types::{
    Activated, Att, Device, Devices, ErrorReport, FixMode, Gst, Osc, Poll, Pps, Report, Satellite,
    Sky, Toff, Tpv, Version, Watch, RAW_CLASS,
};
pub use watch::{encode_watch, WatchFlags};
