//! WATCH command encoding
//!
//! Turns a set of stream-policy flags into the `?WATCH={...}` command. Keys
//! are emitted in flag-bit order so the output is stable.

use bitflags::bitflags;

/// Command prefix understood by the daemon
const WATCH_PREFIX: &str = "?WATCH=";

bitflags! {
    /// Stream policy options, combined with `|`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WatchFlags: u32 {
        /// Enable streaming
        const ENABLE = 0x0001;
        /// Disable streaming, takes priority over `ENABLE`
        const DISABLE = 0x0002;
        /// JSON output
        const JSON = 0x0010;
        /// NMEA output
        const NMEA = 0x0020;
        /// Raw packets as hex (`"raw":1`)
        const RARE = 0x0040;
        /// Raw packets verbatim (`"raw":2`)
        const RAW = 0x0080;
        /// Scale output to floats
        const SCALED = 0x0100;
        /// Timing information, sent as its own `"timing"` key rather than
        /// folded into `"scaled"`
        const TIMING = 0x0200;
        /// Watch only the device given alongside the flags
        const DEVICE = 0x0800;
        /// Split AIS type 24 messages
        const SPLIT24 = 0x1000;
        /// PPS reports
        const PPS = 0x2000;
    }
}

/// Encode a WATCH command
///
/// `DISABLE` selects the disabling form and wins over `ENABLE`. The device
/// path is only sent in the enabling form, and only with `DEVICE` set.
///
/// `RARE` and `RAW` share the `raw` key. When both are set
/// the later bit (`RAW`, value 2) wins, so a single `"raw":2` is emitted.
pub fn encode_watch(flags: WatchFlags, device: &str) -> String {
    let enable = !flags.contains(WatchFlags::DISABLE);
    let toggle = if enable { "true" } else { "false" };

    let mut fields = vec![format!("\"enable\":{}", toggle)];

    if flags.contains(WatchFlags::JSON) {
        fields.push(format!("\"json\":{}", toggle));
    }
    if flags.contains(WatchFlags::NMEA) {
        fields.push(format!("\"nmea\":{}", toggle));
    }
    if let Some(level) = raw_level(flags) {
        fields.push(format!("\"raw\":{}", level));
    }
    if flags.contains(WatchFlags::SCALED) {
        fields.push(format!("\"scaled\":{}", toggle));
    }
    if flags.contains(WatchFlags::TIMING) {
        fields.push(format!("\"timing\":{}", toggle));
    }
    if flags.contains(WatchFlags::SPLIT24) {
        fields.push(format!("\"split24\":{}", toggle));
    }
    if flags.contains(WatchFlags::PPS) {
        fields.push(format!("\"pps\":{}", toggle));
    }
    if enable && flags.contains(WatchFlags::DEVICE) {
        fields.push(format!("\"device\":{}", quote(device)));
    }

    format!("{}{{{}}}", WATCH_PREFIX, fields.join(","))
}

fn raw_level(flags: WatchFlags) -> Option<u8> {
    if flags.contains(WatchFlags::RAW) {
        Some(2)
    } else if flags.contains(WatchFlags::RARE) {
        Some(1)
    } else {
        None
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}
