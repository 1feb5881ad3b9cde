//! Report types decoded from daemon frames
//!
//! One struct per JSON report class. The daemon sends every number as a JSON
//! number, so counts and flags are `f64` like everything else. Missing fields
//! fall back to their defaults.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Class reported for frames that are not JSON
pub const RAW_CLASS: &str = "RAW";

/// A decoded inbound frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Tpv(Tpv),
    Sky(Sky),
    Gst(Gst),
    Att(Att),
    Version(Version),
    Devices(Devices),
    Watch(Watch),
    Poll(Poll),
    Toff(Toff),
    Pps(Pps),
    Osc(Osc),
    Device(Device),
    Error(ErrorReport),
    /// Non-JSON line (NMEA passthrough, hex dumps), bytes kept as received
    Raw(Bytes),
}

impl Report {
    /// Wire discriminant of this report
    pub fn class(&self) -> &str {
        match self {
            Report::Tpv(r) => &r.class,
            Report::Sky(r) => &r.class,
            Report::Gst(r) => &r.class,
            Report::Att(r) => &r.class,
            Report::Version(r) => &r.class,
            Report::Devices(r) => &r.class,
            Report::Watch(r) => &r.class,
            Report::Poll(r) => &r.class,
            Report::Toff(r) => &r.class,
            Report::Pps(r) => &r.class,
            Report::Osc(r) => &r.class,
            Report::Device(r) => &r.class,
            Report::Error(r) => &r.class,
            Report::Raw(_) => RAW_CLASS,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Report::Raw(_))
    }
}

/// Time-position-velocity fix
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tpv {
    pub class: String,
    pub device: String,
    pub status: f64,
    pub mode: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    pub ept: f64,
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub eph: f64,
    pub epx: f64,
    pub epy: f64,
    pub epv: f64,
    pub track: f64,
    pub speed: f64,
    pub climb: f64,
    pub epd: f64,
    pub eps: f64,
    pub epc: f64,
}

/// NMEA-style fix mode carried in `Tpv::mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixMode {
    /// Mode not seen yet
    Unknown,
    NoFix,
    Fix2D,
    Fix3D,
}

impl Tpv {
    pub fn fix_mode(&self) -> FixMode {
        match self.mode as i64 {
            1 => FixMode::NoFix,
            2 => FixMode::Fix2D,
            3 => FixMode::Fix3D,
            _ => FixMode::Unknown,
        }
    }
}

/// Satellite sky view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sky {
    pub class: String,
    pub device: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    pub xdop: f64,
    pub ydop: f64,
    pub vdop: f64,
    pub tdop: f64,
    pub hdop: f64,
    pub pdop: f64,
    pub gdop: f64,
    pub satellites: Vec<Satellite>,
}

impl Sky {
    /// Number of satellites used in the current solution
    pub fn used_count(&self) -> usize {
        self.satellites.iter().filter(|s| s.used).count()
    }
}

/// One entry of `Sky::satellites`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Satellite {
    #[serde(rename = "PRN")]
    pub prn: f64,
    pub az: f64,
    pub el: f64,
    pub ss: f64,
    pub used: bool,
}

/// Pseudorange noise / error ellipse statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gst {
    pub class: String,
    pub device: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    pub rms: f64,
    pub major: f64,
    pub minor: f64,
    pub orient: f64,
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
}

/// Attitude (heading, pitch, roll) from a compass or IMU
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Att {
    pub class: String,
    pub device: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    pub heading: f64,
    pub mag_st: String,
    pub pitch: f64,
    pub pitch_st: String,
    pub yaw: f64,
    pub yaw_st: String,
    pub roll: f64,
    pub roll_st: String,
    pub dip: f64,
    pub mag_len: f64,
    pub mag_x: f64,
    pub mag_y: f64,
    pub mag_z: f64,
    pub acc_len: f64,
    pub acc_x: f64,
    pub acc_y: f64,
    pub acc_z: f64,
    pub gyro_x: f64,
    pub gyro_y: f64,
    pub depth: f64,
    pub temp: f64,
}

/// Sent by the daemon on connect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Version {
    pub class: String,
    pub release: String,
    pub rev: String,
    pub proto_major: f64,
    pub proto_minor: f64,
    pub remote: String,
}

/// Snapshot of every device the daemon knows about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Devices {
    pub class: String,
    pub devices: Vec<Device>,
    pub remote: String,
}

/// Echo of the watch policy currently in effect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Watch {
    pub class: String,
    pub enable: bool,
    pub json: bool,
    pub nmea: bool,
    pub raw: f64,
    pub scaled: bool,
    pub timing: bool,
    pub split24: bool,
    pub pps: bool,
    pub device: String,
    pub remote: String,
}

/// Answer to `?POLL;`, the latest fix/sky/error summaries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Poll {
    pub class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    pub active: f64,
    pub tpv: Vec<Tpv>,
    pub sky: Vec<Sky>,
    pub gst: Vec<Gst>,
}

/// Offset between the receiver's time and the system clock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toff {
    pub class: String,
    pub device: String,
    pub real_sec: f64,
    pub real_nsec: f64,
    pub clock_sec: f64,
    pub clock_nsec: f64,
}

/// Pulse-per-second edge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pps {
    pub class: String,
    pub device: String,
    pub real_sec: f64,
    pub real_nsec: f64,
    pub clock_sec: f64,
    pub clock_nsec: f64,
    pub precision: f64,
}

/// Oscillator discipline status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Osc {
    pub class: String,
    pub device: String,
    pub running: bool,
    pub reference: bool,
    pub disciplined: bool,
    pub delta: f64,
}

/// A single device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    pub class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated: Option<Activated>,
    pub path: String,
    pub flags: f64,
    pub driver: String,
    pub subtype: String,
    pub bps: f64,
    pub parity: String,
    pub stopbits: f64,
    pub native: f64,
    pub cycle: f64,
    pub mincycle: f64,
}

/// `Device::activated` is a timestamp string inside `DEVICES` and a number
/// in standalone `DEVICE` reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Activated {
    Number(f64),
    Timestamp(String),
}

impl Activated {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Activated::Number(n) => Some(*n),
            Activated::Timestamp(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Activated::Timestamp(s) => Some(s),
            Activated::Number(_) => None,
        }
    }
}

/// Error notification from the daemon (bad command, unknown device)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorReport {
    pub class: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_class() {
        let report = Report::Raw(Bytes::from_static(b"$GPGGA,"));
        assert_eq!(report.class(), RAW_CLASS);
        assert!(report.is_raw());
    }

    #[test]
    fn test_fix_mode() {
        let mut tpv = Tpv::default();
        assert_eq!(tpv.fix_mode(), FixMode::Unknown);
        tpv.mode = 1.0;
        assert_eq!(tpv.fix_mode(), FixMode::NoFix);
        tpv.mode = 3.0;
        assert_eq!(tpv.fix_mode(), FixMode::Fix3D);
    }

    #[test]
    fn test_sky_used_count() {
        let sky = Sky {
            satellites: vec![
                Satellite { prn: 1.0, used: true, ..Default::default() },
                Satellite { prn: 7.0, used: false, ..Default::default() },
                Satellite { prn: 9.0, used: true, ..Default::default() },
            ],
            ..Default::default()
        };
        assert_eq!(sky.used_count(), 2);
    }

    #[test]
    fn test_activated_accepts_string_or_number() {
        let dev: Device = serde_json::from_str(r#"{"activated":1411468340.0}"#).unwrap();
        assert_eq!(dev.activated, Some(Activated::Number(1411468340.0)));
        assert_eq!(dev.activated.as_ref().and_then(Activated::as_number), Some(1411468340.0));

        let dev: Device =
            serde_json::from_str(r#"{"activated":"2014-09-23T10:32:20.000Z"}"#).unwrap();
        assert_eq!(
            dev.activated.as_ref().and_then(Activated::as_str),
            Some("2014-09-23T10:32:20.000Z")
        );

        let dev: Device = serde_json::from_str(r#"{"path":"/dev/ttyACM0"}"#).unwrap();
        assert!(dev.activated.is_none());
    }
}
