//! Command-line arguments

use std::convert::Infallible;

use clap::{ArgAction, Parser, ValueEnum};
use gpsd_core::{WatchFlags, DEFAULT_ADDRESS, DEFAULT_CAPACITY};

/// Raw packet output level
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RawLevel {
    Off,
    /// Packets as hex dumps
    Hex,
    /// Packets verbatim
    Raw,
}

/// Stream reports from a gpsd daemon and print them as JSON lines
#[derive(Debug, Parser)]
#[command(name = "gpsd-watch", version, about)]
pub struct Args {
    /// Daemon address (host:port)
    #[arg(short, long, env = "GPSD_ADDR", default_value = DEFAULT_ADDRESS)]
    pub addr: String,

    /// Only watch this device
    #[arg(short, long)]
    pub device: Option<String>,

    /// Send the disabling form of the WATCH command
    #[arg(long)]
    pub disable: bool,

    /// Do not request JSON reports
    #[arg(long)]
    pub no_json: bool,

    /// Request NMEA sentences
    #[arg(long)]
    pub nmea: bool,

    #[arg(long, value_enum, default_value_t = RawLevel::Off)]
    pub raw_level: RawLevel,

    /// Scale output to floats
    #[arg(long)]
    pub scaled: bool,

    /// Request timing information
    #[arg(long)]
    pub timing: bool,

    /// Split AIS type 24 messages
    #[arg(long)]
    pub split24: bool,

    /// Request PPS reports
    #[arg(long)]
    pub pps: bool,

    /// Reports buffered ahead of the printer
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Exit after this many reports
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Log frame traffic to stderr
    #[arg(long, env = "GPSD_DEBUG", action = ArgAction::SetTrue, value_parser = parse_debug)]
    pub debug: bool,
}

/// Lenient boolean for `GPSD_DEBUG`: `1`/`t`/`true` in the usual casings turn
/// debugging on, anything unrecognized leaves it off instead of failing startup
fn parse_debug(value: &str) -> Result<bool, Infallible> {
    Ok(matches!(value, "1" | "t" | "T" | "true" | "TRUE" | "True"))
}

impl Args {
    /// Watch flags for the command sent on connect
    pub fn watch_flags(&self) -> WatchFlags {
        let mut flags = if self.disable {
            WatchFlags::DISABLE
        } else {
            WatchFlags::ENABLE
        };

        flags.set(WatchFlags::JSON, !self.no_json);
        flags.set(WatchFlags::NMEA, self.nmea);
        flags.set(WatchFlags::RARE, self.raw_level == RawLevel::Hex);
        flags.set(WatchFlags::RAW, self.raw_level == RawLevel::Raw);
        flags.set(WatchFlags::SCALED, self.scaled);
        flags.set(WatchFlags::TIMING, self.timing);
        flags.set(WatchFlags::SPLIT24, self.split24);
        flags.set(WatchFlags::PPS, self.pps);
        flags.set(WatchFlags::DEVICE, self.device.is_some());
        flags
    }

    pub fn device_path(&self) -> &str {
        self.device.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("gpsd-watch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.capacity, DEFAULT_CAPACITY);
        assert_eq!(args.watch_flags(), WatchFlags::ENABLE | WatchFlags::JSON);
        assert_eq!(args.device_path(), "");
    }

    #[test]
    fn test_device_sets_flag() {
        let args = parse(&["--device", "/dev/ttyUSB0", "--nmea"]);
        assert_eq!(
            args.watch_flags(),
            WatchFlags::ENABLE | WatchFlags::JSON | WatchFlags::NMEA | WatchFlags::DEVICE
        );
        assert_eq!(args.device_path(), "/dev/ttyUSB0");
    }

    #[test]
    fn test_raw_levels_are_exclusive() {
        let hex = parse(&["--raw-level", "hex"]).watch_flags();
        assert!(hex.contains(WatchFlags::RARE));
        assert!(!hex.contains(WatchFlags::RAW));

        let raw = parse(&["--raw-level", "raw"]).watch_flags();
        assert!(raw.contains(WatchFlags::RAW));
        assert!(!raw.contains(WatchFlags::RARE));
    }

    #[test]
    fn test_disable_form() {
        let args = parse(&["--disable", "--no-json", "--pps"]);
        assert_eq!(args.watch_flags(), WatchFlags::DISABLE | WatchFlags::PPS);
    }

    #[test]
    fn test_debug_values() {
        for on in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(parse_debug(on), Ok(true), "{}", on);
        }
        for off in ["0", "f", "false", "FALSE", "", "yes", "debug"] {
            assert_eq!(parse_debug(off), Ok(false), "{}", off);
        }
        assert!(parse(&["--debug"]).debug);
    }

    #[test]
    fn test_debug_from_env() {
        std::env::set_var("GPSD_DEBUG", "1");
        let on = Args::try_parse_from(["gpsd-watch"]).map(|args| args.debug);
        std::env::set_var("GPSD_DEBUG", "verbose");
        let unrecognized = Args::try_parse_from(["gpsd-watch"]).map(|args| args.debug);
        std::env::remove_var("GPSD_DEBUG");

        assert!(on.unwrap());
        assert!(!unrecognized.unwrap());
    }

    #[test]
    fn test_rejects_unknown_raw_level() {
        let result = Args::try_parse_from(["gpsd-watch", "--raw-level", "binary"]);
        assert!(result.is_err());
    }
}
