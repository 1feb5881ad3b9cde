//! Report rendering for stdout

use anyhow::Result;
use gpsd_core::Report;

/// One output line per report: JSON for decoded reports, raw lines verbatim
pub fn render(report: &Report) -> Result<String> {
    match report {
        Report::Raw(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        other => Ok(serde_json::to_string(other)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpsd_core::protocol::{decode, RAW_CLASS};

    #[test]
    fn test_render_raw_verbatim() {
        let report = decode(RAW_CLASS, b"$GPGGA,123519,4807.038,N").unwrap();
        assert_eq!(render(&report).unwrap(), "$GPGGA,123519,4807.038,N");
    }

    #[test]
    fn test_render_json_report() {
        let report = decode("VERSION", br#"{"class":"VERSION","release":"3.16"}"#).unwrap();
        let line = render(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["class"], "VERSION");
        assert_eq!(value["release"], "3.16");
    }
}
