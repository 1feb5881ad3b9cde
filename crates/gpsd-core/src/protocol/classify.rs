//! Frame classification
//!
//! Pulls the `"class"` value out of a JSON frame with one forward scan so the
//! receive loop knows which report type to decode into before parsing.

/// Key literal matched by the scanner
const CLASS_KEY: &[u8] = b"\"class\":\"";

/// JSON object marker a frame must start with to be decoded
pub const OBJECT_MARKER: u8 = b'{';

/// Whether the frame should go through the decoder or be passed through raw
pub fn is_json(frame: &[u8]) -> bool {
    frame.first() == Some(&OBJECT_MARKER)
}

/// Extract the report class from a frame, or `""` when there is none
///
/// Whitespace between the key's literal characters is skipped. A mismatch
/// restarts the key match, so the attribute does not need to come first. The
/// mismatching byte is itself tried as the key's opening `"`, so a stray quote
/// right before the key (`{""class":"PPS"}`) still yields `PPS`. The value
/// runs up to the next `"`; an unterminated value yields `""`.
pub fn class(frame: &[u8]) -> &str {
    let mut matched = 0;

    for (i, &byte) in frame.iter().enumerate() {
        if is_space(byte) {
            continue;
        }

        if byte != CLASS_KEY[matched] {
            // restart, the current byte may open a new key
            matched = usize::from(byte == CLASS_KEY[0]);
            continue;
        }

        matched += 1;
        if matched == CLASS_KEY.len() {
            let value = &frame[i + 1..];
            return match value.iter().position(|&b| b == b'"') {
                Some(end) => std::str::from_utf8(&value[..end]).unwrap_or(""),
                None => "",
            };
        }
    }

    ""
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\r' | b'\n' | b'\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_basic() {
        let cases: &[(&[u8], &str)] = &[
            (br#"{"class":"VERSION","release":"3.16"}"#, "VERSION"),
            (b"{\"class\":\t\"WATCH\",\"enable\":true}", "WATCH"),
            (br#"{"class": "TPV","device":"/dev/ttyUSB0"}"#, "TPV"),
            (br#"{   "class":   "SKY","device":"/dev/ttyUSB0"}"#, "SKY"),
            (br#"{"device":"/dev/ttyUSB0"}"#, ""),
        ];
        for (frame, want) in cases {
            assert_eq!(class(frame), *want, "frame {:?}", String::from_utf8_lossy(frame));
        }
    }

    #[test]
    fn test_class_not_first_attribute() {
        assert_eq!(class(br#"{"device":"/dev/gps0","class":"TPV"}"#), "TPV");
    }

    #[test]
    fn test_class_after_quote_mismatch() {
        assert_eq!(class(br#"{"a":"","class":"PPS"}"#), "PPS");
        // the mismatching quote opens the key itself
        assert_eq!(class(br#"{""class":"PPS"}"#), "PPS");
    }

    #[test]
    fn test_class_whitespace_insensitive() {
        let compact = br#"{"class":"DEVICES","devices":[]}"#;
        let want = class(compact);
        assert_eq!(want, "DEVICES");

        let key_end = CLASS_KEY.len() + 1;
        for ws in [b' ', b'\t', b'\r', b'\n'] {
            // inject whitespace before every byte up to the start of the value
            for pos in 0..key_end {
                let mut frame = compact.to_vec();
                frame.insert(pos, ws);
                frame.insert(pos, ws);
                assert_eq!(
                    class(&frame),
                    want,
                    "whitespace {:?} at {}",
                    ws as char,
                    pos
                );
            }
        }
    }

    #[test]
    fn test_class_unterminated_value() {
        assert_eq!(class(br#"{"class":"TPV"#), "");
        assert_eq!(class(br#"{"class":""#), "");
    }

    #[test]
    fn test_class_empty_and_garbage() {
        assert_eq!(class(b""), "");
        assert_eq!(class(b"$GPGGA,123519,4807.038,N"), "");
        assert_eq!(class(br#""class":"#), "");
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(br#"{"class":"TPV"}"#));
        assert!(!is_json(b"$GPRMC,"));
        assert!(!is_json(b""));
    }
}
