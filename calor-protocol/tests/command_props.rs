//! Property tests for the serial command set

use calor_protocol::{Command, CommandError, Gain, LineParser};
use proptest::prelude::*;

proptest! {
    #[test]
    fn parse_never_panics(line in ".{0,40}") {
        let _ = Command::parse(&line);
    }

    #[test]
    fn unknown_prefix_is_rejected(prefix in "[a-z]{2}", value in -1000.0f32..1000.0) {
        prop_assume!(!matches!(prefix.as_str(), "p:" | "i:" | "d:" | "t:"));
        let line = format!("{}{}", prefix, value);
        prop_assert_eq!(Command::parse(&line), Err(CommandError::Unknown));
    }

    #[test]
    fn gain_value_is_preserved(value in 0.0f32..30.0) {
        let line = format!("i:{}", value);
        prop_assert_eq!(Command::parse(&line), Ok(Command::SetGain(Gain::I, value)));
    }

    #[test]
    fn line_parser_yields_at_most_one_line_per_terminator(bytes in proptest::collection::vec(any::<u8>(), 0..200)) {
        let mut parser = LineParser::new();
        let mut lines = 0usize;
        for &b in &bytes {
            if let Ok(Some(line)) = parser.feed(b) {
                prop_assert!(!line.is_empty());
                lines += 1;
            }
        }
        let terminators = bytes.iter().filter(|&&b| b == b'\n' || b == b'\r').count();
        prop_assert!(lines <= terminators);
    }
}
