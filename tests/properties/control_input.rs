//! Property tests for typed control input.

use std::io::Cursor;
use std::sync::mpsc;

use proptest::prelude::*;

use watchrun::infrastructure::read_controls;
use watchrun::ControlEvent;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `parse_line` never panics and ignores surrounding whitespace.
    #[test]
    fn property_parse_line_ignores_padding(line in "(?s).{0,64}", pad in "[ \t]{0,4}") {
        let padded = format!("{pad}{line}{pad}");
        prop_assert_eq!(ControlEvent::parse_line(&padded), ControlEvent::parse_line(&line));
    }

    /// PROPERTY: every recognised line becomes exactly one event, in order.
    #[test]
    fn property_recognised_lines_are_forwarded(
        lines in proptest::collection::vec(
            prop_oneof![Just("r"), Just("rerun"), Just("Get"), Just("q"), Just("Del"), Just("??")],
            0..32,
        )
    ) {
        let (tx, rx) = mpsc::channel();
        let input = lines.iter().map(|l| format!("{l}\n")).collect::<String>();

        let sent = read_controls(Cursor::new(input), &tx);
        drop(tx);

        let expected: Vec<ControlEvent> =
            lines.iter().filter_map(|l| ControlEvent::parse_line(l)).collect();
        prop_assert_eq!(sent, expected.len());
        prop_assert_eq!(rx.iter().collect::<Vec<_>>(), expected);
    }
}
