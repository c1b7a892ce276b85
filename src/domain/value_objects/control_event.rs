//! Control events issued by the user

/// A request coming from the user rather than the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Run the command again now
    Rerun,
    /// Stop watching and exit
    Close,
}

impl ControlEvent {
    /// Parse one line of typed input.
    ///
    /// Accepts the acme-style `Get`/`Del` verbs next to the short forms.
    pub fn parse_line(line: &str) -> Option<ControlEvent> {
        match line.trim() {
            "" | "r" | "rerun" | "Get" => Some(ControlEvent::Rerun),
            "q" | "quit" | "Del" => Some(ControlEvent::Close),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rerun_verbs() {
        for line in ["", "r", "rerun", "Get", "  r  "] {
            assert_eq!(ControlEvent::parse_line(line), Some(ControlEvent::Rerun), "{line:?}");
        }
    }

    #[test]
    fn parses_close_verbs() {
        for line in ["q", "quit", "Del"] {
            assert_eq!(ControlEvent::parse_line(line), Some(ControlEvent::Close));
        }
    }

    #[test]
    fn ignores_unknown_input() {
        assert_eq!(ControlEvent::parse_line("make"), None);
        assert_eq!(ControlEvent::parse_line("GET"), None);
    }
}
