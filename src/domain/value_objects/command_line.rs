//! Command line value object - the program watchrun reruns

use std::fmt;

/// Program plus arguments, exactly as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Build from `argv`-style parts; `None` when there is no program.
    pub fn from_parts<I, S>(parts: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parts = parts.into_iter().map(Into::into);
        let program = parts.next()?;
        if program.is_empty() {
            return None;
        }
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Space-joined form used in the echo line and error annotations
impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_spaces() {
        let cmd = CommandLine::from_parts(["wc", "-l", "main.go"]).unwrap();
        assert_eq!(cmd.program(), "wc");
        assert_eq!(cmd.args(), ["-l", "main.go"]);
        assert_eq!(cmd.to_string(), "wc -l main.go");
    }

    #[test]
    fn empty_is_rejected() {
        assert!(CommandLine::from_parts(Vec::<String>::new()).is_none());
        assert!(CommandLine::from_parts([""]).is_none());
    }
}
