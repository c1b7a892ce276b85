//! Terminal display
//!
//! On a TTY every run starts on a cleared screen and the run status is kept in
//! the window title. Anywhere else the transcript is written as plain text, one
//! run after the other.

use std::io::{self, Stdout, Write};
use std::path::Path;

use chrono::Local;
use crossterm::{cursor, terminal, QueueableCommand};
use is_terminal::IsTerminal;

use crate::domain::ports::Display;
use crate::domain::value_objects::RunStatus;

/// Window title for a watch rooted at `root`
pub fn window_title(root: &Path) -> String {
    format!("{}/+watch", root.display())
}

pub struct TerminalDisplay<W: Write + Send> {
    out: W,
    interactive: bool,
    title: String,
}

impl TerminalDisplay<Stdout> {
    /// Display on this process's stdout, interactive when it is a terminal
    pub fn stdout(root: &Path) -> Self {
        let out = io::stdout();
        let interactive = out.is_terminal();
        Self::new(out, interactive, window_title(root))
    }
}

impl<W: Write + Send> TerminalDisplay<W> {
    pub fn new(out: W, interactive: bool, title: String) -> Self {
        Self {
            out,
            interactive,
            title,
        }
    }

    /// Put the plain title up before the first run reports a status
    pub fn announce(&mut self) -> io::Result<()> {
        if self.interactive {
            self.out.queue(terminal::SetTitle(&self.title))?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Display for TerminalDisplay<W> {
    fn clear(&mut self) -> io::Result<()> {
        if self.interactive {
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
            self.out.queue(terminal::Clear(terminal::ClearType::Purge))?;
            self.out.queue(cursor::MoveTo(0, 0))?;
        }
        Ok(())
    }

    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.out.flush()
    }

    fn set_clean(&mut self, clean: bool) -> io::Result<()> {
        if self.interactive {
            if clean {
                self.out.queue(cursor::Show)?;
            } else {
                self.out.queue(cursor::Hide)?;
            }
        }
        Ok(())
    }

    fn set_status(&mut self, status: RunStatus) -> io::Result<()> {
        if self.interactive {
            let stamp = Local::now().format("%H:%M:%S");
            let title = format!("{} [{} {}]", self.title, status.label(), stamp);
            self.out.queue(terminal::SetTitle(title))?;
        }
        self.out.flush()
    }

    fn show(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn set_view_to_top(&mut self) -> io::Result<()> {
        // A terminal keeps its own scrollback.
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(display: TerminalDisplay<Vec<u8>>) -> String {
        String::from_utf8(display.into_inner()).unwrap()
    }

    #[test]
    fn plain_output_has_no_escape_sequences() {
        let mut display = TerminalDisplay::new(Vec::new(), false, "/w/+watch".into());
        display.clear().unwrap();
        display.set_clean(false).unwrap();
        display.set_status(RunStatus::Running).unwrap();
        display.append(b"$ echo hi\nhi\n").unwrap();
        display.set_clean(true).unwrap();
        display.show().unwrap();

        let out = text(display);
        assert_eq!(out, "$ echo hi\nhi\n");
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn window_title_names_the_directory() {
        assert_eq!(window_title(Path::new("/home/me/src")), "/home/me/src/+watch");
    }

    #[cfg(unix)]
    #[test]
    fn interactive_clear_homes_the_cursor() {
        let mut display = TerminalDisplay::new(Vec::new(), true, "/w/+watch".into());
        display.clear().unwrap();
        display.append(b"x").unwrap();

        let out = text(display);
        assert!(out.starts_with("\x1b[2J"));
        assert!(out.contains("\x1b[1;1H"));
        assert!(out.ends_with('x'));
    }

    #[cfg(unix)]
    #[test]
    fn interactive_status_goes_to_the_title() {
        let mut display = TerminalDisplay::new(Vec::new(), true, "/w/+watch".into());
        display.set_status(RunStatus::Running).unwrap();

        let out = text(display);
        assert!(out.starts_with("\x1b]0;/w/+watch [running "), "{out:?}");
    }
}
