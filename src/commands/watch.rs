use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, trace, warn};

use watchrun::application::{WatchEvent, WatchOptions, WatchUseCase};
use watchrun::config::Config;
use watchrun::domain::value_objects::CommandLine;
use watchrun::infrastructure::{
    install_ctrlc_handler, spawn_stdin_reader, NotifyChangeSource, TerminalDisplay,
};

pub fn cmd_watch(command: Vec<String>) -> Result<()> {
    let root = std::env::current_dir().context("cannot determine the current directory")?;

    // Load configuration before logging exists; warnings are replayed below.
    let loaded = Config::load_or_default(&root);
    crate::init_logging(&loaded.config.log.level);
    for warning in &loaded.warnings {
        warn!("{warning}");
    }
    if let Some(path) = &loaded.source {
        debug!(path = %path.display(), "loaded config");
    }

    let command = CommandLine::from_parts(command).context("missing command")?;
    let options = WatchOptions::new(root.clone(), command).with_config(loaded.config);

    let source = Arc::new(NotifyChangeSource::new()?);
    let display = terminal_display(&root);

    let (controls, control_rx) = mpsc::channel();
    install_ctrlc_handler(controls.clone())?;
    spawn_stdin_reader(controls);

    let running = Arc::new(AtomicBool::new(true));
    WatchUseCase::new(options).start(source, display, control_rx, running, |event| {
        match &event {
            WatchEvent::FileTracked { name } => trace!(name = %name.to_string_lossy(), "tracked"),
            WatchEvent::FileForgotten { name } => {
                trace!(name = %name.to_string_lossy(), "forgotten")
            }
            other => debug!(event = ?other, "watch event"),
        }
    })?;
    Ok(())
}

fn terminal_display(root: &Path) -> TerminalDisplay<std::io::Stdout> {
    let mut display = TerminalDisplay::stdout(root);
    if let Err(err) = display.announce() {
        warn!(%err, "cannot set window title");
    }
    display
}
